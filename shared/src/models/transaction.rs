//! Transaction ledger models
//!
//! Ledger rows are append-only: once written they are never updated or
//! deleted. `total_price` is computed at write time and summed verbatim by
//! the report generator, so the price charged at the counter is what history
//! reports.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Ledger entry kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Purchase,
    Sale,
    Return,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Purchase => "purchase",
            TransactionType::Sale => "sale",
            TransactionType::Return => "return",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "purchase" => Some(TransactionType::Purchase),
            "sale" => Some(TransactionType::Sale),
            "return" => Some(TransactionType::Return),
            _ => None,
        }
    }
}

/// One immutable ledger row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub transaction_id: i64,
    pub transaction_type: TransactionType,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub staff: String,
    /// Present on sales only
    pub shift: Option<String>,
    pub product_id: i64,
    pub product_name: String,
    pub unit: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub supplier: String,
    /// Present on returns only
    pub return_reason: Option<String>,
}

/// Total price as stored on the ledger
pub fn total_price(quantity: Decimal, unit_price: Decimal) -> Decimal {
    quantity * unit_price
}
