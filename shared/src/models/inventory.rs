//! Inventory models
//!
//! Stock is keyed by the (product_name, unit, supplier) triple: the same
//! product name may be carried in several units (carrots by the kg and by
//! the piece) and sourced from several suppliers, each as its own row.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One stock row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub product_id: i64,
    pub product_name: String,
    pub unit: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub supplier: String,
}

impl InventoryItem {
    /// Current value of this row's stock
    pub fn line_value(&self) -> Decimal {
        self.quantity * self.unit_price
    }
}

/// Per-unit detail inside a [`ProductDetails`] composite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitInfo {
    pub unit: String,
    pub unit_price: Decimal,
    pub quantity: Decimal,
    pub product_id: i64,
    pub supplier: String,
}

/// Composite lookup result for a product name (or id): every unit variant
/// plus the first matching row's values as defaults for the sale form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDetails {
    pub product_id: i64,
    pub product_name: String,
    pub unit: String,
    pub unit_price: Decimal,
    pub quantity: Decimal,
    pub units: Vec<String>,
    pub units_info: Vec<UnitInfo>,
}

impl ProductDetails {
    /// Assemble the composite from matching inventory rows, preserving row
    /// order. Returns `None` when no rows matched.
    pub fn from_rows(rows: &[InventoryItem]) -> Option<Self> {
        let first = rows.first()?;
        let mut units: Vec<String> = Vec::new();
        let mut units_info: Vec<UnitInfo> = Vec::new();
        for row in rows {
            if !units.contains(&row.unit) {
                units.push(row.unit.clone());
                units_info.push(UnitInfo {
                    unit: row.unit.clone(),
                    unit_price: row.unit_price,
                    quantity: row.quantity,
                    product_id: row.product_id,
                    supplier: row.supplier.clone(),
                });
            }
        }
        Some(Self {
            product_id: first.product_id,
            product_name: first.product_name.clone(),
            unit: first.unit.clone(),
            unit_price: first.unit_price,
            quantity: first.quantity,
            units,
            units_info,
        })
    }
}
