//! Report row models and profit-share arithmetic

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the supplier or staff commission report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommissionRow {
    pub name: String,
    pub total_sales: Decimal,
    pub commission_rate: Decimal,
    pub commission_amount: Decimal,
}

impl CommissionRow {
    pub fn compute(name: String, total_sales: Decimal, commission_rate: Decimal) -> Self {
        Self {
            name,
            total_sales,
            commission_rate,
            commission_amount: total_sales * commission_rate,
        }
    }
}

/// The financial summary line items.
///
/// Convention: net_profit = total_sales - staff_commission -
/// farmer_commission. Purchases and returns are reported as their own line
/// items and are not netted into profit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub total_sales: Decimal,
    pub total_purchases: Decimal,
    pub total_returns: Decimal,
    pub staff_commission: Decimal,
    pub farmer_commission: Decimal,
    pub net_profit: Decimal,
}

impl FinancialSummary {
    pub fn compute(
        total_sales: Decimal,
        total_purchases: Decimal,
        total_returns: Decimal,
        staff_rows: &[CommissionRow],
        farmer_rows: &[CommissionRow],
    ) -> Self {
        let staff_commission: Decimal = staff_rows.iter().map(|r| r.commission_amount).sum();
        let farmer_commission: Decimal = farmer_rows.iter().map(|r| r.commission_amount).sum();
        Self {
            total_sales,
            total_purchases,
            total_returns,
            staff_commission,
            farmer_commission,
            net_profit: total_sales - staff_commission - farmer_commission,
        }
    }
}

/// Overview sheet of a per-supplier detail export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierOverview {
    pub supplier: String,
    pub period: String,
    pub total_sales: Decimal,
    pub total_purchases: Decimal,
    pub total_returns: Decimal,
    pub commission_rate: Decimal,
    pub commission_amount: Decimal,
    pub inventory_value: Decimal,
}

/// A generated report file, path relative to the reports root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportFile {
    pub name: String,
    pub path: String,
}
