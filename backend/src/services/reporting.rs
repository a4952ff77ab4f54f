//! Report generation for profit-sharing and financial summaries
//!
//! Reports aggregate the stored ledger totals (write-time prices) over a
//! date range and are written as CSV files under a per-period directory:
//! the supplier and staff commission reports, the financial summary, and
//! optionally one detail export per supplier.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::services::inventory::InventoryService;
use crate::services::roster::RosterService;
use crate::services::transactions::TransactionService;
use shared::models::{
    ActorType, CommissionRow, FinancialSummary, InventoryItem, ReportFile, StaffFarmer,
    SupplierOverview, TransactionRecord, TransactionType,
};
use shared::types::DateRange;

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
    output_root: PathBuf,
}

/// Report generation request: either an explicit date range or a
/// year + month pair
#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub include_supplier_detail: bool,
}

/// Report generation result
#[derive(Debug, Serialize)]
pub struct ReportOutput {
    pub success: bool,
    pub report_dir: Option<String>,
    pub files: Vec<ReportFile>,
}

/// One line of the financial summary file
#[derive(Debug, Serialize)]
struct LineItem {
    item: &'static str,
    amount: Decimal,
}

/// Inventory detail row with its stock value
#[derive(Debug, Serialize)]
struct InventoryValueRow {
    product_id: i64,
    product_name: String,
    unit: String,
    quantity: Decimal,
    unit_price: Decimal,
    supplier: String,
    stock_value: Decimal,
}

impl InventoryValueRow {
    fn from_item(item: &InventoryItem) -> Self {
        Self {
            product_id: item.product_id,
            product_name: item.product_name.clone(),
            unit: item.unit.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            supplier: item.supplier.clone(),
            stock_value: item.line_value(),
        }
    }
}

const COMMISSION_HEADERS: [&str; 4] = ["name", "total_sales", "commission_rate", "commission_amount"];
const FINANCIAL_HEADERS: [&str; 2] = ["item", "amount"];
const TRANSACTION_HEADERS: [&str; 14] = [
    "transaction_id",
    "transaction_type",
    "date",
    "time",
    "staff",
    "shift",
    "product_id",
    "product_name",
    "unit",
    "quantity",
    "unit_price",
    "total_price",
    "supplier",
    "return_reason",
];
const INVENTORY_HEADERS: [&str; 7] = [
    "product_id",
    "product_name",
    "unit",
    "quantity",
    "unit_price",
    "supplier",
    "stock_value",
];
const OVERVIEW_HEADERS: [&str; 8] = [
    "supplier",
    "period",
    "total_sales",
    "total_purchases",
    "total_returns",
    "commission_rate",
    "commission_amount",
    "inventory_value",
];

impl ReportingService {
    pub fn new(db: PgPool, output_root: impl Into<PathBuf>) -> Self {
        Self {
            db,
            output_root: output_root.into(),
        }
    }

    /// Resolve the report period: explicit start/end wins, otherwise the
    /// calendar month of year + month.
    pub fn resolve_range(request: &ReportRequest) -> AppResult<DateRange> {
        if let (Some(start), Some(end)) = (request.start_date, request.end_date) {
            if end < start {
                return Err(AppError::ValidationError(
                    "end_date must not be before start_date".to_string(),
                ));
            }
            return Ok(DateRange::new(start, end));
        }
        if let (Some(year), Some(month)) = (request.year, request.month) {
            return DateRange::for_month(year, month).ok_or_else(|| {
                AppError::ValidationError(format!("Invalid report month: {}-{}", year, month))
            });
        }
        Err(AppError::ValidationError(
            "Either start_date and end_date or year and month are required".to_string(),
        ))
    }

    /// Generate the period reports.
    ///
    /// A period with no purchases, sales, or returns at all produces
    /// `success = false` and an empty file list.
    pub async fn generate(&self, request: ReportRequest) -> AppResult<ReportOutput> {
        let range = Self::resolve_range(&request)?;
        // Explicit date requests always use the start_to_end directory form;
        // month requests use the Chinese month label.
        let dir_label = match (request.start_date, request.end_date) {
            (Some(start), Some(end)) => format!("{}_to_{}", start, end),
            _ => range.dir_label(),
        };

        let transactions = TransactionService::new(self.db.clone());
        let sales = transactions
            .list_in_range(TransactionType::Sale, &range)
            .await?;
        let purchases = transactions
            .list_in_range(TransactionType::Purchase, &range)
            .await?;
        let returns = transactions
            .list_in_range(TransactionType::Return, &range)
            .await?;

        if sales.is_empty() && purchases.is_empty() && returns.is_empty() {
            tracing::warn!("No transactions found for period {}", dir_label);
            return Ok(ReportOutput {
                success: false,
                report_dir: None,
                files: vec![],
            });
        }

        let inventory = InventoryService::new(self.db.clone()).list().await?;
        let roster = RosterService::new(self.db.clone()).list().await?;
        let farmers: Vec<StaffFarmer> = roster
            .iter()
            .filter(|a| a.actor_type == ActorType::Farmer)
            .cloned()
            .collect();
        let staff: Vec<StaffFarmer> = roster
            .iter()
            .filter(|a| a.actor_type == ActorType::Staff)
            .cloned()
            .collect();

        let farmer_rows: Vec<CommissionRow> = farmers
            .iter()
            .map(|f| {
                CommissionRow::compute(
                    f.name.clone(),
                    sum_totals(&sales, |t| t.supplier == f.name),
                    f.commission_rate,
                )
            })
            .collect();
        let staff_rows: Vec<CommissionRow> = staff
            .iter()
            .map(|s| {
                CommissionRow::compute(
                    s.name.clone(),
                    sum_totals(&sales, |t| t.staff == s.name),
                    s.commission_rate,
                )
            })
            .collect();

        let summary = FinancialSummary::compute(
            sum_totals(&sales, |_| true),
            sum_totals(&purchases, |_| true),
            sum_totals(&returns, |_| true),
            &staff_rows,
            &farmer_rows,
        );

        let report_dir = self.output_root.join(&dir_label);
        fs::create_dir_all(&report_dir).map_err(|e| AppError::Report(e.to_string()))?;

        let mut files = Vec::new();

        write_csv(
            &report_dir.join("supplier_report.csv"),
            &COMMISSION_HEADERS,
            &farmer_rows,
        )?;
        files.push(ReportFile {
            name: "supplier_report.csv".to_string(),
            path: format!("{}/supplier_report.csv", dir_label),
        });

        write_csv(
            &report_dir.join("staff_report.csv"),
            &COMMISSION_HEADERS,
            &staff_rows,
        )?;
        files.push(ReportFile {
            name: "staff_report.csv".to_string(),
            path: format!("{}/staff_report.csv", dir_label),
        });

        let financial_lines = [
            LineItem { item: "total_sales", amount: summary.total_sales },
            LineItem { item: "total_purchases", amount: summary.total_purchases },
            LineItem { item: "total_returns", amount: summary.total_returns },
            LineItem { item: "staff_commission", amount: summary.staff_commission },
            LineItem { item: "farmer_commission", amount: summary.farmer_commission },
            LineItem { item: "net_profit", amount: summary.net_profit },
        ];
        write_csv(
            &report_dir.join("financial_report.csv"),
            &FINANCIAL_HEADERS,
            &financial_lines,
        )?;
        files.push(ReportFile {
            name: "financial_report.csv".to_string(),
            path: format!("{}/financial_report.csv", dir_label),
        });

        if request.include_supplier_detail {
            for farmer in &farmers {
                let mut detail_files = self.write_supplier_detail(
                    &report_dir,
                    &dir_label,
                    &range,
                    farmer,
                    &sales,
                    &purchases,
                    &returns,
                    &inventory,
                )?;
                files.append(&mut detail_files);
            }
        }

        tracing::info!(
            "Generated {} report files in {}",
            files.len(),
            report_dir.display()
        );
        Ok(ReportOutput {
            success: true,
            report_dir: Some(dir_label),
            files,
        })
    }

    /// Write one supplier's detail export: overview plus purchase, sale,
    /// return, and stock tables, each present (header only) even when empty.
    #[allow(clippy::too_many_arguments)]
    fn write_supplier_detail(
        &self,
        report_dir: &Path,
        dir_label: &str,
        range: &DateRange,
        farmer: &StaffFarmer,
        sales: &[TransactionRecord],
        purchases: &[TransactionRecord],
        returns: &[TransactionRecord],
        inventory: &[InventoryItem],
    ) -> AppResult<Vec<ReportFile>> {
        let safe_name = farmer.name.replace(['/', '\\'], "_");
        let farmer_dir = report_dir.join("supplier_details").join(&safe_name);
        fs::create_dir_all(&farmer_dir).map_err(|e| AppError::Report(e.to_string()))?;

        let farmer_sales: Vec<&TransactionRecord> =
            sales.iter().filter(|t| t.supplier == farmer.name).collect();
        let farmer_purchases: Vec<&TransactionRecord> = purchases
            .iter()
            .filter(|t| t.supplier == farmer.name)
            .collect();
        let farmer_returns: Vec<&TransactionRecord> = returns
            .iter()
            .filter(|t| t.supplier == farmer.name)
            .collect();
        let farmer_stock: Vec<InventoryValueRow> = inventory
            .iter()
            .filter(|i| i.supplier == farmer.name)
            .map(InventoryValueRow::from_item)
            .collect();

        let total_sales = sum_ref_totals(&farmer_sales);
        let overview = [SupplierOverview {
            supplier: farmer.name.clone(),
            period: format!("{} 至 {}", range.start, range.end),
            total_sales,
            total_purchases: sum_ref_totals(&farmer_purchases),
            total_returns: sum_ref_totals(&farmer_returns),
            commission_rate: farmer.commission_rate,
            commission_amount: total_sales * farmer.commission_rate,
            inventory_value: farmer_stock.iter().map(|r| r.stock_value).sum(),
        }];

        write_csv(&farmer_dir.join("overview.csv"), &OVERVIEW_HEADERS, &overview)?;
        write_csv(
            &farmer_dir.join("purchases.csv"),
            &TRANSACTION_HEADERS,
            &farmer_purchases,
        )?;
        write_csv(
            &farmer_dir.join("sales.csv"),
            &TRANSACTION_HEADERS,
            &farmer_sales,
        )?;
        write_csv(
            &farmer_dir.join("returns.csv"),
            &TRANSACTION_HEADERS,
            &farmer_returns,
        )?;
        write_csv(
            &farmer_dir.join("inventory.csv"),
            &INVENTORY_HEADERS,
            &farmer_stock,
        )?;

        let files = [
            "overview.csv",
            "purchases.csv",
            "sales.csv",
            "returns.csv",
            "inventory.csv",
        ]
        .into_iter()
        .map(|file_name| ReportFile {
            name: format!("{}/{}", safe_name, file_name),
            path: format!("{}/supplier_details/{}/{}", dir_label, safe_name, file_name),
        })
        .collect();
        Ok(files)
    }
}

/// Sum stored ledger totals over the rows matching the predicate
fn sum_totals<F>(rows: &[TransactionRecord], matches: F) -> Decimal
where
    F: Fn(&TransactionRecord) -> bool,
{
    rows.iter()
        .filter(|t| matches(t))
        .map(|t| t.total_price)
        .sum()
}

fn sum_ref_totals(rows: &[&TransactionRecord]) -> Decimal {
    rows.iter().map(|t| t.total_price).sum()
}

/// Write a CSV file with an explicit header row; an empty table still gets
/// its headers.
fn write_csv<T: Serialize>(path: &Path, headers: &[&str], rows: &[T]) -> AppResult<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| AppError::Report(e.to_string()))?;
    writer
        .write_record(headers)
        .map_err(|e| AppError::Report(e.to_string()))?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::Report(e.to_string()))?;
    }
    writer.flush().map_err(|e| AppError::Report(e.to_string()))?;
    Ok(())
}
