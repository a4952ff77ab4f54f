//! Transaction recording: the append-only ledger plus its stock effects
//!
//! Every recording flow appends the ledger row and adjusts stock inside a
//! single database transaction, so a failure on either side leaves neither
//! behind. Within that boundary sales and returns write the ledger row
//! before decrementing stock; purchases settle stock first and then append.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{PgConnection, PgPool};

use crate::error::{AppError, AppResult};
use crate::services::inventory::{AddProductInput, InventoryService};
use crate::services::shift::taipei_now;
use shared::models::{total_price, Shift, TransactionRecord, TransactionType};
use shared::types::DateRange;
use shared::validation::{validate_name, validate_transaction_quantity, validate_unit_price};

/// Transaction recording service
#[derive(Clone)]
pub struct TransactionService {
    db: PgPool,
}

/// Row for ledger queries
#[derive(Debug, sqlx::FromRow)]
struct LedgerRow {
    transaction_id: i64,
    transaction_type: String,
    date: NaiveDate,
    time: chrono::NaiveTime,
    staff: String,
    shift: Option<String>,
    product_id: i64,
    product_name: String,
    unit: String,
    quantity: Decimal,
    unit_price: Decimal,
    total_price: Decimal,
    supplier: String,
    return_reason: Option<String>,
}

impl LedgerRow {
    fn into_record(self) -> AppResult<TransactionRecord> {
        let transaction_type = TransactionType::parse(&self.transaction_type).ok_or_else(|| {
            AppError::Internal(format!(
                "Unknown transaction type in ledger: {}",
                self.transaction_type
            ))
        })?;
        Ok(TransactionRecord {
            transaction_id: self.transaction_id,
            transaction_type,
            date: self.date,
            time: self.time,
            staff: self.staff,
            shift: self.shift,
            product_id: self.product_id,
            product_name: self.product_name,
            unit: self.unit,
            quantity: self.quantity,
            unit_price: self.unit_price,
            total_price: self.total_price,
            supplier: self.supplier,
            return_reason: self.return_reason,
        })
    }
}

/// Input for recording a purchase from a supplier
#[derive(Debug, Deserialize)]
pub struct PurchaseInput {
    pub date: NaiveDate,
    pub supplier: String,
    pub product_name: String,
    pub unit: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub staff: String,
}

/// Input for recording a counter sale
#[derive(Debug, Deserialize)]
pub struct SaleInput {
    pub date: NaiveDate,
    pub shift: Shift,
    pub staff: String,
    pub product_name: String,
    pub unit: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

/// Input for recording a return to a supplier
#[derive(Debug, Deserialize)]
pub struct ReturnInput {
    pub date: NaiveDate,
    pub supplier: String,
    pub product_name: String,
    pub unit: String,
    pub quantity: Decimal,
    pub staff: String,
    pub reason: String,
}

/// Ledger query filter; date bounds are inclusive
#[derive(Debug, Default, Deserialize)]
pub struct TransactionFilter {
    pub transaction_type: Option<TransactionType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

const LEDGER_COLUMNS: &str = "transaction_id, transaction_type, date, time, staff, shift, \
     product_id, product_name, unit, quantity, unit_price, total_price, supplier, return_reason";

impl TransactionService {
    /// Create a new TransactionService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a purchase: stock in from a supplier.
    ///
    /// An existing (product_name, unit) row gains the quantity and keeps its
    /// product_id; otherwise a new inventory row is registered.
    pub async fn record_purchase(&self, input: PurchaseInput) -> AppResult<TransactionRecord> {
        validate_transaction_quantity(input.quantity)
            .map_err(|msg| AppError::ValidationError(msg.to_string()))?;
        validate_unit_price(input.unit_price)
            .map_err(|msg| AppError::ValidationError(msg.to_string()))?;
        for name in [&input.product_name, &input.unit, &input.supplier, &input.staff] {
            validate_name(name).map_err(|msg| AppError::ValidationError(msg.to_string()))?;
        }

        let mut tx = self.db.begin().await?;

        let product_id = match InventoryService::find_by_name_unit_on(
            &mut tx,
            &input.product_name,
            &input.unit,
        )
        .await?
        {
            Some(item) => {
                InventoryService::adjust_quantity_on(
                    &mut tx,
                    item.product_id,
                    &input.unit,
                    input.quantity,
                )
                .await?;
                item.product_id
            }
            None => {
                let item = InventoryService::insert_product_on(
                    &mut tx,
                    &AddProductInput {
                        product_name: input.product_name.clone(),
                        unit: input.unit.clone(),
                        quantity: input.quantity,
                        unit_price: input.unit_price,
                        supplier: input.supplier.clone(),
                    },
                )
                .await?;
                item.product_id
            }
        };

        let record = Self::append_ledger_on(
            &mut tx,
            TransactionType::Purchase,
            input.date,
            &input.staff,
            None,
            product_id,
            &input.product_name,
            &input.unit,
            input.quantity,
            input.unit_price,
            &input.supplier,
            None,
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            "Recorded purchase #{}: {} {} x {} from {}",
            record.transaction_id,
            input.product_name,
            input.unit,
            input.quantity,
            input.supplier
        );
        Ok(record)
    }

    /// Record a sale: stock out over the counter.
    ///
    /// The sale price may differ from the current inventory price; the
    /// ledger stores what was charged.
    pub async fn record_sale(&self, input: SaleInput) -> AppResult<TransactionRecord> {
        validate_transaction_quantity(input.quantity)
            .map_err(|msg| AppError::ValidationError(msg.to_string()))?;
        validate_unit_price(input.unit_price)
            .map_err(|msg| AppError::ValidationError(msg.to_string()))?;
        for name in [&input.product_name, &input.unit, &input.staff] {
            validate_name(name).map_err(|msg| AppError::ValidationError(msg.to_string()))?;
        }

        let mut tx = self.db.begin().await?;

        if !InventoryService::name_exists_on(&mut tx, &input.product_name).await? {
            return Err(AppError::NotFound(format!(
                "Product {}",
                input.product_name
            )));
        }

        let item = InventoryService::find_by_name_unit_on(&mut tx, &input.product_name, &input.unit)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Unit {} of product {}",
                    input.unit, input.product_name
                ))
            })?;

        if item.quantity < input.quantity {
            return Err(AppError::InsufficientStock(format!(
                "current stock {} {}, requested {} {}",
                item.quantity, input.unit, input.quantity, input.unit
            )));
        }

        // Ledger row first, stock decrement second
        let record = Self::append_ledger_on(
            &mut tx,
            TransactionType::Sale,
            input.date,
            &input.staff,
            Some(input.shift.as_str()),
            item.product_id,
            &input.product_name,
            &input.unit,
            input.quantity,
            input.unit_price,
            &item.supplier,
            None,
        )
        .await?;

        InventoryService::adjust_quantity_on(&mut tx, item.product_id, &input.unit, -input.quantity)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Recorded sale #{}: {} {} x {} ({})",
            record.transaction_id,
            input.product_name,
            input.unit,
            input.quantity,
            input.shift.as_str()
        );
        Ok(record)
    }

    /// Record a return of goods to a supplier.
    ///
    /// The stock row must match product, unit, and supplier; the ledger uses
    /// the inventory unit price, not a caller-supplied one.
    pub async fn record_return(&self, input: ReturnInput) -> AppResult<TransactionRecord> {
        validate_transaction_quantity(input.quantity)
            .map_err(|msg| AppError::ValidationError(msg.to_string()))?;
        for name in [&input.product_name, &input.unit, &input.supplier, &input.staff] {
            validate_name(name).map_err(|msg| AppError::ValidationError(msg.to_string()))?;
        }

        let mut tx = self.db.begin().await?;

        let item = InventoryService::find_by_name_unit_supplier_on(
            &mut tx,
            &input.product_name,
            &input.unit,
            &input.supplier,
        )
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Stock of {} ({}) from {}",
                input.product_name, input.unit, input.supplier
            ))
        })?;

        if item.quantity < input.quantity {
            return Err(AppError::InsufficientStock(format!(
                "current stock {} {}, requested {} {}",
                item.quantity, input.unit, input.quantity, input.unit
            )));
        }

        let record = Self::append_ledger_on(
            &mut tx,
            TransactionType::Return,
            input.date,
            &input.staff,
            None,
            item.product_id,
            &input.product_name,
            &input.unit,
            input.quantity,
            item.unit_price,
            &input.supplier,
            Some(&input.reason),
        )
        .await?;

        InventoryService::adjust_quantity_on(&mut tx, item.product_id, &input.unit, -input.quantity)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Recorded return #{}: {} {} x {} to {}",
            record.transaction_id,
            input.product_name,
            input.unit,
            input.quantity,
            input.supplier
        );
        Ok(record)
    }

    /// Ledger rows matching the filter, oldest first
    pub async fn list(&self, filter: &TransactionFilter) -> AppResult<Vec<TransactionRecord>> {
        let start = filter
            .start_date
            .unwrap_or(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
        let end = filter
            .end_date
            .unwrap_or(NaiveDate::from_ymd_opt(2100, 12, 31).unwrap());

        let rows = match filter.transaction_type {
            Some(ty) => {
                sqlx::query_as::<_, LedgerRow>(&format!(
                    r#"
                    SELECT {}
                    FROM transactions
                    WHERE transaction_type = $1 AND date BETWEEN $2 AND $3
                    ORDER BY transaction_id
                    "#,
                    LEDGER_COLUMNS
                ))
                .bind(ty.as_str())
                .bind(start)
                .bind(end)
                .fetch_all(&self.db)
                .await?
            }
            None => {
                sqlx::query_as::<_, LedgerRow>(&format!(
                    r#"
                    SELECT {}
                    FROM transactions
                    WHERE date BETWEEN $1 AND $2
                    ORDER BY transaction_id
                    "#,
                    LEDGER_COLUMNS
                ))
                .bind(start)
                .bind(end)
                .fetch_all(&self.db)
                .await?
            }
        };

        rows.into_iter().map(LedgerRow::into_record).collect()
    }

    /// Ledger rows of one type within a range, oldest first
    pub async fn list_in_range(
        &self,
        transaction_type: TransactionType,
        range: &DateRange,
    ) -> AppResult<Vec<TransactionRecord>> {
        self.list(&TransactionFilter {
            transaction_type: Some(transaction_type),
            start_date: Some(range.start),
            end_date: Some(range.end),
        })
        .await
    }

    /// Append a ledger row; the stored total_price is computed here, at
    /// write time.
    #[allow(clippy::too_many_arguments)]
    async fn append_ledger_on(
        conn: &mut PgConnection,
        transaction_type: TransactionType,
        date: NaiveDate,
        staff: &str,
        shift: Option<&str>,
        product_id: i64,
        product_name: &str,
        unit: &str,
        quantity: Decimal,
        unit_price: Decimal,
        supplier: &str,
        return_reason: Option<&str>,
    ) -> AppResult<TransactionRecord> {
        let time = taipei_now().time();
        let total = total_price(quantity, unit_price);

        let row = sqlx::query_as::<_, LedgerRow>(&format!(
            r#"
            INSERT INTO transactions (
                transaction_type, date, time, staff, shift,
                product_id, product_name, unit, quantity, unit_price,
                total_price, supplier, return_reason
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {}
            "#,
            LEDGER_COLUMNS
        ))
        .bind(transaction_type.as_str())
        .bind(date)
        .bind(time)
        .bind(staff)
        .bind(shift)
        .bind(product_id)
        .bind(product_name)
        .bind(unit)
        .bind(quantity)
        .bind(unit_price)
        .bind(total)
        .bind(supplier)
        .bind(return_reason)
        .fetch_one(&mut *conn)
        .await?;

        row.into_record()
    }
}
