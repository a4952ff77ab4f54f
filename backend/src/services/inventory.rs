//! Inventory service: stock rows keyed by (product_name, unit, supplier)
//!
//! The same product name may appear in several units and from several
//! suppliers, each as its own row with its own product_id. A row whose
//! quantity reaches zero is deleted, not retained at zero.

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{PgConnection, PgPool};

use crate::error::{AppError, AppResult};
use shared::models::{InventoryItem, ProductDetails};
use shared::validation::{validate_initial_quantity, validate_name, validate_unit_price};

/// Inventory service for stock lookups and adjustments
#[derive(Clone)]
pub struct InventoryService {
    db: PgPool,
}

/// Row for inventory queries
#[derive(Debug, sqlx::FromRow)]
struct InventoryRow {
    product_id: i64,
    product_name: String,
    unit: String,
    quantity: Decimal,
    unit_price: Decimal,
    supplier: String,
}

impl From<InventoryRow> for InventoryItem {
    fn from(row: InventoryRow) -> Self {
        InventoryItem {
            product_id: row.product_id,
            product_name: row.product_name,
            unit: row.unit,
            quantity: row.quantity,
            unit_price: row.unit_price,
            supplier: row.supplier,
        }
    }
}

/// Input for registering a product
#[derive(Debug, Deserialize)]
pub struct AddProductInput {
    pub product_name: String,
    pub unit: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub supplier: String,
}

const SELECT_COLUMNS: &str =
    "product_id, product_name, unit, quantity, unit_price, supplier";

impl InventoryService {
    /// Create a new InventoryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Register a product row, assigning the next product_id
    pub async fn add_product(&self, input: AddProductInput) -> AppResult<InventoryItem> {
        let mut conn = self.db.acquire().await?;
        Self::insert_product_on(&mut conn, &input).await
    }

    /// Insert a product row on an existing connection, enforcing the
    /// (product_name, unit, supplier) uniqueness.
    pub(crate) async fn insert_product_on(
        conn: &mut PgConnection,
        input: &AddProductInput,
    ) -> AppResult<InventoryItem> {
        for (field, name) in [
            ("product_name", &input.product_name),
            ("unit", &input.unit),
            ("supplier", &input.supplier),
        ] {
            validate_name(name).map_err(|msg| AppError::Validation {
                field: field.to_string(),
                message: msg.to_string(),
                message_zh: "名稱不可為空且不可超過 64 字".to_string(),
            })?;
        }
        validate_initial_quantity(input.quantity).map_err(|msg| AppError::Validation {
            field: "quantity".to_string(),
            message: msg.to_string(),
            message_zh: "數量不可為負".to_string(),
        })?;
        validate_unit_price(input.unit_price).map_err(|msg| AppError::Validation {
            field: "unit_price".to_string(),
            message: msg.to_string(),
            message_zh: "單價不可為負".to_string(),
        })?;

        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM inventory
                WHERE product_name = $1 AND unit = $2 AND supplier = $3
            )
            "#,
        )
        .bind(&input.product_name)
        .bind(&input.unit)
        .bind(&input.supplier)
        .fetch_one(&mut *conn)
        .await?;

        if exists {
            return Err(AppError::DuplicateEntry(
                "product name/unit/supplier".to_string(),
            ));
        }

        let row = sqlx::query_as::<_, InventoryRow>(
            r#"
            INSERT INTO inventory (product_name, unit, quantity, unit_price, supplier)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING product_id, product_name, unit, quantity, unit_price, supplier
            "#,
        )
        .bind(&input.product_name)
        .bind(&input.unit)
        .bind(input.quantity)
        .bind(input.unit_price)
        .bind(&input.supplier)
        .fetch_one(&mut *conn)
        .await?;

        Ok(row.into())
    }

    /// Apply a quantity delta to the row keyed by (product_id, unit)
    pub async fn adjust_quantity(
        &self,
        product_id: i64,
        unit: &str,
        delta: Decimal,
    ) -> AppResult<()> {
        let mut tx = self.db.begin().await?;
        Self::adjust_quantity_on(&mut tx, product_id, unit, delta).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Adjust a stock row on an existing connection. The row disappears
    /// entirely when the adjusted quantity is zero or below; sufficiency
    /// checks are the caller's responsibility.
    pub(crate) async fn adjust_quantity_on(
        conn: &mut PgConnection,
        product_id: i64,
        unit: &str,
        delta: Decimal,
    ) -> AppResult<()> {
        let current = sqlx::query_scalar::<_, Decimal>(
            "SELECT quantity FROM inventory WHERE product_id = $1 AND unit = $2 FOR UPDATE",
        )
        .bind(product_id)
        .bind(unit)
        .fetch_optional(&mut *conn)
        .await?;

        let Some(current) = current else {
            tracing::warn!(
                "No inventory row for product_id {} unit {}",
                product_id,
                unit
            );
            return Err(AppError::NotFound("Inventory row".to_string()));
        };

        let updated = current + delta;
        if updated <= Decimal::ZERO {
            sqlx::query("DELETE FROM inventory WHERE product_id = $1 AND unit = $2")
                .bind(product_id)
                .bind(unit)
                .execute(&mut *conn)
                .await?;
            tracing::info!(
                "Inventory row removed (product_id {} unit {} reached {})",
                product_id,
                unit,
                updated
            );
        } else {
            sqlx::query("UPDATE inventory SET quantity = $1 WHERE product_id = $2 AND unit = $3")
                .bind(updated)
                .bind(product_id)
                .bind(unit)
                .execute(&mut *conn)
                .await?;
        }

        Ok(())
    }

    /// Composite per-unit details for a product name or id.
    /// Returns `None` when nothing matches.
    pub async fn get_details(
        &self,
        name: Option<&str>,
        product_id: Option<i64>,
    ) -> AppResult<Option<ProductDetails>> {
        let rows = match (name, product_id) {
            (Some(name), _) => {
                sqlx::query_as::<_, InventoryRow>(&format!(
                    "SELECT {} FROM inventory WHERE product_name = $1 ORDER BY product_id",
                    SELECT_COLUMNS
                ))
                .bind(name)
                .fetch_all(&self.db)
                .await?
            }
            (None, Some(id)) => {
                sqlx::query_as::<_, InventoryRow>(&format!(
                    "SELECT {} FROM inventory WHERE product_id = $1 ORDER BY product_id",
                    SELECT_COLUMNS
                ))
                .bind(id)
                .fetch_all(&self.db)
                .await?
            }
            (None, None) => {
                return Err(AppError::ValidationError(
                    "Either a product name or a product id is required".to_string(),
                ));
            }
        };

        let items: Vec<InventoryItem> = rows.into_iter().map(Into::into).collect();
        Ok(ProductDetails::from_rows(&items))
    }

    /// The full current stock snapshot
    pub async fn list(&self) -> AppResult<Vec<InventoryItem>> {
        let rows = sqlx::query_as::<_, InventoryRow>(&format!(
            "SELECT {} FROM inventory ORDER BY product_id",
            SELECT_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// All stock rows for one supplier
    pub async fn list_by_supplier(&self, supplier: &str) -> AppResult<Vec<InventoryItem>> {
        let rows = sqlx::query_as::<_, InventoryRow>(&format!(
            "SELECT {} FROM inventory WHERE supplier = $1 ORDER BY product_id",
            SELECT_COLUMNS
        ))
        .bind(supplier)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Whether any row carries this product name
    pub(crate) async fn name_exists_on(
        conn: &mut PgConnection,
        product_name: &str,
    ) -> AppResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM inventory WHERE product_name = $1)",
        )
        .bind(product_name)
        .fetch_one(&mut *conn)
        .await?;
        Ok(exists)
    }

    /// The stock row for (product_name, unit), if any
    pub(crate) async fn find_by_name_unit_on(
        conn: &mut PgConnection,
        product_name: &str,
        unit: &str,
    ) -> AppResult<Option<InventoryItem>> {
        let row = sqlx::query_as::<_, InventoryRow>(&format!(
            "SELECT {} FROM inventory WHERE product_name = $1 AND unit = $2 ORDER BY product_id LIMIT 1",
            SELECT_COLUMNS
        ))
        .bind(product_name)
        .bind(unit)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(row.map(Into::into))
    }

    /// The stock row for the full (product_name, unit, supplier) triple
    pub(crate) async fn find_by_name_unit_supplier_on(
        conn: &mut PgConnection,
        product_name: &str,
        unit: &str,
        supplier: &str,
    ) -> AppResult<Option<InventoryItem>> {
        let row = sqlx::query_as::<_, InventoryRow>(&format!(
            "SELECT {} FROM inventory WHERE product_name = $1 AND unit = $2 AND supplier = $3",
            SELECT_COLUMNS
        ))
        .bind(product_name)
        .bind(unit)
        .bind(supplier)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(row.map(Into::into))
    }
}
