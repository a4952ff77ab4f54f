//! HTTP handlers for inventory endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::inventory::{AddProductInput, InventoryService};
use crate::AppState;
use shared::models::{InventoryItem, ProductDetails};

/// The full current stock snapshot
pub async fn list_inventory(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<InventoryItem>>> {
    let service = InventoryService::new(state.db);
    let items = service.list().await?;
    Ok(Json(items))
}

/// Per-unit details for a product name
pub async fn get_product_details(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(name): Path<String>,
) -> AppResult<Json<ProductDetails>> {
    let service = InventoryService::new(state.db);
    let details = service
        .get_details(Some(&name), None)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {}", name)))?;
    Ok(Json(details))
}

/// Per-unit details looked up by product id
pub async fn get_product_details_by_id(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(product_id): Path<i64>,
) -> AppResult<Json<ProductDetails>> {
    let service = InventoryService::new(state.db);
    let details = service
        .get_details(None, Some(product_id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product id {}", product_id)))?;
    Ok(Json(details))
}

/// All stock rows for one supplier
pub async fn list_by_supplier(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(supplier): Path<String>,
) -> AppResult<Json<Vec<InventoryItem>>> {
    let service = InventoryService::new(state.db);
    let items = service.list_by_supplier(&supplier).await?;
    Ok(Json(items))
}

/// Register a product row ahead of its first delivery
pub async fn add_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<AddProductInput>,
) -> AppResult<Json<InventoryItem>> {
    tracing::info!(
        "{} registering product {} ({})",
        current_user.0.email,
        input.product_name,
        input.unit
    );
    let service = InventoryService::new(state.db);
    let item = service.add_product(input).await?;
    Ok(Json(item))
}

/// Manual stock adjustment input
#[derive(Debug, Deserialize)]
pub struct AdjustmentInput {
    pub product_id: i64,
    pub unit: String,
    pub delta: Decimal,
}

/// Apply a manual stock correction (stocktake shrinkage, breakage)
pub async fn adjust_quantity(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<AdjustmentInput>,
) -> AppResult<Json<()>> {
    tracing::info!(
        "{} adjusting product {} ({}) by {}",
        current_user.0.email,
        input.product_id,
        input.unit,
        input.delta
    );
    let service = InventoryService::new(state.db);
    service
        .adjust_quantity(input.product_id, &input.unit, input.delta)
        .await?;
    Ok(Json(()))
}
