//! HTTP handlers for transaction recording endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::transactions::{
    PurchaseInput, ReturnInput, SaleInput, TransactionFilter, TransactionService,
};
use crate::AppState;
use shared::models::TransactionRecord;

/// Record stock in from a supplier
pub async fn record_purchase(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<PurchaseInput>,
) -> AppResult<Json<TransactionRecord>> {
    tracing::info!(
        "{} recording purchase of {} from {}",
        current_user.0.email,
        input.product_name,
        input.supplier
    );
    let service = TransactionService::new(state.db);
    let record = service.record_purchase(input).await?;
    Ok(Json(record))
}

/// Record a counter sale
pub async fn record_sale(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<SaleInput>,
) -> AppResult<Json<TransactionRecord>> {
    tracing::info!(
        "{} recording sale of {} ({})",
        current_user.0.email,
        input.product_name,
        input.shift.as_str()
    );
    let service = TransactionService::new(state.db);
    let record = service.record_sale(input).await?;
    Ok(Json(record))
}

/// Record a return of goods to a supplier
pub async fn record_return(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<ReturnInput>,
) -> AppResult<Json<TransactionRecord>> {
    tracing::info!(
        "{} recording return of {} to {}",
        current_user.0.email,
        input.product_name,
        input.supplier
    );
    let service = TransactionService::new(state.db);
    let record = service.record_return(input).await?;
    Ok(Json(record))
}

/// Ledger rows, optionally filtered by type and date range
pub async fn list_transactions(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(filter): Query<TransactionFilter>,
) -> AppResult<Json<Vec<TransactionRecord>>> {
    let service = TransactionService::new(state.db);
    let records = service.list(&filter).await?;
    Ok(Json(records))
}
