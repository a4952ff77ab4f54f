//! Route definitions for the Farmstand POS backend

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public)
        .nest("/auth", auth_routes())
        // Protected routes - inventory
        .nest("/inventory", inventory_routes())
        // Protected routes - transaction recording
        .nest("/transactions", transaction_routes())
        // Protected routes - report generation
        .nest("/reports", report_routes())
        // Protected routes - staff/farmer roster
        .nest("/roster", roster_routes())
        // Protected routes - system settings and shifts
        .nest("/settings", settings_routes())
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new().route("/token", post(handlers::issue_token))
}

/// Inventory routes (protected)
fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_inventory))
        .route("/products", post(handlers::add_product))
        .route("/products/:name", get(handlers::get_product_details))
        .route(
            "/products/by-id/:product_id",
            get(handlers::get_product_details_by_id),
        )
        .route("/suppliers/:supplier", get(handlers::list_by_supplier))
        .route("/adjustments", post(handlers::adjust_quantity))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Transaction recording routes (protected)
fn transaction_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_transactions))
        .route("/purchases", post(handlers::record_purchase))
        .route("/sales", post(handlers::record_sale))
        .route("/returns", post(handlers::record_return))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Report generation routes (protected)
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::generate_reports))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Roster routes (protected)
fn roster_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_actors).post(handlers::create_actor))
        .route("/names", get(handlers::list_actor_names))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Settings routes (protected)
fn settings_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_settings).put(handlers::update_setting),
        )
        .route("/shift", get(handlers::current_shift))
        .route_layer(middleware::from_fn(auth_middleware))
}
