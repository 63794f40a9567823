pub mod accounts;
pub mod auth;
pub mod carts;
pub mod categories;
pub mod favorites;
pub mod import_bills;
pub mod order_details;
pub mod orders;
pub mod payments;
pub mod products;
pub mod specs;
pub mod statistics;
pub mod variants;

use axum::{routing::get, Router};
use serde::Serialize;

use crate::db::AppState;
use crate::extractors::Json;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Assemble the full API surface.
pub fn api_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/api/auth", auth::router())
        .nest("/api/accounts", accounts::router(state.clone()))
        .nest("/api/categories", categories::router(state.clone()))
        .nest("/api/products", products::router(state.clone()))
        .nest("/api/specs", specs::router(state.clone()))
        .nest("/api/variants", variants::router(state.clone()))
        .nest("/api/carts", carts::router(state.clone()))
        .nest("/api/orders", orders::router(state.clone()))
        .nest("/api/orderdetails", order_details::router(state.clone()))
        .nest("/api/favorites", favorites::router(state.clone()))
        .nest("/api/importbills", import_bills::router(state.clone()))
        .nest("/api/statistics", statistics::router(state))
}
