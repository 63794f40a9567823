//! Aggregate statistics for staff dashboards.

use axum::{extract::State, middleware, routing::get, Extension, Router};

use crate::auth::{require_auth, AuthContext};
use crate::db::{queries, AppState};
use crate::error::Result;
use crate::extractors::Json;
use crate::models::{CustomerStats, OrderStats, PeriodRevenue, RevenueStats};

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/customers", get(customer_stats))
        .route("/revenue", get(revenue_stats))
        .route("/orders", get(order_stats))
        .route("/revenue/week", get(revenue_by_week))
        .route("/revenue/month", get(revenue_by_month))
        .route("/revenue/year", get(revenue_by_year))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

async fn customer_stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<CustomerStats>> {
    auth.ensure_elevated()?;
    let conn = state.db.get()?;
    queries::customer_stats(&conn).map(Json)
}

async fn revenue_stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<RevenueStats>> {
    auth.ensure_elevated()?;
    let conn = state.db.get()?;
    queries::revenue_stats(&conn).map(Json)
}

async fn order_stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<OrderStats>> {
    auth.ensure_elevated()?;
    let conn = state.db.get()?;
    queries::order_stats(&conn).map(Json)
}

async fn revenue_by_week(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<PeriodRevenue>>> {
    auth.ensure_elevated()?;
    let conn = state.db.get()?;
    queries::revenue_by_period(&conn, "%Y-%W").map(Json)
}

async fn revenue_by_month(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<PeriodRevenue>>> {
    auth.ensure_elevated()?;
    let conn = state.db.get()?;
    queries::revenue_by_period(&conn, "%Y-%m").map(Json)
}

async fn revenue_by_year(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<PeriodRevenue>>> {
    auth.ensure_elevated()?;
    let conn = state.db.get()?;
    queries::revenue_by_period(&conn, "%Y").map(Json)
}
