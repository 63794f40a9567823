//! Order CRUD and search. Every mutation goes through the single ownership
//! rule: elevated roles may act on any order, everyone else only on their
//! own.

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Extension, Router,
};
use serde_json::json;

use crate::auth::{require_auth, AuthContext};
use crate::db::{queries, AppState};
use crate::error::{msg, OptionExt, Result};
use crate::extractors::{Json, Path, Query};
use crate::models::{CreateOrder, Order, OrderSearchQuery, UpdateOrder};

use super::payments;

pub fn router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(create_order).get(list_orders))
        .route("/search", get(search_orders))
        .route(
            "/{id}",
            get(get_order).put(update_order).delete(delete_order),
        )
        .route("/{id}/payment-url", get(payments::get_payment_url))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    // Gateway callbacks are public: the browser redirect carries no bearer
    // token and the IPN caller is the gateway itself.
    Router::new()
        .route("/vnpay-return", get(payments::vnpay_return))
        .route(
            "/vnpay-ipn",
            get(payments::vnpay_ipn).post(payments::vnpay_ipn),
        )
        .merge(protected)
}

async fn create_order(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(input): Json<CreateOrder>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    input.validate()?;
    auth.ensure_owner_or_elevated(
        &input.acc_id,
        "Access denied: Can only create order for own account",
    )?;

    let conn = state.db.get()?;
    queries::get_account_by_id(&conn, &input.acc_id)?.or_not_found(msg::ACCOUNT_NOT_FOUND)?;
    let order = queries::create_order(&conn, &input)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Order created successfully", "order": order })),
    ))
}

async fn list_orders(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<Order>>> {
    let conn = state.db.get()?;
    queries::list_orders(&conn, auth.scope()).map(Json)
}

async fn search_orders(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<OrderSearchQuery>,
) -> Result<Json<Vec<Order>>> {
    let conn = state.db.get()?;
    queries::search_orders(&conn, &query, auth.scope()).map(Json)
}

async fn get_order(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Json<Order>> {
    let conn = state.db.get()?;
    let order = queries::get_order_by_id(&conn, &id)?.or_not_found(msg::ORDER_NOT_FOUND)?;
    auth.ensure_owner_or_elevated(&order.acc_id, "Access denied: Can only view own order")?;
    Ok(Json(order))
}

async fn update_order(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(input): Json<UpdateOrder>,
) -> Result<Json<serde_json::Value>> {
    input.validate()?;
    let conn = state.db.get()?;
    let order = queries::get_order_by_id(&conn, &id)?.or_not_found(msg::ORDER_NOT_FOUND)?;
    auth.ensure_owner_or_elevated(&order.acc_id, "Access denied: Can only update own order")?;

    // Reassigning the owner requires the new account to exist.
    if let Some(acc_id) = &input.acc_id {
        queries::get_account_by_id(&conn, acc_id)?.or_not_found(msg::ACCOUNT_NOT_FOUND)?;
    }

    let updated =
        queries::update_order(&conn, &id, &input)?.or_not_found(msg::ORDER_NOT_FOUND)?;
    Ok(Json(
        json!({ "message": "Order updated successfully", "order": updated }),
    ))
}

async fn delete_order(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let conn = state.db.get()?;
    let order = queries::get_order_by_id(&conn, &id)?.or_not_found(msg::ORDER_NOT_FOUND)?;
    auth.ensure_owner_or_elevated(&order.acc_id, "Access denied: Can only delete own order")?;
    queries::delete_order(&conn, &id)?;
    Ok(Json(json!({ "message": "Order deleted successfully" })))
}
