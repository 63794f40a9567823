use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::auth::{require_auth, AuthContext};
use crate::db::{queries, AppState};
use crate::error::{msg, OptionExt, Result};
use crate::extractors::{Json, Path, Query};
use crate::models::{CreateOrderDetail, OrderDetail, OrderDetailSearchQuery, UpdateOrderDetail};

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_order_detail).get(list_order_details))
        .route("/search", get(search_order_details))
        .route(
            "/{id}",
            get(get_order_detail)
                .put(update_order_detail)
                .delete(delete_order_detail),
        )
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

async fn create_order_detail(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(input): Json<CreateOrderDetail>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    input.validate()?;
    let conn = state.db.get()?;
    let order =
        queries::get_order_by_id(&conn, &input.order_id)?.or_not_found(msg::ORDER_NOT_FOUND)?;
    auth.ensure_owner_or_elevated(
        &order.acc_id,
        "Access denied: Can only create order detail for own order",
    )?;
    queries::get_variant_by_id(&conn, &input.variant_id)?.or_not_found(msg::VARIANT_NOT_FOUND)?;

    let detail = queries::create_order_detail(&conn, &input)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Order detail created successfully", "orderDetail": detail })),
    ))
}

#[derive(Deserialize)]
struct ListQuery {
    order_id: Option<String>,
}

async fn list_order_details(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<OrderDetail>>> {
    let conn = state.db.get()?;
    queries::list_order_details(&conn, auth.scope(), query.order_id.as_deref()).map(Json)
}

async fn search_order_details(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<OrderDetailSearchQuery>,
) -> Result<Json<Vec<OrderDetail>>> {
    let conn = state.db.get()?;
    queries::search_order_details(&conn, &query, auth.scope()).map(Json)
}

async fn get_order_detail(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Json<OrderDetail>> {
    let conn = state.db.get()?;
    let detail =
        queries::get_order_detail_by_id(&conn, &id)?.or_not_found(msg::ORDER_DETAIL_NOT_FOUND)?;
    let order =
        queries::get_order_by_id(&conn, &detail.order_id)?.or_not_found(msg::ORDER_NOT_FOUND)?;
    auth.ensure_owner_or_elevated(&order.acc_id, "Access denied: Can only view own order detail")?;
    Ok(Json(detail))
}

async fn update_order_detail(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(input): Json<UpdateOrderDetail>,
) -> Result<Json<serde_json::Value>> {
    input.validate()?;
    let conn = state.db.get()?;
    let detail =
        queries::get_order_detail_by_id(&conn, &id)?.or_not_found(msg::ORDER_DETAIL_NOT_FOUND)?;
    let order =
        queries::get_order_by_id(&conn, &detail.order_id)?.or_not_found(msg::ORDER_NOT_FOUND)?;
    auth.ensure_owner_or_elevated(
        &order.acc_id,
        "Access denied: Can only update own order detail",
    )?;

    // Re-validate any reassigned references.
    if let Some(order_id) = &input.order_id {
        queries::get_order_by_id(&conn, order_id)?.or_not_found(msg::ORDER_NOT_FOUND)?;
    }
    if let Some(variant_id) = &input.variant_id {
        queries::get_variant_by_id(&conn, variant_id)?.or_not_found(msg::VARIANT_NOT_FOUND)?;
    }

    let updated = queries::update_order_detail(&conn, &id, &input)?
        .or_not_found(msg::ORDER_DETAIL_NOT_FOUND)?;
    Ok(Json(
        json!({ "message": "Order detail updated successfully", "orderDetail": updated }),
    ))
}

async fn delete_order_detail(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let conn = state.db.get()?;
    let detail =
        queries::get_order_detail_by_id(&conn, &id)?.or_not_found(msg::ORDER_DETAIL_NOT_FOUND)?;
    let order =
        queries::get_order_by_id(&conn, &detail.order_id)?.or_not_found(msg::ORDER_NOT_FOUND)?;
    auth.ensure_owner_or_elevated(
        &order.acc_id,
        "Access denied: Can only delete own order detail",
    )?;
    queries::delete_order_detail(&conn, &id)?;
    Ok(Json(json!({ "message": "Order detail deleted successfully" })))
}
