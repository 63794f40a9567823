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
use crate::extractors::{Json, Path};
use crate::models::{CartItem, CreateCartItem, UpdateCartItem};

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_cart_item).get(list_cart_items))
        .route(
            "/{id}",
            get(get_cart_item)
                .put(update_cart_item)
                .delete(delete_cart_item),
        )
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

async fn create_cart_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(input): Json<CreateCartItem>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    input.validate()?;
    auth.ensure_owner_or_elevated(
        &input.acc_id,
        "Access denied: Can only add to own cart",
    )?;

    let conn = state.db.get()?;
    queries::get_account_by_id(&conn, &input.acc_id)?.or_not_found(msg::ACCOUNT_NOT_FOUND)?;
    queries::get_variant_by_id(&conn, &input.variant_id)?.or_not_found(msg::VARIANT_NOT_FOUND)?;
    let item = queries::create_cart_item(&conn, &input)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Cart item created successfully", "cartItem": item })),
    ))
}

async fn list_cart_items(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<CartItem>>> {
    let conn = state.db.get()?;
    queries::list_cart_items(&conn, auth.scope()).map(Json)
}

async fn get_cart_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Json<CartItem>> {
    let conn = state.db.get()?;
    let item = queries::get_cart_item_by_id(&conn, &id)?.or_not_found(msg::CART_ITEM_NOT_FOUND)?;
    auth.ensure_owner_or_elevated(&item.acc_id, "Access denied: Can only view own cart")?;
    Ok(Json(item))
}

async fn update_cart_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(input): Json<UpdateCartItem>,
) -> Result<Json<serde_json::Value>> {
    input.validate()?;
    let conn = state.db.get()?;
    let item = queries::get_cart_item_by_id(&conn, &id)?.or_not_found(msg::CART_ITEM_NOT_FOUND)?;
    auth.ensure_owner_or_elevated(&item.acc_id, "Access denied: Can only update own cart")?;

    let updated =
        queries::update_cart_item(&conn, &item, &input)?.or_not_found(msg::CART_ITEM_NOT_FOUND)?;
    Ok(Json(
        json!({ "message": "Cart item updated successfully", "cartItem": updated }),
    ))
}

async fn delete_cart_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let conn = state.db.get()?;
    let item = queries::get_cart_item_by_id(&conn, &id)?.or_not_found(msg::CART_ITEM_NOT_FOUND)?;
    auth.ensure_owner_or_elevated(&item.acc_id, "Access denied: Can only delete own cart")?;
    queries::delete_cart_item(&conn, &id)?;
    Ok(Json(json!({ "message": "Cart item deleted successfully" })))
}
