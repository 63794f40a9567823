use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Extension, Router,
};
use serde_json::json;

use crate::auth::{require_auth, AuthContext};
use crate::db::{queries, AppState};
use crate::error::{msg, AppError, OptionExt, Result};
use crate::extractors::{Json, Path, Query};
use crate::models::{CreateProduct, ProductSearchQuery, ProductWithCategory, UpdateProduct};

pub fn router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(create_product))
        .route("/{id}", put(update_product).delete(delete_product))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/", get(list_products))
        .route("/search", get(search_products))
        .route("/{id}", get(get_product))
        .merge(protected)
}

async fn create_product(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(input): Json<CreateProduct>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    auth.ensure_elevated()?;
    input.validate()?;

    let conn = state.db.get()?;
    queries::get_category_by_id(&conn, &input.cat_id)?.or_not_found(msg::CATEGORY_NOT_FOUND)?;
    let product = queries::create_product(&conn, &input)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Product created successfully", "product": product })),
    ))
}

async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<ProductWithCategory>>> {
    let conn = state.db.get()?;
    queries::list_products(&conn).map(Json)
}

async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<ProductSearchQuery>,
) -> Result<Json<Vec<ProductWithCategory>>> {
    let conn = state.db.get()?;
    queries::search_products(&conn, &query).map(Json)
}

async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductWithCategory>> {
    let conn = state.db.get()?;
    let product =
        queries::get_product_with_category(&conn, &id)?.or_not_found(msg::PRODUCT_NOT_FOUND)?;
    Ok(Json(product))
}

async fn update_product(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(input): Json<UpdateProduct>,
) -> Result<Json<serde_json::Value>> {
    auth.ensure_elevated()?;
    input.validate()?;

    let conn = state.db.get()?;
    if let Some(cat_id) = &input.cat_id {
        queries::get_category_by_id(&conn, cat_id)?.or_not_found(msg::CATEGORY_NOT_FOUND)?;
    }
    let product =
        queries::update_product(&conn, &id, &input)?.or_not_found(msg::PRODUCT_NOT_FOUND)?;
    Ok(Json(
        json!({ "message": "Product updated successfully", "product": product }),
    ))
}

async fn delete_product(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    auth.ensure_elevated()?;
    let conn = state.db.get()?;
    if !queries::delete_product(&conn, &id)? {
        return Err(AppError::NotFound(msg::PRODUCT_NOT_FOUND.to_string()));
    }
    Ok(Json(json!({ "message": "Product deleted successfully" })))
}
