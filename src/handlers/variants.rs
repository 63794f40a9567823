use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Extension, Router,
};
use rusqlite::Connection;
use serde_json::json;

use crate::auth::{require_auth, AuthContext};
use crate::db::{queries, AppState};
use crate::error::{msg, AppError, OptionExt, Result};
use crate::extractors::{Json, Path, Query};
use crate::models::{CreateVariant, UpdateVariant, VariantExpanded, VariantFilter};

pub fn router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(create_variant))
        .route("/{id}", put(update_variant).delete(delete_variant))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/", get(list_variants))
        .route("/{id}", get(get_variant))
        .merge(protected)
}

/// Every referenced attribute must exist before a variant is written.
fn check_variant_refs(
    conn: &Connection,
    pro_id: Option<&str>,
    color_id: Option<&str>,
    size_id: Option<&str>,
    image_id: Option<&str>,
) -> Result<()> {
    if let Some(pro_id) = pro_id {
        queries::get_product_by_id(conn, pro_id)?.or_not_found(msg::PRODUCT_NOT_FOUND)?;
    }
    if let Some(color_id) = color_id {
        queries::get_color_by_id(conn, color_id)?.or_not_found(msg::COLOR_NOT_FOUND)?;
    }
    if let Some(size_id) = size_id {
        queries::get_size_by_id(conn, size_id)?.or_not_found(msg::SIZE_NOT_FOUND)?;
    }
    if let Some(image_id) = image_id {
        queries::get_image_by_id(conn, image_id)?.or_not_found(msg::IMAGE_NOT_FOUND)?;
    }
    Ok(())
}

async fn create_variant(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(input): Json<CreateVariant>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    auth.ensure_elevated()?;
    let conn = state.db.get()?;
    check_variant_refs(
        &conn,
        Some(&input.pro_id),
        Some(&input.color_id),
        Some(&input.size_id),
        Some(&input.image_id),
    )?;
    let variant = queries::create_variant(&conn, &input)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Product variant created successfully", "variant": variant })),
    ))
}

async fn list_variants(
    State(state): State<AppState>,
    Query(filter): Query<VariantFilter>,
) -> Result<Json<Vec<VariantExpanded>>> {
    let conn = state.db.get()?;
    queries::list_variants(&conn, &filter).map(Json)
}

async fn get_variant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VariantExpanded>> {
    let conn = state.db.get()?;
    let variant = queries::get_variant_expanded(&conn, &id)?.or_not_found(msg::VARIANT_NOT_FOUND)?;
    Ok(Json(variant))
}

async fn update_variant(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(input): Json<UpdateVariant>,
) -> Result<Json<serde_json::Value>> {
    auth.ensure_elevated()?;
    let conn = state.db.get()?;
    check_variant_refs(
        &conn,
        input.pro_id.as_deref(),
        input.color_id.as_deref(),
        input.size_id.as_deref(),
        input.image_id.as_deref(),
    )?;
    let variant =
        queries::update_variant(&conn, &id, &input)?.or_not_found(msg::VARIANT_NOT_FOUND)?;
    Ok(Json(
        json!({ "message": "Product variant updated successfully", "variant": variant }),
    ))
}

async fn delete_variant(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    auth.ensure_elevated()?;
    let conn = state.db.get()?;
    if !queries::delete_variant(&conn, &id)? {
        return Err(AppError::NotFound(msg::VARIANT_NOT_FOUND.to_string()));
    }
    Ok(Json(
        json!({ "message": "Product variant deleted successfully" }),
    ))
}
