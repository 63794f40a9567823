//! Product specification attributes: colors, sizes and images. Reads are
//! public; mutations are staff-only.

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Extension, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::auth::{require_auth, AuthContext};
use crate::db::{queries, AppState};
use crate::error::{msg, AppError, OptionExt, Result};
use crate::extractors::{Json, Path};
use crate::models::{
    CreateProductColor, CreateProductImage, CreateProductSize, ProductColor, ProductImage,
    ProductSize,
};

pub fn router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/colors", post(create_color))
        .route("/colors/{id}", put(update_color).delete(delete_color))
        .route("/sizes", post(create_size))
        .route("/sizes/{id}", put(update_size).delete(delete_size))
        .route("/images", post(create_image))
        .route("/images/{id}", put(update_image).delete(delete_image))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/colors", get(list_colors))
        .route("/colors/{id}", get(get_color))
        .route("/sizes", get(list_sizes))
        .route("/sizes/{id}", get(get_size))
        .route("/images", get(list_images))
        .route("/images/{id}", get(get_image))
        .route("/images/product/{pro_id}", get(list_images_for_product))
        .merge(protected)
}

// ---- colors ----

async fn create_color(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(input): Json<CreateProductColor>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    auth.ensure_elevated()?;
    input.validate()?;
    let conn = state.db.get()?;
    let color = queries::create_color(&conn, &input)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Color created successfully", "color": color })),
    ))
}

async fn list_colors(State(state): State<AppState>) -> Result<Json<Vec<ProductColor>>> {
    let conn = state.db.get()?;
    queries::list_colors(&conn).map(Json)
}

async fn get_color(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductColor>> {
    let conn = state.db.get()?;
    let color = queries::get_color_by_id(&conn, &id)?.or_not_found(msg::COLOR_NOT_FOUND)?;
    Ok(Json(color))
}

async fn update_color(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(input): Json<CreateProductColor>,
) -> Result<Json<serde_json::Value>> {
    auth.ensure_elevated()?;
    input.validate()?;
    let conn = state.db.get()?;
    let color = queries::update_color(&conn, &id, &input.color_name)?
        .or_not_found(msg::COLOR_NOT_FOUND)?;
    Ok(Json(
        json!({ "message": "Color updated successfully", "color": color }),
    ))
}

async fn delete_color(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    auth.ensure_elevated()?;
    let conn = state.db.get()?;
    if !queries::delete_color(&conn, &id)? {
        return Err(AppError::NotFound(msg::COLOR_NOT_FOUND.to_string()));
    }
    Ok(Json(json!({ "message": "Color deleted successfully" })))
}

// ---- sizes ----

async fn create_size(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(input): Json<CreateProductSize>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    auth.ensure_elevated()?;
    input.validate()?;
    let conn = state.db.get()?;
    let size = queries::create_size(&conn, &input)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Size created successfully", "size": size })),
    ))
}

async fn list_sizes(State(state): State<AppState>) -> Result<Json<Vec<ProductSize>>> {
    let conn = state.db.get()?;
    queries::list_sizes(&conn).map(Json)
}

async fn get_size(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductSize>> {
    let conn = state.db.get()?;
    let size = queries::get_size_by_id(&conn, &id)?.or_not_found(msg::SIZE_NOT_FOUND)?;
    Ok(Json(size))
}

async fn update_size(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(input): Json<CreateProductSize>,
) -> Result<Json<serde_json::Value>> {
    auth.ensure_elevated()?;
    input.validate()?;
    let conn = state.db.get()?;
    let size =
        queries::update_size(&conn, &id, &input.size_name)?.or_not_found(msg::SIZE_NOT_FOUND)?;
    Ok(Json(
        json!({ "message": "Size updated successfully", "size": size }),
    ))
}

async fn delete_size(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    auth.ensure_elevated()?;
    let conn = state.db.get()?;
    if !queries::delete_size(&conn, &id)? {
        return Err(AppError::NotFound(msg::SIZE_NOT_FOUND.to_string()));
    }
    Ok(Json(json!({ "message": "Size deleted successfully" })))
}

// ---- images ----

async fn create_image(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(input): Json<CreateProductImage>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    auth.ensure_elevated()?;
    if input.image_url.is_empty() {
        return Err(AppError::Validation("Image URL is required".to_string()));
    }
    let conn = state.db.get()?;
    queries::get_product_by_id(&conn, &input.pro_id)?.or_not_found(msg::PRODUCT_NOT_FOUND)?;
    let image = queries::create_image(&conn, &input)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Product image created successfully", "image": image })),
    ))
}

async fn list_images(State(state): State<AppState>) -> Result<Json<Vec<ProductImage>>> {
    let conn = state.db.get()?;
    queries::list_images(&conn).map(Json)
}

async fn list_images_for_product(
    State(state): State<AppState>,
    Path(pro_id): Path<String>,
) -> Result<Json<Vec<ProductImage>>> {
    let conn = state.db.get()?;
    let images = queries::list_images_for_product(&conn, &pro_id)?;
    if images.is_empty() {
        return Err(AppError::NotFound(
            "No images found for this product".to_string(),
        ));
    }
    Ok(Json(images))
}

async fn get_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductImage>> {
    let conn = state.db.get()?;
    let image = queries::get_image_by_id(&conn, &id)?.or_not_found(msg::IMAGE_NOT_FOUND)?;
    Ok(Json(image))
}

#[derive(Deserialize)]
struct UpdateImageRequest {
    image_url: String,
}

async fn update_image(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(input): Json<UpdateImageRequest>,
) -> Result<Json<serde_json::Value>> {
    auth.ensure_elevated()?;
    if input.image_url.is_empty() {
        return Err(AppError::Validation("Image URL is required".to_string()));
    }
    let conn = state.db.get()?;
    let image =
        queries::update_image(&conn, &id, &input.image_url)?.or_not_found(msg::IMAGE_NOT_FOUND)?;
    Ok(Json(
        json!({ "message": "Product image updated successfully", "image": image }),
    ))
}

async fn delete_image(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    auth.ensure_elevated()?;
    let conn = state.db.get()?;
    if !queries::delete_image(&conn, &id)? {
        return Err(AppError::NotFound(msg::IMAGE_NOT_FOUND.to_string()));
    }
    Ok(Json(json!({ "message": "Product image deleted successfully" })))
}
