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
use crate::extractors::{Json, Path};
use crate::models::{Category, CreateCategory};

pub fn router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(create_category))
        .route("/{id}", put(update_category).delete(delete_category))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/", get(list_categories))
        .route("/{id}", get(get_category))
        .merge(protected)
}

async fn create_category(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(input): Json<CreateCategory>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    auth.ensure_elevated()?;
    input.validate()?;

    let conn = state.db.get()?;
    if queries::get_category_by_name(&conn, &input.cat_name)?.is_some() {
        return Err(AppError::Validation(
            "Category name already exists".to_string(),
        ));
    }
    let category = queries::create_category(&conn, &input)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Category created successfully", "category": category })),
    ))
}

async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    let conn = state.db.get()?;
    queries::list_categories(&conn).map(Json)
}

async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Category>> {
    let conn = state.db.get()?;
    let category = queries::get_category_by_id(&conn, &id)?.or_not_found(msg::CATEGORY_NOT_FOUND)?;
    Ok(Json(category))
}

async fn update_category(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(input): Json<CreateCategory>,
) -> Result<Json<serde_json::Value>> {
    auth.ensure_elevated()?;
    input.validate()?;

    let conn = state.db.get()?;
    if let Some(existing) = queries::get_category_by_name(&conn, &input.cat_name)? {
        if existing.id != id {
            return Err(AppError::Validation(
                "Category name already exists".to_string(),
            ));
        }
    }
    let category = queries::update_category(&conn, &id, &input.cat_name)?
        .or_not_found(msg::CATEGORY_NOT_FOUND)?;
    Ok(Json(
        json!({ "message": "Category updated successfully", "category": category }),
    ))
}

async fn delete_category(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    auth.ensure_elevated()?;
    let conn = state.db.get()?;
    if !queries::delete_category(&conn, &id)? {
        return Err(AppError::NotFound(msg::CATEGORY_NOT_FOUND.to_string()));
    }
    Ok(Json(json!({ "message": "Category deleted successfully" })))
}
