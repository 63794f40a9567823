use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{delete, post},
    Extension, Router,
};
use serde_json::json;

use crate::auth::{require_auth, AuthContext};
use crate::db::{queries, AppState};
use crate::error::{msg, AppError, OptionExt, Result};
use crate::extractors::{Json, Path};
use crate::models::{CreateFavorite, Favorite};

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(add_favorite).get(list_favorites))
        .route("/{id}", delete(delete_favorite))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

async fn add_favorite(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(input): Json<CreateFavorite>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    let conn = state.db.get()?;
    queries::get_product_by_id(&conn, &input.pro_id)?.or_not_found(msg::PRODUCT_NOT_FOUND)?;
    if queries::favorite_exists(&conn, &auth.account_id, &input.pro_id)? {
        return Err(AppError::Validation(
            "Product already in favorites".to_string(),
        ));
    }
    let favorite = queries::add_favorite(&conn, &auth.account_id, &input.pro_id)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Favorite added successfully", "favorite": favorite })),
    ))
}

async fn list_favorites(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<Favorite>>> {
    let conn = state.db.get()?;
    queries::list_favorites_for_account(&conn, &auth.account_id).map(Json)
}

async fn delete_favorite(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let conn = state.db.get()?;
    let favorite =
        queries::get_favorite_by_id(&conn, &id)?.or_not_found(msg::FAVORITE_NOT_FOUND)?;
    auth.ensure_owner_or_elevated(
        &favorite.acc_id,
        "Access denied: Can only remove own favorites",
    )?;
    queries::delete_favorite(&conn, &id)?;
    Ok(Json(json!({ "message": "Favorite removed successfully" })))
}
