//! Account administration. Listing, creation and deletion are staff
//! operations; an account can always read and update itself.

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
use crate::error::{msg, AppError, OptionExt, Result};
use crate::extractors::{Json, Path};
use crate::models::{Account, CreateAccount, UpdateAccount};

use super::auth::hash_password;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_account).get(list_accounts))
        .route(
            "/{id}",
            get(get_account).put(update_account).delete(delete_account),
        )
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

async fn create_account(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(input): Json<CreateAccount>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    auth.ensure_admin()?;
    input.validate()?;

    let conn = state.db.get()?;
    if queries::username_or_email_taken(&conn, &input.username, &input.email)? {
        return Err(AppError::Validation(
            "Username or email already exists".to_string(),
        ));
    }
    let password_hash = hash_password(&input.password)?;
    let account = queries::create_account(&conn, &input, &password_hash)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Account created successfully", "account": account })),
    ))
}

async fn list_accounts(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<Account>>> {
    auth.ensure_elevated()?;
    let conn = state.db.get()?;
    queries::list_accounts(&conn).map(Json)
}

async fn get_account(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Json<Account>> {
    auth.ensure_owner_or_elevated(&id, "Access denied: Can only view own account")?;
    let conn = state.db.get()?;
    let account = queries::get_account_by_id(&conn, &id)?.or_not_found(msg::ACCOUNT_NOT_FOUND)?;
    Ok(Json(account))
}

async fn update_account(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(input): Json<UpdateAccount>,
) -> Result<Json<serde_json::Value>> {
    auth.ensure_owner_or_elevated(&id, "Access denied: Can only update own account")?;
    // Role and status changes stay an admin capability.
    if (input.role.is_some() || input.acc_status.is_some()) && auth.ensure_admin().is_err() {
        return Err(AppError::Forbidden(
            "Only admins can change role or status".to_string(),
        ));
    }
    input.validate()?;

    let conn = state.db.get()?;
    let account =
        queries::update_account(&conn, &id, &input)?.or_not_found(msg::ACCOUNT_NOT_FOUND)?;
    Ok(Json(
        json!({ "message": "Account updated successfully", "account": account }),
    ))
}

async fn delete_account(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    auth.ensure_admin()?;
    let conn = state.db.get()?;
    if !queries::delete_account(&conn, &id)? {
        return Err(AppError::NotFound(msg::ACCOUNT_NOT_FOUND.to_string()));
    }
    Ok(Json(json!({ "message": "Account deleted successfully" })))
}
