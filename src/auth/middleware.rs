use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::db::{queries, AppState};
use crate::error::{AppError, Result};
use crate::models::{AccountStatus, Role};

/// The authenticated caller, injected as a request extension by
/// [`require_auth`].
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub account_id: String,
    pub role: Role,
}

impl AuthContext {
    pub fn is_elevated(&self) -> bool {
        self.role.is_elevated()
    }

    /// The single ownership rule: an actor may act on a resource iff it
    /// holds an elevated role or owns the resource.
    pub fn ensure_owner_or_elevated(&self, owner_id: &str, denied: &str) -> Result<()> {
        if self.is_elevated() || self.account_id == owner_id {
            Ok(())
        } else {
            Err(AppError::Forbidden(denied.to_string()))
        }
    }

    pub fn ensure_elevated(&self) -> Result<()> {
        if self.is_elevated() {
            Ok(())
        } else {
            Err(AppError::Forbidden("Access denied".to_string()))
        }
    }

    pub fn ensure_admin(&self) -> Result<()> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(AppError::Forbidden("Access denied".to_string()))
        }
    }

    /// Account scope for list/search queries: elevated roles see everything,
    /// everyone else only their own rows.
    pub fn scope(&self) -> Option<&str> {
        if self.is_elevated() {
            None
        } else {
            Some(&self.account_id)
        }
    }
}

/// Bearer-token middleware. Verifies the token, re-checks that the account
/// still exists and is active, and injects an [`AuthContext`].
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthorized)?;
    let claims = state.tokens.verify(token)?;

    let conn = state.db.get()?;
    let account =
        queries::get_account_by_id(&conn, &claims.account_id)?.ok_or(AppError::Unauthorized)?;
    if account.acc_status != AccountStatus::Active {
        return Err(AppError::Forbidden("Account is not active".to_string()));
    }

    request.extensions_mut().insert(AuthContext {
        account_id: account.id,
        role: account.role,
    });
    Ok(next.run(request).await)
}
