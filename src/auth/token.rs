//! Bearer-token issue and verification for account sessions.

use std::sync::Arc;

use jwt_simple::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{Account, Role};

/// Custom claims carried in every session token. Standard claims
/// (iat, exp) are handled by jwt-simple.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthClaims {
    pub account_id: String,
    pub username: String,
    pub role: Role,
}

/// HS256 signer/verifier shared across handlers via app state.
#[derive(Clone)]
pub struct TokenSigner {
    key: Arc<HS256Key>,
}

impl TokenSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            key: Arc::new(HS256Key::from_bytes(secret.as_bytes())),
        }
    }

    /// Issue a 24-hour session token for an account.
    pub fn issue(&self, account: &Account) -> Result<String> {
        let claims = Claims::with_custom_claims(
            AuthClaims {
                account_id: account.id.clone(),
                username: account.username.clone(),
                role: account.role,
            },
            Duration::from_hours(24),
        );
        self.key
            .authenticate(claims)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Verify a token and return its claims. Any failure (bad signature,
    /// expiry, malformed token) is an authentication failure.
    pub fn verify(&self, token: &str) -> Result<AuthClaims> {
        self.key
            .verify_token::<AuthClaims>(token, None)
            .map(|claims| claims.custom)
            .map_err(|_| AppError::Unauthorized)
    }
}
