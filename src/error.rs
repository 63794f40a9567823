use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or malformed required field (400)
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Business-state conflict, e.g. paying an already-paid order (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Signature or amount mismatch on a gateway callback (400)
    #[error("Integrity error: {0}")]
    Integrity(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Standard REST error body: `{message, error?}`.
#[derive(Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, detail) = match self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, m, None),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, m, None),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string(), None),
            AppError::Forbidden(m) => (StatusCode::FORBIDDEN, m, None),
            AppError::Conflict(m) => (StatusCode::CONFLICT, m, None),
            AppError::Integrity(m) => (StatusCode::BAD_REQUEST, m, None),
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    msg::INTERNAL.to_string(),
                    None,
                )
            }
            AppError::Pool(e) => {
                tracing::error!("Pool error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    msg::INTERNAL.to_string(),
                    None,
                )
            }
            AppError::Internal(m) => {
                tracing::error!("Internal error: {}", m);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    msg::INTERNAL.to_string(),
                    None,
                )
            }
        };

        let body = ErrorBody {
            message,
            error: detail,
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Lift `Option<T>` lookups into `Result<T>` with a not-found message.
pub trait OptionExt<T> {
    fn or_not_found(self, message: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn or_not_found(self, message: &str) -> Result<T> {
        self.ok_or_else(|| AppError::NotFound(message.to_string()))
    }
}

/// Centralized user-facing message strings.
pub mod msg {
    pub const INTERNAL: &str = "Internal server error";

    pub const ACCOUNT_NOT_FOUND: &str = "Account not found";
    pub const ORDER_NOT_FOUND: &str = "Order not found";
    pub const ORDER_DETAIL_NOT_FOUND: &str = "Order detail not found";
    pub const CATEGORY_NOT_FOUND: &str = "Category not found";
    pub const PRODUCT_NOT_FOUND: &str = "Product not found";
    pub const VARIANT_NOT_FOUND: &str = "Product variant not found";
    pub const COLOR_NOT_FOUND: &str = "Color not found";
    pub const SIZE_NOT_FOUND: &str = "Size not found";
    pub const IMAGE_NOT_FOUND: &str = "Product image not found";
    pub const CART_ITEM_NOT_FOUND: &str = "Cart item not found";
    pub const FAVORITE_NOT_FOUND: &str = "Favorite not found";
    pub const IMPORT_BILL_NOT_FOUND: &str = "Import bill not found";

    pub const ORDER_ALREADY_PAID: &str = "Order already paid";
    pub const AMOUNT_MISMATCH: &str = "Amount mismatch";
    pub const CHECKSUM_FAILED: &str = "Checksum failed";
}
