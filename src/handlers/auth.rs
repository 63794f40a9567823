//! Registration, login and the OTP flows.
//!
//! OTP codes are held in the injected [`crate::otp::OtpStore`]; delivering
//! them by email is out of scope, so issue endpoints return the code
//! directly to the caller.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, http::StatusCode, routing::post, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::db::{queries, AppState};
use crate::error::{AppError, OptionExt, Result};
use crate::extractors::Json;
use crate::models::{Account, AccountStatus, CreateAccount};
use crate::util::is_valid_email;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/register/request-otp", post(request_register_otp))
        .route("/register/verify-otp", post(verify_register_otp))
        .route("/forgot-password/request-otp", post(request_forgot_otp))
        .route("/forgot-password/verify-otp", post(verify_forgot_otp))
        .route("/reset-password", post(reset_password))
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .and_then(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed))
        .is_ok()
}

#[derive(Serialize)]
struct AuthResponse {
    message: &'static str,
    token: String,
    account: Account,
}

async fn register(
    State(state): State<AppState>,
    Json(input): Json<CreateAccount>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    // Self-registration never grants a privileged role or status.
    let input = CreateAccount {
        role: None,
        acc_status: None,
        ..input
    };
    input.validate()?;

    let conn = state.db.get()?;
    if queries::username_or_email_taken(&conn, &input.username, &input.email)? {
        return Err(AppError::Validation(
            "Username or email already exists".to_string(),
        ));
    }

    let password_hash = hash_password(&input.password)?;
    let account = queries::create_account(&conn, &input, &password_hash)?;
    let token = state.tokens.issue(&account)?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "Registration successful",
            token,
            account,
        }),
    ))
}

#[derive(Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    if input.username.is_empty() || input.password.is_empty() {
        return Err(AppError::Validation(
            "Username and password are required".to_string(),
        ));
    }

    let conn = state.db.get()?;
    let account =
        queries::get_account_by_username(&conn, &input.username)?.ok_or(AppError::Unauthorized)?;
    if !verify_password(&input.password, &account.password_hash) {
        return Err(AppError::Unauthorized);
    }
    if account.acc_status != AccountStatus::Active {
        return Err(AppError::Forbidden(
            "Account is inactive or suspended".to_string(),
        ));
    }

    let token = state.tokens.issue(&account)?;
    Ok(Json(AuthResponse {
        message: "Login successful",
        token,
        account,
    }))
}

#[derive(Deserialize)]
struct OtpRequest {
    email: String,
}

#[derive(Deserialize)]
struct OtpVerifyRequest {
    email: String,
    otp: String,
}

async fn request_register_otp(
    State(state): State<AppState>,
    Json(input): Json<OtpRequest>,
) -> Result<Json<serde_json::Value>> {
    if !is_valid_email(&input.email) {
        return Err(AppError::Validation("Invalid email address".to_string()));
    }
    let conn = state.db.get()?;
    if queries::get_account_by_email(&conn, &input.email)?.is_some() {
        return Err(AppError::Validation("Email already registered".to_string()));
    }
    let otp = state.otp.issue(&input.email);
    Ok(Json(
        json!({ "message": "OTP generated successfully", "otp": otp }),
    ))
}

async fn verify_register_otp(
    State(state): State<AppState>,
    Json(input): Json<OtpVerifyRequest>,
) -> Result<Json<serde_json::Value>> {
    if !state.otp.verify(&input.email, &input.otp) {
        return Err(AppError::Validation("Invalid or expired OTP".to_string()));
    }
    Ok(Json(json!({ "message": "OTP verified successfully" })))
}

async fn request_forgot_otp(
    State(state): State<AppState>,
    Json(input): Json<OtpRequest>,
) -> Result<Json<serde_json::Value>> {
    if !is_valid_email(&input.email) {
        return Err(AppError::Validation("Invalid email address".to_string()));
    }
    let conn = state.db.get()?;
    queries::get_account_by_email(&conn, &input.email)?
        .or_not_found("No account found with this email")?;
    let otp = state.otp.issue(&input.email);
    Ok(Json(
        json!({ "message": "OTP generated successfully", "otp": otp }),
    ))
}

async fn verify_forgot_otp(
    State(state): State<AppState>,
    Json(input): Json<OtpVerifyRequest>,
) -> Result<Json<serde_json::Value>> {
    let conn = state.db.get()?;
    queries::get_account_by_email(&conn, &input.email)?
        .or_not_found("No account found with this email")?;
    if !state.otp.verify(&input.email, &input.otp) {
        return Err(AppError::Validation("Invalid or expired OTP".to_string()));
    }
    Ok(Json(json!({ "message": "OTP verified successfully" })))
}

#[derive(Deserialize)]
struct ResetPasswordRequest {
    email: String,
    #[serde(rename = "newPassword")]
    new_password: String,
}

async fn reset_password(
    State(state): State<AppState>,
    Json(input): Json<ResetPasswordRequest>,
) -> Result<Json<serde_json::Value>> {
    if input.new_password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters long".to_string(),
        ));
    }
    let conn = state.db.get()?;
    queries::get_account_by_email(&conn, &input.email)?
        .or_not_found("No account found with this email")?;
    let password_hash = hash_password(&input.new_password)?;
    queries::update_account_password(&conn, &input.email, &password_hash)?;
    Ok(Json(json!({ "message": "Password reset successfully" })))
}
