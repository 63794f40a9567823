//! Registration, login, bearer access and the OTP flows.

use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::*;

fn register_body(username: &str, email: &str) -> serde_json::Value {
    json!({
        "username": username,
        "name": "New Buyer",
        "email": email,
        "phone": "0123456789",
        "address": "9 Signup Street",
        "password": "password123"
    })
}

#[tokio::test]
async fn register_login_then_bearer_access() {
    let state = create_test_app_state();

    let (status, body) = send_request(
        app(state.clone()),
        "POST",
        "/api/auth/register",
        None,
        Some(register_body("newbuyer", "newbuyer@example.com")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["account"]["role"], "user");
    assert!(body["account"].get("password_hash").is_none());

    let (status, body) = send_request(
        app(state.clone()),
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "newbuyer", "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = get(app(state.clone()), "/api/orders", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn registration_never_grants_elevated_roles() {
    let state = create_test_app_state();

    let mut body = register_body("sneaky", "sneaky@example.com");
    body["role"] = json!("admin");
    let (status, response) = send_request(
        app(state.clone()),
        "POST",
        "/api/auth/register",
        None,
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response["account"]["role"], "user");
}

#[tokio::test]
async fn duplicate_username_or_email_is_rejected() {
    let state = create_test_app_state();

    send_request(
        app(state.clone()),
        "POST",
        "/api/auth/register",
        None,
        Some(register_body("dupe", "dupe@example.com")),
    )
    .await;

    let (status, _) = send_request(
        app(state.clone()),
        "POST",
        "/api/auth/register",
        None,
        Some(register_body("dupe", "fresh@example.com")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn wrong_password_and_inactive_accounts_cannot_log_in() {
    let state = create_test_app_state();
    {
        let conn = state.db.get().unwrap();
        create_test_account(&conn, "buyer", Role::User);
        let frozen = create_test_account(&conn, "frozen", Role::User);
        queries::update_account(
            &conn,
            &frozen.id,
            &UpdateAccount {
                acc_status: Some(AccountStatus::Suspended),
                ..Default::default()
            },
        )
        .unwrap();
    }

    let (status, _) = send_request(
        app(state.clone()),
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "buyer", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send_request(
        app(state.clone()),
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "frozen", "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn register_otp_round_trip_is_single_use() {
    let state = create_test_app_state();

    let (status, body) = send_request(
        app(state.clone()),
        "POST",
        "/api/auth/register/request-otp",
        None,
        Some(json!({ "email": "otp@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let otp = body["otp"].as_str().unwrap().to_string();
    assert_eq!(otp.len(), 6);

    let verify = json!({ "email": "otp@example.com", "otp": otp });
    let (status, _) = send_request(
        app(state.clone()),
        "POST",
        "/api/auth/register/verify-otp",
        None,
        Some(verify.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Consumed: the same code cannot be verified twice.
    let (status, _) = send_request(
        app(state.clone()),
        "POST",
        "/api/auth/register/verify-otp",
        None,
        Some(verify),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn forgot_password_flow_resets_the_password() {
    let state = create_test_app_state();
    {
        let conn = state.db.get().unwrap();
        create_test_account(&conn, "buyer", Role::User);
    }

    let (status, body) = send_request(
        app(state.clone()),
        "POST",
        "/api/auth/forgot-password/request-otp",
        None,
        Some(json!({ "email": "buyer@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let otp = body["otp"].as_str().unwrap().to_string();

    let (status, _) = send_request(
        app(state.clone()),
        "POST",
        "/api/auth/forgot-password/verify-otp",
        None,
        Some(json!({ "email": "buyer@example.com", "otp": otp })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_request(
        app(state.clone()),
        "POST",
        "/api/auth/reset-password",
        None,
        Some(json!({ "email": "buyer@example.com", "newPassword": "fresh-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_request(
        app(state.clone()),
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "buyer", "password": "fresh-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn forgot_password_otp_requires_an_existing_account() {
    let state = create_test_app_state();
    let (status, _) = send_request(
        app(state.clone()),
        "POST",
        "/api/auth/forgot-password/request-otp",
        None,
        Some(json!({ "email": "ghost@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn account_listing_is_staff_only() {
    let state = create_test_app_state();
    let (user_token, admin_token);
    {
        let conn = state.db.get().unwrap();
        let user = create_test_account(&conn, "user", Role::User);
        let admin = create_test_account(&conn, "admin", Role::Admin);
        user_token = token_for(&state, &user);
        admin_token = token_for(&state, &admin);
    }

    let (status, _) = get(app(state.clone()), "/api/accounts", Some(&user_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = get(app(state.clone()), "/api/accounts", Some(&admin_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}
