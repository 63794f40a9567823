//! Tests for the payment-url builder endpoint: precondition order and URL
//! content.

use axum::http::StatusCode;

mod common;
use common::*;

#[tokio::test]
async fn owner_gets_a_signed_url_with_scaled_amount() {
    let state = create_test_app_state();
    let (order_id, token);
    {
        let conn = state.db.get().unwrap();
        let buyer = create_test_account(&conn, "buyer", Role::User);
        let order = create_test_order(&conn, &buyer.id, 150_000.0);
        token = token_for(&state, &buyer);
        order_id = order.id;
    }

    let path = format!("/api/orders/{}/payment-url?bankCode=NCB", order_id);
    let (status, body) = get(app(state.clone()), &path, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);

    let url = body["paymentUrl"].as_str().expect("paymentUrl missing");
    assert!(url.starts_with("https://sandbox.vnpayment.vn/"));
    assert!(url.contains("vnp_Amount=15000000"));
    assert!(url.contains(&format!("vnp_TxnRef={}", order_id)));
    assert!(url.contains("vnp_BankCode=NCB"));
    assert!(url.contains("vnp_SecureHash="));

    // Requesting a URL does not touch the order.
    let conn = state.db.get().unwrap();
    assert_eq!(pay_status_of(&conn, &order_id), PayStatus::Unpaid);
}

#[tokio::test]
async fn non_owner_is_forbidden_but_staff_is_not() {
    let state = create_test_app_state();
    let (order_id, other_token, manager_token);
    {
        let conn = state.db.get().unwrap();
        let buyer = create_test_account(&conn, "buyer", Role::User);
        let other = create_test_account(&conn, "other", Role::User);
        let manager = create_test_account(&conn, "manager", Role::Manager);
        order_id = create_test_order(&conn, &buyer.id, 150_000.0).id;
        other_token = token_for(&state, &other);
        manager_token = token_for(&state, &manager);
    }

    let path = format!("/api/orders/{}/payment-url", order_id);
    let (status, _) = get(app(state.clone()), &path, Some(&other_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = get(app(state.clone()), &path, Some(&manager_token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn already_paid_order_is_a_conflict() {
    let state = create_test_app_state();
    let (order_id, token);
    {
        let conn = state.db.get().unwrap();
        let buyer = create_test_account(&conn, "buyer", Role::User);
        let order = create_test_order(&conn, &buyer.id, 150_000.0);
        queries::mark_order_paid(&conn, &order.id).unwrap();
        token = token_for(&state, &buyer);
        order_id = order.id;
    }

    let path = format!("/api/orders/{}/payment-url", order_id);
    let (status, body) = get(app(state.clone()), &path, Some(&token)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Order already paid");
}

#[tokio::test]
async fn missing_order_is_a_404() {
    let state = create_test_app_state();
    let token;
    {
        let conn = state.db.get().unwrap();
        let buyer = create_test_account(&conn, "buyer", Role::User);
        token = token_for(&state, &buyer);
    }

    let (status, _) = get(
        app(state.clone()),
        "/api/orders/no-such-order/payment-url",
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn anonymous_request_is_unauthorized() {
    let state = create_test_app_state();
    let (status, _) = get(app(state.clone()), "/api/orders/x/payment-url", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
