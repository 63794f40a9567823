//! Order CRUD, ownership and search.

use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::*;

fn order_body(acc_id: &str) -> serde_json::Value {
    json!({
        "acc_id": acc_id,
        "address_receive": "42 Delivery Lane",
        "phone": "0987654321",
        "total_price": 150000.0
    })
}

#[tokio::test]
async fn user_creates_own_order_but_not_for_others() {
    let state = create_test_app_state();
    let (buyer, other, buyer_token);
    {
        let conn = state.db.get().unwrap();
        buyer = create_test_account(&conn, "buyer", Role::User);
        other = create_test_account(&conn, "other", Role::User);
        buyer_token = token_for(&state, &buyer);
    }

    let (status, body) = send_request(
        app(state.clone()),
        "POST",
        "/api/orders",
        Some(&buyer_token),
        Some(order_body(&buyer.id)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["order"]["pay_status"], "unpaid");
    assert_eq!(body["order"]["order_status"], "pending");

    let (status, _) = send_request(
        app(state.clone()),
        "POST",
        "/api/orders",
        Some(&buyer_token),
        Some(order_body(&other.id)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn staff_creates_orders_for_anyone_and_owner_must_exist() {
    let state = create_test_app_state();
    let (buyer, admin_token);
    {
        let conn = state.db.get().unwrap();
        buyer = create_test_account(&conn, "buyer", Role::User);
        let admin = create_test_account(&conn, "admin", Role::Admin);
        admin_token = token_for(&state, &admin);
    }

    let (status, _) = send_request(
        app(state.clone()),
        "POST",
        "/api/orders",
        Some(&admin_token),
        Some(order_body(&buyer.id)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send_request(
        app(state.clone()),
        "POST",
        "/api/orders",
        Some(&admin_token),
        Some(order_body("ghost-account")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Account not found");
}

#[tokio::test]
async fn malformed_phone_is_rejected() {
    let state = create_test_app_state();
    let (buyer, token);
    {
        let conn = state.db.get().unwrap();
        buyer = create_test_account(&conn, "buyer", Role::User);
        token = token_for(&state, &buyer);
    }

    let mut body = order_body(&buyer.id);
    body["phone"] = json!("12345");
    let (status, _) = send_request(
        app(state.clone()),
        "POST",
        "/api/orders",
        Some(&token),
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn listing_is_scoped_to_the_caller_unless_elevated() {
    let state = create_test_app_state();
    let (buyer_token, admin_token);
    {
        let conn = state.db.get().unwrap();
        let buyer = create_test_account(&conn, "buyer", Role::User);
        let other = create_test_account(&conn, "other", Role::User);
        let admin = create_test_account(&conn, "admin", Role::Admin);
        create_test_order(&conn, &buyer.id, 100.0);
        create_test_order(&conn, &other.id, 200.0);
        buyer_token = token_for(&state, &buyer);
        admin_token = token_for(&state, &admin);
    }

    let (_, body) = get(app(state.clone()), "/api/orders", Some(&buyer_token)).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, body) = get(app(state.clone()), "/api/orders", Some(&admin_token)).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn reading_anothers_order_is_forbidden() {
    let state = create_test_app_state();
    let (order_id, other_token);
    {
        let conn = state.db.get().unwrap();
        let buyer = create_test_account(&conn, "buyer", Role::User);
        let other = create_test_account(&conn, "other", Role::User);
        order_id = create_test_order(&conn, &buyer.id, 100.0).id;
        other_token = token_for(&state, &other);
    }

    let path = format!("/api/orders/{}", order_id);
    let (status, _) = get(app(state.clone()), &path, Some(&other_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn owner_updates_status_fields() {
    let state = create_test_app_state();
    let (order_id, token);
    {
        let conn = state.db.get().unwrap();
        let buyer = create_test_account(&conn, "buyer", Role::User);
        order_id = create_test_order(&conn, &buyer.id, 100.0).id;
        token = token_for(&state, &buyer);
    }

    let path = format!("/api/orders/{}", order_id);
    let (status, body) = send_request(
        app(state.clone()),
        "PUT",
        &path,
        Some(&token),
        Some(json!({ "order_status": "confirmed", "feedback_order": "great" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"]["order_status"], "confirmed");
    assert_eq!(body["order"]["feedback_order"], "great");
}

#[tokio::test]
async fn delete_respects_ownership() {
    let state = create_test_app_state();
    let (order_id, other_token, owner_token);
    {
        let conn = state.db.get().unwrap();
        let buyer = create_test_account(&conn, "buyer", Role::User);
        let other = create_test_account(&conn, "other", Role::User);
        order_id = create_test_order(&conn, &buyer.id, 100.0).id;
        other_token = token_for(&state, &other);
        owner_token = token_for(&state, &buyer);
    }

    let path = format!("/api/orders/{}", order_id);
    let (status, _) = send_request(app(state.clone()), "DELETE", &path, Some(&other_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send_request(app(state.clone()), "DELETE", &path, Some(&owner_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = get(app(state.clone()), &path, Some(&owner_token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_filters_by_status_price_and_free_text() {
    let state = create_test_app_state();
    let (admin_token, paid_id);
    {
        let conn = state.db.get().unwrap();
        let buyer = create_test_account(&conn, "buyer", Role::User);
        let admin = create_test_account(&conn, "admin", Role::Admin);
        let paid = create_test_order(&conn, &buyer.id, 500_000.0);
        queries::mark_order_paid(&conn, &paid.id).unwrap();
        create_test_order(&conn, &buyer.id, 80_000.0);
        admin_token = token_for(&state, &admin);
        paid_id = paid.id;
    }

    // Status filter.
    let (_, body) = get(
        app(state.clone()),
        "/api/orders/search?pay_status=paid",
        Some(&admin_token),
    )
    .await;
    let hits = body.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["id"], paid_id.as_str());

    // Price range.
    let (_, body) = get(
        app(state.clone()),
        "/api/orders/search?minPrice=100000",
        Some(&admin_token),
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    // Free-text token matching the delivery address.
    let (_, body) = get(
        app(state.clone()),
        "/api/orders/search?q=Delivery",
        Some(&admin_token),
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    // Free-text token as a literal id.
    let path = format!("/api/orders/search?q={}", paid_id);
    let (_, body) = get(app(state.clone()), &path, Some(&admin_token)).await;
    let hits = body.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["id"], paid_id.as_str());
}

#[tokio::test]
async fn search_is_scoped_for_plain_users() {
    let state = create_test_app_state();
    let buyer_token;
    {
        let conn = state.db.get().unwrap();
        let buyer = create_test_account(&conn, "buyer", Role::User);
        let other = create_test_account(&conn, "other", Role::User);
        create_test_order(&conn, &buyer.id, 100.0);
        create_test_order(&conn, &other.id, 100.0);
        buyer_token = token_for(&state, &buyer);
    }

    // Even an explicit acc_id filter cannot widen a plain user's scope.
    let (_, body) = get(
        app(state.clone()),
        "/api/orders/search?q=Delivery",
        Some(&buyer_token),
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}
