//! Statistics and import-bill endpoints (staff only).

use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::*;

#[tokio::test]
async fn revenue_counts_only_paid_orders() {
    let state = create_test_app_state();
    let admin_token;
    {
        let conn = state.db.get().unwrap();
        let buyer = create_test_account(&conn, "buyer", Role::User);
        let admin = create_test_account(&conn, "admin", Role::Admin);
        let paid = create_test_order(&conn, &buyer.id, 300_000.0);
        queries::mark_order_paid(&conn, &paid.id).unwrap();
        create_test_order(&conn, &buyer.id, 500_000.0); // unpaid, excluded
        admin_token = token_for(&state, &admin);
    }

    let (status, body) = get(
        app(state.clone()),
        "/api/statistics/revenue",
        Some(&admin_token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_revenue"], 300000.0);
    assert_eq!(body["average_order_value"], 300000.0);
}

#[tokio::test]
async fn order_stats_break_down_by_status() {
    let state = create_test_app_state();
    let admin_token;
    {
        let conn = state.db.get().unwrap();
        let buyer = create_test_account(&conn, "buyer", Role::User);
        let admin = create_test_account(&conn, "admin", Role::Admin);
        let a = create_test_order(&conn, &buyer.id, 100.0);
        queries::mark_order_paid(&conn, &a.id).unwrap();
        create_test_order(&conn, &buyer.id, 100.0);
        create_test_order(&conn, &buyer.id, 100.0);
        admin_token = token_for(&state, &admin);
    }

    let (_, body) = get(
        app(state.clone()),
        "/api/statistics/orders",
        Some(&admin_token),
    )
    .await;
    assert_eq!(body["total_orders"], 3);
    let pay_counts = body["pay_status_counts"].as_array().unwrap();
    let paid = pay_counts.iter().find(|c| c["status"] == "paid").unwrap();
    assert_eq!(paid["count"], 1);
    let unpaid = pay_counts.iter().find(|c| c["status"] == "unpaid").unwrap();
    assert_eq!(unpaid["count"], 2);
}

#[tokio::test]
async fn statistics_are_hidden_from_plain_users() {
    let state = create_test_app_state();
    let user_token;
    {
        let conn = state.db.get().unwrap();
        let user = create_test_account(&conn, "user", Role::User);
        user_token = token_for(&state, &user);
    }

    for path in [
        "/api/statistics/customers",
        "/api/statistics/revenue",
        "/api/statistics/orders",
        "/api/statistics/revenue/week",
    ] {
        let (status, _) = get(app(state.clone()), path, Some(&user_token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "expected 403 for {}", path);
    }
}

#[tokio::test]
async fn customer_stats_count_roles_and_statuses() {
    let state = create_test_app_state();
    let admin_token;
    {
        let conn = state.db.get().unwrap();
        create_test_account(&conn, "u1", Role::User);
        create_test_account(&conn, "u2", Role::User);
        let admin = create_test_account(&conn, "admin", Role::Admin);
        admin_token = token_for(&state, &admin);
    }

    let (_, body) = get(
        app(state.clone()),
        "/api/statistics/customers",
        Some(&admin_token),
    )
    .await;
    assert_eq!(body["total_customers"], 3);
    assert_eq!(body["active_customers"], 3);
    let roles = body["role_counts"].as_array().unwrap();
    let users = roles.iter().find(|c| c["status"] == "user").unwrap();
    assert_eq!(users["count"], 2);
}

mod import_bills {
    use super::*;

    fn seeded_variant(conn: &rusqlite::Connection) -> String {
        let category = queries::create_category(
            conn,
            &CreateCategory {
                cat_name: "Socks".to_string(),
            },
        )
        .unwrap();
        let product = queries::create_product(
            conn,
            &CreateProduct {
                pro_name: "Wool Socks".to_string(),
                cat_id: category.id,
                pro_price: 50_000.0,
                image_url: None,
                description: None,
                status_product: None,
            },
        )
        .unwrap();
        let color = queries::create_color(
            conn,
            &CreateProductColor {
                color_name: "Grey".to_string(),
            },
        )
        .unwrap();
        let size = queries::create_size(
            conn,
            &CreateProductSize {
                size_name: "L".to_string(),
            },
        )
        .unwrap();
        let image = queries::create_image(
            conn,
            &CreateProductImage {
                pro_id: product.id.clone(),
                image_url: "https://example.com/socks.jpg".to_string(),
            },
        )
        .unwrap();
        queries::create_variant(
            conn,
            &CreateVariant {
                pro_id: product.id,
                color_id: color.id,
                size_id: size.id,
                image_id: image.id,
            },
        )
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn creating_a_bill_records_details_and_warehouse_stock() {
        let state = create_test_app_state();
        let (admin_token, variant_id);
        {
            let conn = state.db.get().unwrap();
            let admin = create_test_account(&conn, "admin", Role::Admin);
            admin_token = token_for(&state, &admin);
            variant_id = seeded_variant(&conn);
        }

        let (status, body) = send_request(
            app(state.clone()),
            "POST",
            "/api/importbills",
            Some(&admin_token),
            Some(json!({
                "create_date": "2024-03-01",
                "total_amount": 1200000.0,
                "details": [
                    { "variant_id": variant_id, "quantity": 40, "import_price": 30000.0 }
                ]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let bill_id = body["importBill"]["id"].as_str().unwrap().to_string();

        let (_, body) = get(
            app(state.clone()),
            &format!("/api/importbills/{}", bill_id),
            Some(&admin_token),
        )
        .await;
        assert_eq!(body["details"].as_array().unwrap().len(), 1);
        assert_eq!(body["details"][0]["quantity"], 40);

        let (_, entries) = get(
            app(state.clone()),
            &format!("/api/importbills/warehouse?variant_id={}", variant_id),
            Some(&admin_token),
        )
        .await;
        assert_eq!(entries.as_array().unwrap().len(), 1);
        assert_eq!(entries[0]["inventory_number"], 40);
    }

    #[tokio::test]
    async fn search_validates_its_ranges() {
        let state = create_test_app_state();
        let admin_token;
        {
            let conn = state.db.get().unwrap();
            let admin = create_test_account(&conn, "admin", Role::Admin);
            admin_token = token_for(&state, &admin);
        }

        let (status, _) = get(
            app(state.clone()),
            "/api/importbills/search?startDate=2024-05-01&endDate=2024-04-01",
            Some(&admin_token),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get(
            app(state.clone()),
            "/api/importbills/search?minAmount=100&maxAmount=50",
            Some(&admin_token),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get(
            app(state.clone()),
            "/api/importbills/search?startDate=not-a-date",
            Some(&admin_token),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
