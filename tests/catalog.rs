//! Catalog periphery: category/product gating and foreign-entity checks,
//! cart line-total recomputation, favorites.

use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::*;

/// Insert a full variant chain (category -> product -> color/size/image ->
/// variant) and return (product, variant).
fn seed_variant(conn: &rusqlite::Connection) -> (Product, ProductVariant) {
    let category = queries::create_category(
        conn,
        &CreateCategory {
            cat_name: "T-Shirts".to_string(),
        },
    )
    .unwrap();
    let product = queries::create_product(
        conn,
        &CreateProduct {
            pro_name: "Basic Tee".to_string(),
            cat_id: category.id,
            pro_price: 150_000.0,
            image_url: None,
            description: None,
            status_product: None,
        },
    )
    .unwrap();
    let color = queries::create_color(
        conn,
        &CreateProductColor {
            color_name: "Black".to_string(),
        },
    )
    .unwrap();
    let size = queries::create_size(
        conn,
        &CreateProductSize {
            size_name: "M".to_string(),
        },
    )
    .unwrap();
    let image = queries::create_image(
        conn,
        &CreateProductImage {
            pro_id: product.id.clone(),
            image_url: "https://example.com/tee.jpg".to_string(),
        },
    )
    .unwrap();
    let variant = queries::create_variant(
        conn,
        &CreateVariant {
            pro_id: product.id.clone(),
            color_id: color.id,
            size_id: size.id,
            image_id: image.id,
        },
    )
    .unwrap();
    (product, variant)
}

#[tokio::test]
async fn product_mutations_are_staff_only_and_reads_public() {
    let state = create_test_app_state();
    let (user_token, admin_token, cat_id);
    {
        let conn = state.db.get().unwrap();
        let user = create_test_account(&conn, "user", Role::User);
        let admin = create_test_account(&conn, "admin", Role::Admin);
        let category = queries::create_category(
            &conn,
            &CreateCategory {
                cat_name: "Hats".to_string(),
            },
        )
        .unwrap();
        user_token = token_for(&state, &user);
        admin_token = token_for(&state, &admin);
        cat_id = category.id;
    }

    let product = json!({ "pro_name": "Cap", "cat_id": cat_id, "pro_price": 90000.0 });

    let (status, _) = send_request(
        app(state.clone()),
        "POST",
        "/api/products",
        Some(&user_token),
        Some(product.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send_request(
        app(state.clone()),
        "POST",
        "/api/products",
        Some(&admin_token),
        Some(product),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["product"]["status_product"], "active");

    // Reads need no token and carry the joined category name.
    let (status, body) = get(app(state.clone()), "/api/products", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap()[0]["cat_name"], "Hats");
}

#[tokio::test]
async fn product_creation_requires_an_existing_category() {
    let state = create_test_app_state();
    let admin_token;
    {
        let conn = state.db.get().unwrap();
        let admin = create_test_account(&conn, "admin", Role::Admin);
        admin_token = token_for(&state, &admin);
    }

    let (status, body) = send_request(
        app(state.clone()),
        "POST",
        "/api/products",
        Some(&admin_token),
        Some(json!({ "pro_name": "Cap", "cat_id": "ghost", "pro_price": 1.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Category not found");
}

#[tokio::test]
async fn duplicate_category_names_are_rejected() {
    let state = create_test_app_state();
    let admin_token;
    {
        let conn = state.db.get().unwrap();
        let admin = create_test_account(&conn, "admin", Role::Admin);
        admin_token = token_for(&state, &admin);
    }

    let body = json!({ "cat_name": "Shoes" });
    let (status, _) = send_request(
        app(state.clone()),
        "POST",
        "/api/categories",
        Some(&admin_token),
        Some(body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send_request(
        app(state.clone()),
        "POST",
        "/api/categories",
        Some(&admin_token),
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cart_totals_are_recomputed_server_side() {
    let state = create_test_app_state();
    let (buyer, token, variant_id);
    {
        let conn = state.db.get().unwrap();
        buyer = create_test_account(&conn, "buyer", Role::User);
        let (_, variant) = seed_variant(&conn);
        token = token_for(&state, &buyer);
        variant_id = variant.id;
    }

    // A forged total is ignored: the server computes quantity x price.
    let (status, body) = send_request(
        app(state.clone()),
        "POST",
        "/api/carts",
        Some(&token),
        Some(json!({
            "acc_id": buyer.id,
            "variant_id": variant_id,
            "pro_quantity": 3,
            "pro_price": 150000.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["cartItem"]["total_price"], 450000.0);
    let item_id = body["cartItem"]["id"].as_str().unwrap().to_string();

    let (status, body) = send_request(
        app(state.clone()),
        "PUT",
        &format!("/api/carts/{}", item_id),
        Some(&token),
        Some(json!({ "pro_quantity": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cartItem"]["total_price"], 300000.0);
}

#[tokio::test]
async fn cart_items_require_an_existing_variant() {
    let state = create_test_app_state();
    let (buyer, token);
    {
        let conn = state.db.get().unwrap();
        buyer = create_test_account(&conn, "buyer", Role::User);
        token = token_for(&state, &buyer);
    }

    let (status, _) = send_request(
        app(state.clone()),
        "POST",
        "/api/carts",
        Some(&token),
        Some(json!({
            "acc_id": buyer.id,
            "variant_id": "ghost-variant",
            "pro_quantity": 1,
            "pro_price": 100.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn favorites_are_per_account_and_deduplicated() {
    let state = create_test_app_state();
    let (token, pro_id);
    {
        let conn = state.db.get().unwrap();
        let buyer = create_test_account(&conn, "buyer", Role::User);
        let (product, _) = seed_variant(&conn);
        token = token_for(&state, &buyer);
        pro_id = product.id;
    }

    let body = json!({ "pro_id": pro_id });
    let (status, _) = send_request(
        app(state.clone()),
        "POST",
        "/api/favorites",
        Some(&token),
        Some(body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, response) = send_request(
        app(state.clone()),
        "POST",
        "/api/favorites",
        Some(&token),
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["message"], "Product already in favorites");

    let (_, list) = get(app(state.clone()), "/api/favorites", Some(&token)).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn variant_creation_validates_every_reference() {
    let state = create_test_app_state();
    let (admin_token, pro_id);
    {
        let conn = state.db.get().unwrap();
        let admin = create_test_account(&conn, "admin", Role::Admin);
        let (product, _) = seed_variant(&conn);
        admin_token = token_for(&state, &admin);
        pro_id = product.id;
    }

    let (status, body) = send_request(
        app(state.clone()),
        "POST",
        "/api/variants",
        Some(&admin_token),
        Some(json!({
            "pro_id": pro_id,
            "color_id": "ghost-color",
            "size_id": "ghost-size",
            "image_id": "ghost-image"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Color not found");
}
