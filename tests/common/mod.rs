//! Test utilities and fixtures for storefront integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use tower::ServiceExt;

pub use storefront::auth::TokenSigner;
pub use storefront::db::{init_db, queries, AppState};
pub use storefront::handlers;
pub use storefront::models::*;
pub use storefront::otp::OtpStore;
pub use storefront::payments::{signature, VnpayConfig};

static DB_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub const TEST_JWT_SECRET: &str = "test-jwt-secret";
pub const TEST_HASH_SECRET: &str = "test-hash-secret";

pub fn test_vnpay_config() -> VnpayConfig {
    VnpayConfig {
        tmn_code: "TESTTMN".to_string(),
        hash_secret: TEST_HASH_SECRET.to_string(),
        base_url: "https://sandbox.vnpayment.vn/paymentv2/vpcpay.html".to_string(),
        return_url: "http://localhost:4000/api/orders/vnpay-return".to_string(),
    }
}

/// Create app state over a fresh shared-cache in-memory database. The pool
/// holds its connections open, which keeps the database alive for the test.
pub fn create_test_app_state() -> AppState {
    let name = format!(
        "file:storefront_test_{}?mode=memory&cache=shared",
        DB_COUNTER.fetch_add(1, Ordering::SeqCst)
    );
    let manager = SqliteConnectionManager::file(&name).with_flags(
        OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE,
    );
    let pool = Pool::builder()
        .max_size(4)
        .build(manager)
        .expect("Failed to create test pool");
    init_db(&pool.get().unwrap()).expect("Failed to initialize schema");

    AppState {
        db: pool,
        vnpay: test_vnpay_config(),
        tokens: TokenSigner::new(TEST_JWT_SECRET),
        otp: Arc::new(OtpStore::new(600)),
    }
}

/// Build the full application router over the given state. Requests driven
/// through `oneshot` never ran the connect-info acceptor, so a fixed peer
/// address is injected the way `serve` would.
pub fn app(state: AppState) -> Router {
    use axum::extract::connect_info::MockConnectInfo;
    use std::net::SocketAddr;

    handlers::api_router(state.clone())
        .layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 51515))))
        .with_state(state)
}

pub fn create_test_account(
    conn: &rusqlite::Connection,
    username: &str,
    role: Role,
) -> Account {
    let input = CreateAccount {
        username: username.to_string(),
        name: format!("Test {}", username),
        email: format!("{}@example.com", username),
        phone: "0123456789".to_string(),
        address: "1 Test Street".to_string(),
        password: "password123".to_string(),
        image: None,
        role: Some(role),
        acc_status: None,
    };
    let hash = handlers::auth::hash_password("password123").expect("Failed to hash password");
    queries::create_account(conn, &input, &hash).expect("Failed to create test account")
}

pub fn create_test_order(conn: &rusqlite::Connection, acc_id: &str, total_price: f64) -> Order {
    let input = CreateOrder {
        acc_id: acc_id.to_string(),
        address_receive: "42 Delivery Lane".to_string(),
        phone: "0987654321".to_string(),
        total_price,
        order_status: None,
        pay_status: None,
        shipping_status: None,
        feedback_order: None,
    };
    queries::create_order(conn, &input).expect("Failed to create test order")
}

pub fn token_for(state: &AppState, account: &Account) -> String {
    state.tokens.issue(account).expect("Failed to issue token")
}

/// Sign a callback parameter set the way the gateway would, appending
/// `vnp_SecureHash` over the canonical serialization of the other params.
pub fn signed_callback_params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    let hash = signature::sign_params(pairs.iter().copied(), TEST_HASH_SECRET);
    let mut out: Vec<(String, String)> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    out.push(("vnp_SecureHash".to_string(), hash));
    out
}

pub fn query_string(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// Drive one request through the router and return status + parsed body.
pub async fn send_request(
    app: Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, value)
}

pub async fn get(app: Router, path: &str, token: Option<&str>) -> (StatusCode, serde_json::Value) {
    send_request(app, "GET", path, token, None).await
}

/// Current pay_status straight from the store.
pub fn pay_status_of(conn: &rusqlite::Connection, order_id: &str) -> PayStatus {
    queries::get_order_by_id(conn, order_id)
        .expect("query failed")
        .expect("order missing")
        .pay_status
}

/// Build a standard signed success-IPN parameter set for an order.
pub fn ipn_success_params(order_id: &str, raw_amount: &str) -> Vec<(String, String)> {
    signed_callback_params(&[
        ("vnp_Amount", raw_amount),
        ("vnp_TxnRef", order_id),
        ("vnp_ResponseCode", "00"),
    ])
}
