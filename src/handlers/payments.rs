//! Payment endpoints: signed redirect-URL construction and the two gateway
//! callbacks.
//!
//! The return callback arrives via the paying user's browser and may raise
//! typed errors. The IPN callback is the authoritative server-to-server
//! settlement path: it answers in the gateway's `{RspCode, Message}` shape
//! with HTTP 200 on every branch, because the gateway retries anything else.

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use axum::Extension;
use chrono::Utc;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::auth::AuthContext;
use crate::db::{queries, AppState};
use crate::error::{msg, AppError, OptionExt, Result};
use crate::extractors::{Json, Path, Query};
use crate::models::PayStatus;
use crate::payments::vnpay::{
    PARAM_AMOUNT, PARAM_RESPONSE_CODE, PARAM_SECURE_HASH, PARAM_TXN_REF,
};
use crate::payments::{amount_matches, IpnResponse, ReturnOutcome, VnpayGateway, RSP_SUCCESS};
use crate::util::client_ip_from_headers;

const REQUIRED_CALLBACK_PARAMS: [&str; 4] = [
    PARAM_AMOUNT,
    PARAM_TXN_REF,
    PARAM_RESPONSE_CODE,
    PARAM_SECURE_HASH,
];

#[derive(Debug, Default, Deserialize)]
pub struct PaymentUrlQuery {
    #[serde(rename = "bankCode")]
    pub bank_code: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PaymentUrlResponse {
    #[serde(rename = "paymentUrl")]
    pub payment_url: String,
}

/// GET /api/orders/{id}/payment-url
///
/// Preconditions, in order: the order exists; the caller owns it or holds an
/// elevated role; it is not already paid. Nothing is persisted - the order
/// is only mutated once the gateway calls back.
pub async fn get_payment_url(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(order_id): Path<String>,
    Query(query): Query<PaymentUrlQuery>,
    headers: HeaderMap,
    ConnectInfo(remote_addr): ConnectInfo<SocketAddr>,
) -> Result<Json<PaymentUrlResponse>> {
    let conn = state.db.get()?;
    let order = queries::get_order_by_id(&conn, &order_id)?.or_not_found(msg::ORDER_NOT_FOUND)?;
    auth.ensure_owner_or_elevated(&order.acc_id, "Access denied: Can only pay for own order")?;
    if order.pay_status == PayStatus::Paid {
        return Err(AppError::Conflict(msg::ORDER_ALREADY_PAID.to_string()));
    }

    let ip_addr = client_ip_from_headers(&headers)
        .unwrap_or_else(|| remote_addr.ip().to_string());

    let gateway = VnpayGateway::new(state.vnpay.clone());
    let payment_url = gateway.build_payment_url(
        &order.id,
        order.total_price,
        query.bank_code.as_deref(),
        query.language.as_deref(),
        &ip_addr,
        Utc::now(),
    );
    Ok(Json(PaymentUrlResponse { payment_url }))
}

/// GET /api/orders/vnpay-return - synchronous browser-redirect callback.
///
/// Convenience for the paying user; the IPN path remains the source of
/// truth. Integrity failures raise and render as the standard error body.
pub async fn vnpay_return(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ReturnOutcome>> {
    let conn = state.db.get()?;
    let gateway = VnpayGateway::new(state.vnpay.clone());
    reconcile_return(&conn, &gateway, &params).map(Json)
}

fn reconcile_return(
    conn: &Connection,
    gateway: &VnpayGateway,
    params: &HashMap<String, String>,
) -> Result<ReturnOutcome> {
    for field in REQUIRED_CALLBACK_PARAMS {
        if !params.contains_key(field) {
            return Err(AppError::Validation(format!(
                "Missing required parameter: {}",
                field
            )));
        }
    }
    if !gateway.verify_callback(params) {
        return Err(AppError::Integrity(msg::CHECKSUM_FAILED.to_string()));
    }

    let order_id = &params[PARAM_TXN_REF];
    let rsp_code = &params[PARAM_RESPONSE_CODE];
    let order = queries::get_order_by_id(conn, order_id)?.or_not_found(msg::ORDER_NOT_FOUND)?;

    let raw_amount: i64 = params[PARAM_AMOUNT]
        .parse()
        .map_err(|_| AppError::Validation("Invalid amount".to_string()))?;
    if !amount_matches(raw_amount, order.total_price) {
        return Err(AppError::Integrity(msg::AMOUNT_MISMATCH.to_string()));
    }

    if rsp_code == RSP_SUCCESS {
        if order.pay_status == PayStatus::Paid {
            return Ok(ReturnOutcome::already_paid());
        }
        if queries::mark_order_paid(conn, &order.id)? {
            tracing::info!(order_id = %order.id, "order settled via return callback");
            Ok(ReturnOutcome::success())
        } else {
            // Lost the race against a concurrent callback; already settled.
            Ok(ReturnOutcome::already_paid())
        }
    } else {
        queries::mark_order_pay_failed(conn, &order.id)?;
        Ok(ReturnOutcome::failed(rsp_code))
    }
}

/// GET/POST /api/orders/vnpay-ipn - asynchronous server-to-server callback.
///
/// Safe to invoke arbitrarily many times with the same or replayed
/// parameters; never propagates an error to the transport layer.
pub async fn vnpay_ipn(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<IpnResponse> {
    let response = match reconcile_ipn(&state, &params) {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("IPN processing failed: {}", e);
            IpnResponse::internal_error()
        }
    };
    Json(response)
}

fn reconcile_ipn(state: &AppState, params: &HashMap<String, String>) -> Result<IpnResponse> {
    for field in REQUIRED_CALLBACK_PARAMS {
        if !params.contains_key(field) {
            return Ok(IpnResponse::internal_error());
        }
    }

    let gateway = VnpayGateway::new(state.vnpay.clone());
    if !gateway.verify_callback(params) {
        return Ok(IpnResponse::checksum_failed());
    }

    let order_id = &params[PARAM_TXN_REF];
    let rsp_code = &params[PARAM_RESPONSE_CODE];
    let Ok(raw_amount) = params[PARAM_AMOUNT].parse::<i64>() else {
        return Ok(IpnResponse::invalid_amount());
    };

    let conn = state.db.get()?;
    let Some(order) = queries::get_order_by_id(&conn, order_id)? else {
        return Ok(IpnResponse::order_not_found());
    };
    if !amount_matches(raw_amount, order.total_price) {
        return Ok(IpnResponse::invalid_amount());
    }
    if order.pay_status == PayStatus::Paid {
        // Replay guard: the order is settled, nothing is rewritten.
        return Ok(IpnResponse::already_updated());
    }

    if rsp_code == RSP_SUCCESS {
        if queries::mark_order_paid(&conn, &order.id)? {
            tracing::info!(order_id = %order.id, "order settled via IPN");
            Ok(IpnResponse::success())
        } else {
            Ok(IpnResponse::already_updated())
        }
    } else {
        queries::mark_order_pay_failed(&conn, &order.id)?;
        tracing::info!(order_id = %order.id, code = %rsp_code, "payment declined via IPN");
        Ok(IpnResponse::payment_failed())
    }
}
