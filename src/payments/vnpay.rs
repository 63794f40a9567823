//! VNPay protocol: payment-URL construction and callback parameter
//! verification.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::signature;

pub const PARAM_AMOUNT: &str = "vnp_Amount";
pub const PARAM_TXN_REF: &str = "vnp_TxnRef";
pub const PARAM_RESPONSE_CODE: &str = "vnp_ResponseCode";
pub const PARAM_SECURE_HASH: &str = "vnp_SecureHash";
pub const PARAM_SECURE_HASH_TYPE: &str = "vnp_SecureHashType";
pub const PARAM_BANK_CODE: &str = "vnp_BankCode";

/// Gateway response code meaning the payment was approved.
pub const RSP_SUCCESS: &str = "00";

/// Merchant credentials and endpoints for the gateway. All four values are
/// required process configuration; absence is a startup failure.
#[derive(Debug, Clone)]
pub struct VnpayConfig {
    pub tmn_code: String,
    pub hash_secret: String,
    pub base_url: String,
    pub return_url: String,
}

#[derive(Debug, Clone)]
pub struct VnpayGateway {
    config: VnpayConfig,
}

impl VnpayGateway {
    pub fn new(config: VnpayConfig) -> Self {
        Self { config }
    }

    /// Build the signed redirect URL for one order.
    ///
    /// The amount is scaled by 100 (gateway convention: smallest currency
    /// subunit) and rounded to an integer; the create date is the fixed
    /// `YYYYMMDDHHmmss` form. Nothing is persisted here - payment is not
    /// confirmed until a callback arrives.
    pub fn build_payment_url(
        &self,
        order_id: &str,
        amount: f64,
        bank_code: Option<&str>,
        locale: Option<&str>,
        ip_addr: &str,
        created_at: DateTime<Utc>,
    ) -> String {
        let amount_scaled = (amount * 100.0).round() as i64;
        let amount_str = amount_scaled.to_string();
        let order_info = format!("Thanh toan don hang:{}", order_id);
        let create_date = created_at.format("%Y%m%d%H%M%S").to_string();
        let locale = locale.filter(|l| !l.is_empty()).unwrap_or("vn");

        let mut params: Vec<(&str, &str)> = vec![
            ("vnp_Version", "2.1.0"),
            ("vnp_Command", "pay"),
            ("vnp_TmnCode", &self.config.tmn_code),
            ("vnp_Locale", locale),
            ("vnp_CurrCode", "VND"),
            (PARAM_TXN_REF, order_id),
            ("vnp_OrderInfo", &order_info),
            ("vnp_OrderType", "other"),
            (PARAM_AMOUNT, &amount_str),
            ("vnp_ReturnUrl", &self.config.return_url),
            ("vnp_IpAddr", ip_addr),
            ("vnp_CreateDate", &create_date),
        ];
        if let Some(bank) = bank_code.filter(|b| !b.is_empty()) {
            params.push((PARAM_BANK_CODE, bank));
        }

        let canonical = signature::canonicalize(params);
        let sign_data = signature::serialize(&canonical);
        let secure_hash = signature::sign(&sign_data, &self.config.hash_secret);

        format!(
            "{}?{}&{}={}",
            self.config.base_url, sign_data, PARAM_SECURE_HASH, secure_hash
        )
    }

    /// Verify a callback parameter set against its `vnp_SecureHash`.
    ///
    /// The signature fields themselves are excluded from the signed
    /// serialization, exactly as the gateway computes it.
    pub fn verify_callback(&self, params: &HashMap<String, String>) -> bool {
        let Some(provided) = params.get(PARAM_SECURE_HASH) else {
            return false;
        };
        let stripped = params
            .iter()
            .filter(|(k, _)| k.as_str() != PARAM_SECURE_HASH && k.as_str() != PARAM_SECURE_HASH_TYPE)
            .map(|(k, v)| (k.as_str(), v.as_str()));
        signature::verify(stripped, provided, &self.config.hash_secret)
    }
}

/// Compare a callback amount (scaled by 100) against the stored order total,
/// tolerant of floating-point rounding.
pub fn amount_matches(raw_amount: i64, total_price: f64) -> bool {
    (raw_amount as f64 / 100.0 - total_price).abs() < 0.005
}

/// Outcome of the synchronous return callback. `code` is `"00"` on success;
/// any other value is the gateway's failure code.
#[derive(Debug, Clone, Serialize)]
pub struct ReturnOutcome {
    pub code: String,
    pub message: String,
}

impl ReturnOutcome {
    pub fn success() -> Self {
        Self {
            code: RSP_SUCCESS.into(),
            message: "Payment successful".into(),
        }
    }

    /// Replayed success callback for an order that is already settled.
    pub fn already_paid() -> Self {
        Self {
            code: RSP_SUCCESS.into(),
            message: "Order already paid".into(),
        }
    }

    pub fn failed(gateway_code: &str) -> Self {
        Self {
            code: gateway_code.into(),
            message: "Payment failed or cancelled".into(),
        }
    }
}

/// The acknowledgment shape the gateway requires from the IPN endpoint.
/// Returned with HTTP 200 on every branch; the gateway retries anything
/// else indefinitely.
#[derive(Debug, Clone, Serialize)]
pub struct IpnResponse {
    #[serde(rename = "RspCode")]
    pub rsp_code: String,
    #[serde(rename = "Message")]
    pub message: String,
}

impl IpnResponse {
    fn new(code: &str, message: &str) -> Self {
        Self {
            rsp_code: code.into(),
            message: message.into(),
        }
    }

    pub fn success() -> Self {
        Self::new("00", "Success")
    }

    /// Receipt acknowledgment for a declined/cancelled payment. The gateway
    /// only needs to know delivery succeeded, not the business outcome.
    pub fn payment_failed() -> Self {
        Self::new("00", "Payment failed")
    }

    pub fn order_not_found() -> Self {
        Self::new("01", "Order not found")
    }

    /// The idempotent replay guard: the order is already settled.
    pub fn already_updated() -> Self {
        Self::new("02", "Order already updated")
    }

    pub fn invalid_amount() -> Self {
        Self::new("04", "Amount invalid")
    }

    pub fn checksum_failed() -> Self {
        Self::new("97", "Checksum failed")
    }

    pub fn internal_error() -> Self {
        Self::new("99", "Internal server error")
    }
}
