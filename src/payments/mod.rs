//! VNPay gateway integration: canonical parameter signing and the
//! redirect/callback protocol types.
//!
//! The gateway is redirect-based. We build a signed payment URL, the user
//! pays on the gateway's site, and the gateway calls back twice: a browser
//! redirect ("return") and a server-to-server notification ("IPN"). Both
//! callbacks are verified against the same canonical HMAC signature that
//! signed the outbound URL.

pub mod signature;
pub mod vnpay;

pub use vnpay::{
    amount_matches, IpnResponse, ReturnOutcome, VnpayConfig, VnpayGateway, RSP_SUCCESS,
};
