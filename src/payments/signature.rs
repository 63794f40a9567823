//! Deterministic parameter canonicalization and HMAC-SHA-512 signing.
//!
//! The gateway computes its signature over a specific serialization: keys
//! sorted by their percent-encoded form, values percent-encoded with spaces
//! as `+`, pairs joined `k=v&k=v`. Both sides must produce this encoding
//! bit-for-bit or every signature check fails.

use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha2::Sha512;
use subtle::ConstantTimeEq;

type HmacSha512 = Hmac<Sha512>;

/// Characters left unescaped, matching JavaScript's `encodeURIComponent`
/// (the gateway's reference implementation encodes with it).
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a parameter key.
pub fn encode_key(s: &str) -> String {
    utf8_percent_encode(s, COMPONENT).to_string()
}

/// Percent-encode a parameter value; encoded spaces are rewritten to `+`.
pub fn encode_value(s: &str) -> String {
    encode_key(s).replace("%20", "+")
}

/// Canonical form of a parameter set: both members of each pair encoded,
/// pairs sorted byte-wise ascending by encoded key.
pub fn canonicalize<'a, I>(params: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut encoded: Vec<(String, String)> = params
        .into_iter()
        .map(|(k, v)| (encode_key(k), encode_value(v)))
        .collect();
    encoded.sort_by(|a, b| a.0.cmp(&b.0));
    encoded
}

/// Join already-encoded pairs as `key=value&key=value`. No further escaping.
pub fn serialize(sorted: &[(String, String)]) -> String {
    let mut out = String::new();
    for (i, (k, v)) in sorted.iter().enumerate() {
        if i > 0 {
            out.push('&');
        }
        out.push_str(k);
        out.push('=');
        out.push_str(v);
    }
    out
}

/// HMAC-SHA-512 over the UTF-8 bytes of `serialized`, as lowercase hex.
pub fn sign(serialized: &str, secret: &str) -> String {
    // HMAC accepts keys of any length; this cannot fail for string secrets.
    let mut mac =
        HmacSha512::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(serialized.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Canonicalize, serialize and sign a parameter set in one step.
pub fn sign_params<'a, I>(params: I, secret: &str) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    sign(&serialize(&canonicalize(params)), secret)
}

/// Re-derive the signature for `params` (signature fields already removed)
/// and compare with the one the gateway provided. Exact match required.
pub fn verify<'a, I>(params: I, provided: &str, secret: &str) -> bool
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let expected = sign_params(params, secret);
    expected.len() == provided.len()
        && bool::from(expected.as_bytes().ct_eq(provided.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_encode_like_encode_uri_component() {
        assert_eq!(encode_value("Thanh toan don hang:42"), "Thanh+toan+don+hang%3A42");
        assert_eq!(encode_value("a-b_c.d!e~f*g'h(i)j"), "a-b_c.d!e~f*g'h(i)j");
        assert_eq!(encode_value("100&x=1"), "100%26x%3D1");
    }

    #[test]
    fn canonical_order_is_bytewise_on_encoded_keys() {
        let sorted = canonicalize([("vnp_TxnRef", "1"), ("vnp_Amount", "2"), ("vnp_Version", "3")]);
        let keys: Vec<&str> = sorted.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["vnp_Amount", "vnp_TxnRef", "vnp_Version"]);
    }

    #[test]
    fn canonicalization_is_idempotent() {
        let params = [
            ("vnp_OrderInfo", "Thanh toan don hang:7"),
            ("vnp_Amount", "15000000"),
            ("vnp_TxnRef", "7"),
        ];
        let once = canonicalize(params);
        let twice = canonicalize(once.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        // Encoded forms contain no characters that re-encode, so the
        // canonical form is a fixed point.
        assert_eq!(once, twice);
    }

    #[test]
    fn sign_is_deterministic_lowercase_hex() {
        let a = sign_params([("b", "2"), ("a", "1")], "secret");
        let b = sign_params([("a", "1"), ("b", "2")], "secret");
        assert_eq!(a, b);
        assert_eq!(a.len(), 128);
        assert!(a.bytes().all(|c| matches!(c, b'0'..=b'9' | b'a'..=b'f')));
    }

    #[test]
    fn verify_rejects_any_single_character_change() {
        let params = [("vnp_Amount", "15000000"), ("vnp_TxnRef", "7")];
        let good = sign_params(params, "secret");
        assert!(verify(params, &good, "secret"));

        // Flip one signature character.
        let mut tampered = good.clone().into_bytes();
        tampered[0] = if tampered[0] == b'0' { b'1' } else { b'0' };
        assert!(!verify(params, &String::from_utf8(tampered).unwrap(), "secret"));

        // Flip one parameter value.
        assert!(!verify([("vnp_Amount", "15000001"), ("vnp_TxnRef", "7")], &good, "secret"));
        // Wrong secret.
        assert!(!verify(params, &good, "secret2"));
        // Wrong length.
        assert!(!verify(params, &good[..127], "secret"));
    }
}
