//! Shared helpers for the storefront application.

use axum::http::HeaderMap;
use chrono::{NaiveDate, TimeZone, Utc};

/// Extract the client IP address from request headers.
///
/// Tries `x-forwarded-for` first (for proxied requests), then `x-real-ip`.
/// Callers fall back to the raw connection address when neither is present.
pub fn client_ip_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .or_else(|| headers.get("x-real-ip"))
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(',').next().unwrap_or(v).trim().to_string())
}

/// Minimal email shape check: `local@domain.tld`, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Parse a `YYYY-MM-DD` string to the epoch second at the start of that day.
pub fn parse_day_start(s: &str) -> Option<i64> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    let start = date.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&start).timestamp())
}

/// Parse a `YYYY-MM-DD` string to the epoch second at the end of that day.
pub fn parse_day_end(s: &str) -> Option<i64> {
    parse_day_start(s).map(|start| start + 86_399)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("a.b@sub.example.org"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("spaced user@example.com"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("@example.com"));
    }

    #[test]
    fn day_range_parsing() {
        let start = parse_day_start("2024-03-01").unwrap();
        let end = parse_day_end("2024-03-01").unwrap();
        assert_eq!(end - start, 86_399);
        assert!(parse_day_start("not-a-date").is_none());
    }
}
