//! Keyed one-time-code store with explicit expiry.
//!
//! Owned by app state and passed down as a dependency; codes are single-use
//! and swept periodically from a background task.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;
use rand::Rng;

struct OtpEntry {
    code: String,
    expires_at: i64,
}

pub struct OtpStore {
    ttl_secs: i64,
    entries: Mutex<HashMap<String, OtpEntry>>,
}

impl OtpStore {
    pub fn new(ttl_secs: i64) -> Self {
        Self {
            ttl_secs,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Issue a fresh 6-digit code for a key, replacing any previous one.
    pub fn issue(&self, key: &str) -> String {
        let code = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000));
        let entry = OtpEntry {
            code: code.clone(),
            expires_at: Utc::now().timestamp() + self.ttl_secs,
        };
        self.entries
            .lock()
            .expect("otp store lock poisoned")
            .insert(key.to_string(), entry);
        code
    }

    /// Verify and consume a code. Returns false for unknown keys, expired
    /// codes, and mismatches; a matching code is removed so it cannot be
    /// replayed.
    pub fn verify(&self, key: &str, code: &str) -> bool {
        self.verify_at(key, code, Utc::now().timestamp())
    }

    fn verify_at(&self, key: &str, code: &str, now: i64) -> bool {
        let mut entries = self.entries.lock().expect("otp store lock poisoned");
        let Some(entry) = entries.get(key) else {
            return false;
        };
        if now > entry.expires_at {
            entries.remove(key);
            return false;
        }
        if entry.code != code {
            return false;
        }
        entries.remove(key);
        true
    }

    /// Drop expired entries; returns how many were removed.
    pub fn sweep(&self) -> usize {
        let now = Utc::now().timestamp();
        let mut entries = self.entries.lock().expect("otp store lock poisoned");
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at >= now);
        before - entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_six_digits_and_single_use() {
        let store = OtpStore::new(600);
        let code = store.issue("user@example.com");
        assert_eq!(code.len(), 6);
        assert!(code.bytes().all(|b| b.is_ascii_digit()));

        assert!(!store.verify("user@example.com", "wrong!"));
        assert!(store.verify("user@example.com", &code));
        // Consumed on success.
        assert!(!store.verify("user@example.com", &code));
    }

    #[test]
    fn expired_codes_are_rejected_and_removed() {
        let store = OtpStore::new(600);
        let code = store.issue("late@example.com");
        let after_expiry = Utc::now().timestamp() + 601;
        assert!(!store.verify_at("late@example.com", &code, after_expiry));
        // Gone entirely, even for an in-window retry.
        assert!(!store.verify("late@example.com", &code));
    }

    #[test]
    fn reissue_replaces_previous_code() {
        let store = OtpStore::new(600);
        let first = store.issue("k");
        let second = store.issue("k");
        if first != second {
            assert!(!store.verify("k", &first));
        }
        assert!(store.verify("k", &second));
    }

    #[test]
    fn sweep_removes_only_expired() {
        let store = OtpStore::new(-1); // already expired on issue
        store.issue("a");
        store.issue("b");
        assert_eq!(store.sweep(), 2);
        assert_eq!(store.sweep(), 0);
    }
}
