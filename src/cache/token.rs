use chrono::{DateTime, Duration, Utc};

// upper bound for absurd `expires_in` answers (one year)
const MAX_LIFETIME_SECONDS: u64 = 365 * 24 * 3600;

/// Bearer token issued by the client-credentials exchange.
///
/// Replaced as a whole on refresh, never mutated field by field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn new(value: String, expires_at: DateTime<Utc>) -> Self {
        Self { value, expires_at }
    }

    /// Build from an `expires_in` answer received at `issued_at`.
    pub fn from_expires_in(value: String, expires_in_seconds: u64, issued_at: DateTime<Utc>) -> Self {
        let lifetime = Duration::seconds(expires_in_seconds.min(MAX_LIFETIME_SECONDS) as i64);
        Self::new(value, issued_at + lifetime)
    }

    /// Usable strictly before `expires_at - safety_margin_seconds`.
    pub fn is_valid_at(&self, now: DateTime<Utc>, safety_margin_seconds: u64) -> bool {
        let margin = Duration::seconds(safety_margin_seconds as i64);
        now < self.expires_at - margin
    }
}
