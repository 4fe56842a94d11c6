use std::time::{Duration, Instant};

/// A short-lived notice that hides itself once `expires_at` has passed.
///
/// Nothing here runs a timer. Whoever renders the status passes the current
/// instant, which keeps controller transitions deterministic under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientStatus {
    text: String,
    expires_at: Instant,
}

impl TransientStatus {
    pub fn new<S: Into<String>>(text: S, now: Instant, ttl: Duration) -> Self {
        Self {
            text: text.into(),
            expires_at: now + ttl,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    /// The text if still live at `now`.
    pub fn visible_at(&self, now: Instant) -> Option<&str> {
        (!self.is_expired(now)).then_some(self.text.as_str())
    }
}
