//! Direct-message rate limiting
//!
//! Per-sender cooldown applied to direct messages only. Room messages are
//! not limited.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Per-sender cooldown tracker for direct messages
///
/// A rejected attempt does not refresh the sender's timestamp, so a client
/// cannot push its own window forward by retrying early.
pub struct DirectMessageLimiter {
    cooldown: Duration,
    last_sent: Mutex<HashMap<Uuid, Instant>>,
}

impl DirectMessageLimiter {
    /// Create a limiter with the given cooldown
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_sent: Mutex::new(HashMap::new()),
        }
    }

    /// Create a limiter from a cooldown in milliseconds
    pub fn from_millis(cooldown_ms: u64) -> Self {
        Self::new(Duration::from_millis(cooldown_ms))
    }

    /// Get the configured cooldown
    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Check whether a sender may send now
    ///
    /// Accepts and records `now` when the sender is outside their cooldown
    /// window; otherwise rejects with the remaining wait time and leaves the
    /// recorded timestamp untouched.
    pub fn check(&self, sender_id: Uuid, now: Instant) -> Result<(), Duration> {
        let mut last_sent = self.last_sent.lock();

        if let Some(last) = last_sent.get(&sender_id) {
            let elapsed = now.saturating_duration_since(*last);
            if elapsed < self.cooldown {
                return Err(self.cooldown - elapsed);
            }
        }

        last_sent.insert(sender_id, now);
        Ok(())
    }
}

impl std::fmt::Debug for DirectMessageLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectMessageLimiter")
            .field("cooldown", &self.cooldown)
            .field("tracked", &self.last_sent.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_send_accepted() {
        let limiter = DirectMessageLimiter::from_millis(5000);
        assert!(limiter.check(Uuid::new_v4(), Instant::now()).is_ok());
    }

    #[test]
    fn test_send_within_cooldown_rejected() {
        let limiter = DirectMessageLimiter::from_millis(5000);
        let sender = Uuid::new_v4();
        let start = Instant::now();

        assert!(limiter.check(sender, start).is_ok());

        let retry = start + Duration::from_millis(1000);
        let remaining = limiter.check(sender, retry).unwrap_err();
        assert_eq!(remaining, Duration::from_millis(4000));
    }

    #[test]
    fn test_send_after_cooldown_accepted() {
        let limiter = DirectMessageLimiter::from_millis(5000);
        let sender = Uuid::new_v4();
        let start = Instant::now();

        assert!(limiter.check(sender, start).is_ok());
        assert!(limiter.check(sender, start + Duration::from_millis(5000)).is_ok());
    }

    #[test]
    fn test_rejection_does_not_extend_window() {
        let limiter = DirectMessageLimiter::from_millis(5000);
        let sender = Uuid::new_v4();
        let start = Instant::now();

        assert!(limiter.check(sender, start).is_ok());

        // Early retries must not push the window forward
        assert!(limiter.check(sender, start + Duration::from_millis(4000)).is_err());
        assert!(limiter.check(sender, start + Duration::from_millis(5500)).is_ok());
    }

    #[test]
    fn test_senders_are_independent() {
        let limiter = DirectMessageLimiter::from_millis(5000);
        let now = Instant::now();

        assert!(limiter.check(Uuid::new_v4(), now).is_ok());
        assert!(limiter.check(Uuid::new_v4(), now).is_ok());
    }
}
