//! Per-client order throttling.
//!
//! Checks run in this order: daily cap, minimum spacing, sliding window. A passing check
//! records the order, so every call to [`RateLimiter::check_at`] that returns `Ok` counts.

use super::GateError;
use crate::config::RateLimits;
use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

#[derive(Default)]
pub struct RateLimiter {
    limits: RateLimits,
    // Timestamps of accepted orders in the last 24 hours, oldest first.
    history: Mutex<HashMap<String, VecDeque<DateTime<Utc>>>>,
}

impl RateLimiter {
    pub fn new(limits: RateLimits) -> Self {
        Self {
            limits,
            history: Mutex::new(HashMap::new()),
        }
    }

    /// Records `now` for `key` if the client is within its limits.
    ///
    /// Clients with nothing left in the last 24 hours are dropped on every call, and a
    /// rejected client that has no history is never stored.
    pub fn check_at(&self, key: &str, now: DateTime<Utc>) -> Result<(), GateError> {
        let day = Duration::hours(24);
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        history.retain(|_, stamps| {
            while stamps.front().is_some_and(|t| now - *t >= day) {
                stamps.pop_front();
            }
            !stamps.is_empty()
        });

        let empty = VecDeque::new();
        self.admit(history.get(key).unwrap_or(&empty), now)?;

        let stamps = history.entry(key.to_string()).or_default();
        stamps.push_back(now);
        debug!(key, today = stamps.len(), "Order slot recorded");
        Ok(())
    }

    fn admit(&self, stamps: &VecDeque<DateTime<Utc>>, now: DateTime<Utc>) -> Result<(), GateError> {
        let window = Duration::seconds(i64::try_from(self.limits.window_secs).unwrap_or(i64::MAX));
        let spacing =
            Duration::seconds(i64::try_from(self.limits.min_interval_secs).unwrap_or(i64::MAX));

        if stamps.len() >= self.limits.daily_limit {
            return Err(GateError::DailyLimit {
                limit: self.limits.daily_limit,
            });
        }

        if let Some(last) = stamps.back() {
            let elapsed = now - *last;
            if elapsed < spacing {
                let remaining_ms = (spacing - elapsed).num_milliseconds().max(0) as u64;
                return Err(GateError::TooSoon {
                    seconds: remaining_ms.div_ceil(1000),
                });
            }
        }

        let recent = stamps.iter().filter(|t| now - **t < window).count();
        if recent >= self.limits.max_per_window {
            return Err(GateError::TooManyRecent);
        }
        Ok(())
    }

    pub fn check(&self, key: &str) -> Result<(), GateError> {
        self.check_at(key, Utc::now())
    }

    /// Number of clients with orders in the last 24 hours.
    pub fn tracked_clients(&self) -> usize {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Forgets a client's history.
    pub fn reset(&self, key: &str) {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}
