//! Per-actor fixed-window rate limiting for mutation messages.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use uuid::Uuid;

/// Mutations allowed per actor per window.
const DEFAULT_MAX_PER_WINDOW: u32 = 10;
const DEFAULT_WINDOW: Duration = Duration::from_secs(1);

struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window counter keyed by actor (user) id. Excess calls are rejected,
/// never queued.
pub struct RateLimiter {
    windows: DashMap<Uuid, Window>,
    max_per_window: u32,
    window: Duration,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PER_WINDOW, DEFAULT_WINDOW)
    }
}

impl RateLimiter {
    pub fn new(max_per_window: u32, window: Duration) -> Self {
        Self {
            windows: DashMap::new(),
            max_per_window,
            window,
        }
    }

    /// Record one call for `actor`; returns false when the budget for the
    /// current window is spent.
    pub fn check(&self, actor: Uuid) -> bool {
        self.check_at(actor, Instant::now())
    }

    fn check_at(&self, actor: Uuid, now: Instant) -> bool {
        let mut entry = self.windows.entry(actor).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.count = 0;
        }

        if entry.count >= self.max_per_window {
            return false;
        }
        entry.count += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admits_the_budget_and_rejects_the_excess() {
        let limiter = RateLimiter::default();
        let actor = Uuid::new_v4();
        let now = Instant::now();

        for _ in 0..10 {
            assert!(limiter.check_at(actor, now));
        }
        assert!(!limiter.check_at(actor, now));
    }

    #[test]
    fn window_expiry_restores_the_budget() {
        let limiter = RateLimiter::default();
        let actor = Uuid::new_v4();
        let start = Instant::now();

        for _ in 0..10 {
            assert!(limiter.check_at(actor, start));
        }
        assert!(!limiter.check_at(actor, start));

        let later = start + Duration::from_millis(1001);
        assert!(limiter.check_at(actor, later));
    }

    #[test]
    fn actors_are_limited_independently() {
        let limiter = RateLimiter::new(1, DEFAULT_WINDOW);
        let now = Instant::now();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        assert!(limiter.check_at(first, now));
        assert!(!limiter.check_at(first, now));
        assert!(limiter.check_at(second, now));
    }
}
