//! Per-IP throttling of failed admin logins.

use dashmap::DashMap;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Failed attempts allowed inside one window.
pub const MAX_FAILED_LOGINS: usize = 5;

/// How long a failed attempt counts against an IP.
pub const FAILED_LOGIN_WINDOW: Duration = Duration::from_secs(15 * 60);

/// Map size past which recording a failure sweeps out idle IPs.
const SWEEP_THRESHOLD: usize = 1024;

/// Sliding-window counter of failed logins keyed by client IP.
pub struct LoginThrottle {
    limit: usize,
    window: Duration,
    failures: DashMap<String, VecDeque<Instant>>,
}

impl LoginThrottle {
    pub fn new(limit: usize, window: Duration) -> Self {
        Self {
            limit,
            window,
            failures: DashMap::new(),
        }
    }

    /// Whether `ip` may attempt another login right now.
    pub fn allowed(&self, ip: &str) -> bool {
        self.allowed_at(ip, Instant::now())
    }

    pub fn record_failure(&self, ip: &str) {
        self.record_failure_at(ip, Instant::now());
    }

    /// Forget every failure for `ip` (after a successful login).
    pub fn clear(&self, ip: &str) {
        self.failures.remove(ip);
    }

    /// Get the number of IPs we've tracked.
    pub fn tracked_ips(&self) -> usize {
        self.failures.len()
    }

    fn is_expired(&self, at: Instant, now: Instant) -> bool {
        now.saturating_duration_since(at) > self.window
    }

    fn allowed_at(&self, ip: &str, now: Instant) -> bool {
        let remaining = {
            let Some(mut attempts) = self.failures.get_mut(ip) else {
                return true;
            };
            while attempts
                .front()
                .is_some_and(|first| self.is_expired(*first, now))
            {
                attempts.pop_front();
            }
            attempts.len()
        };

        if remaining == 0 {
            self.failures.remove_if(ip, |_, attempts| attempts.is_empty());
        }
        remaining < self.limit
    }

    fn record_failure_at(&self, ip: &str, now: Instant) {
        if self.failures.len() >= SWEEP_THRESHOLD {
            self.sweep(now);
        }
        self.failures.entry(ip.to_string()).or_default().push_back(now);
    }

    /// Drop every IP whose latest failure is outside the window.
    fn sweep(&self, now: Instant) {
        self.failures.retain(|_, attempts| {
            attempts
                .back()
                .is_some_and(|last| !self.is_expired(*last, now))
        });
    }
}

impl Default for LoginThrottle {
    fn default() -> Self {
        Self::new(MAX_FAILED_LOGINS, FAILED_LOGIN_WINDOW)
    }
}
