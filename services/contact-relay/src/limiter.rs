// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Fixed-window rate limiter for contact submissions.
//!
//! One record per client key holds a counter and the instant its window
//! opened. Records live in process memory only, so the limit is per
//! instance.

use crate::config::RateLimitConfig;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

/// Result of a rate limit check.
#[derive(Debug, Clone)]
pub enum RateLimitResult {
    /// Request is allowed
    Allowed {
        /// Remaining requests in current window
        remaining: u32,
        /// Time until window resets
        reset_in: Duration,
    },
    /// Request is rate limited
    Limited {
        /// Time until the window resets
        retry_after: Duration,
    },
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed { .. })
    }
}

#[derive(Debug)]
struct WindowRecord {
    count: u32,
    window_start: Instant,
}

/// Thread-safe rate limiter.
pub struct RateLimiter {
    config: RateLimitConfig,
    records: Arc<RwLock<HashMap<String, WindowRecord>>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Count a request against `key` and report whether it may proceed.
    ///
    /// A denied request does not advance the counter.
    pub async fn check(&self, key: &str) -> RateLimitResult {
        let now = Instant::now();
        let window = self.config.window_duration();
        let max = self.config.max_requests;

        let mut records = self.records.write().await;
        let record = records.entry(key.to_string()).or_insert(WindowRecord {
            count: 0,
            window_start: now,
        });

        if now.duration_since(record.window_start) > window {
            debug!(key, "Rate limit window elapsed, resetting");
            record.count = 0;
            record.window_start = now;
        }

        let reset_in = window.saturating_sub(now.duration_since(record.window_start));

        if record.count >= max {
            debug!(key, count = record.count, ?reset_in, "Rate limit exceeded");
            return RateLimitResult::Limited {
                retry_after: reset_in,
            };
        }

        record.count += 1;
        RateLimitResult::Allowed {
            remaining: max - record.count,
            reset_in,
        }
    }

    /// Convenience form of [`check`](Self::check).
    pub async fn allow(&self, key: &str) -> bool {
        self.check(key).await.is_allowed()
    }

    /// Number of requests counted for `key` in its current window.
    pub async fn count(&self, key: &str) -> Option<u32> {
        self.records.read().await.get(key).map(|r| r.count)
    }

    /// Drop records whose window has elapsed (should be called periodically).
    pub async fn cleanup(&self) {
        let now = Instant::now();
        let window = self.config.window_duration();

        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, record| now.duration_since(record.window_start) <= window);
        let evicted = before - records.len();
        if evicted > 0 {
            debug!(evicted, remaining = records.len(), "Evicted stale rate limit records");
        }
    }

    /// Number of keys currently tracked.
    pub async fn tracked_keys(&self) -> usize {
        self.records.read().await.len()
    }
}
