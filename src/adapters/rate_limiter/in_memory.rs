//! In-memory rate limiter for single-server deployments.
//!
//! Uses a fixed-window counter algorithm with an in-memory HashMap. Not
//! suitable for multi-server deployments.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::ports::{
    RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult, RateLimitStatus, RateLimiter,
};

/// Requests allowed per key per window.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitQuota {
    /// Maximum requests per window.
    pub max_requests: u32,

    /// Window duration in seconds.
    pub window_secs: u32,
}

impl Default for RateLimitQuota {
    fn default() -> Self {
        Self {
            max_requests: 5,
            window_secs: 60,
        }
    }
}

/// State for a single rate limit window.
#[derive(Debug, Clone)]
struct WindowState {
    /// Number of requests in the current window.
    count: u32,
    /// Unix seconds when the current window started.
    window_start: u64,
}

/// In-memory fixed-window rate limiter.
#[derive(Debug)]
pub struct InMemoryRateLimiter {
    quota: RateLimitQuota,
    windows: Arc<RwLock<HashMap<String, WindowState>>>,
}

impl InMemoryRateLimiter {
    /// Create a new limiter with the given quota.
    pub fn new(quota: RateLimitQuota) -> Self {
        Self {
            quota,
            windows: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a limiter with the default quota (5 per 60 seconds).
    pub fn with_defaults() -> Self {
        Self::new(RateLimitQuota::default())
    }

    fn now_secs() -> u64 {
        chrono::Utc::now().timestamp() as u64
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: RateLimitKey) -> Result<RateLimitResult, RateLimitError> {
        let bucket_key = key.bucket_key();
        let limit = self.quota.max_requests;
        let window_secs = self.quota.window_secs as u64;
        let now = Self::now_secs();

        let mut windows = self.windows.write().await;

        let state = windows.entry(bucket_key).or_insert_with(|| WindowState {
            count: 0,
            window_start: now,
        });

        // Window expired: start a fresh one
        if now >= state.window_start + window_secs {
            state.count = 0;
            state.window_start = now;
        }

        if state.count >= limit {
            let retry_after = (state.window_start + window_secs).saturating_sub(now) as u32;
            return Ok(RateLimitResult::Denied(RateLimitDenied {
                limit,
                retry_after_secs: retry_after.max(1),
            }));
        }

        state.count += 1;
        Ok(RateLimitResult::Allowed(RateLimitStatus {
            limit,
            remaining: limit.saturating_sub(state.count),
            reset_at: state.window_start + window_secs,
        }))
    }

    async fn reset(&self, key: RateLimitKey) -> Result<(), RateLimitError> {
        let mut windows = self.windows.write().await;
        windows.remove(&key.bucket_key());
        Ok(())
    }
}
