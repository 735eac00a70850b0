use serde::{Deserialize, Serialize};

/// Header carrying the window's request limit.
pub const HEADER_LIMIT: &str = "X-RateLimit-Limit";
/// Header carrying requests left in the window.
pub const HEADER_REMAINING: &str = "X-RateLimit-Remaining";
/// Header carrying the window reset time (Unix seconds).
pub const HEADER_RESET: &str = "X-RateLimit-Reset";
/// Header carrying seconds until a denied caller may retry.
pub const HEADER_RETRY_AFTER: &str = "Retry-After";

/// Outcome of one rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitDecision {
    /// Request may proceed.
    pub success: bool,
    /// Requests allowed per window.
    pub limit: u32,
    /// Requests left in the current window.
    pub remaining: u32,
    /// When the current window resets, Unix seconds.
    pub reset_epoch_seconds: u64,
}

impl RateLimitDecision {
    pub fn allowed(limit: u32, remaining: u32, reset_epoch_seconds: u64) -> Self {
        Self {
            success: true,
            limit,
            remaining,
            reset_epoch_seconds,
        }
    }

    pub fn denied(limit: u32, reset_epoch_seconds: u64) -> Self {
        Self {
            success: false,
            limit,
            remaining: 0,
            reset_epoch_seconds,
        }
    }

    /// Seconds until the window resets, at least 1.
    pub fn retry_after_secs(&self, now_epoch_seconds: u64) -> u64 {
        self.reset_epoch_seconds
            .saturating_sub(now_epoch_seconds)
            .max(1)
    }

    /// Standard response headers. `Retry-After` only when denied.
    pub fn headers(&self, now_epoch_seconds: u64) -> Vec<(&'static str, String)> {
        let mut headers = vec![
            (HEADER_LIMIT, self.limit.to_string()),
            (HEADER_REMAINING, self.remaining.to_string()),
            (HEADER_RESET, self.reset_epoch_seconds.to_string()),
        ];
        if !self.success {
            headers.push((
                HEADER_RETRY_AFTER,
                self.retry_after_secs(now_epoch_seconds).to_string(),
            ));
        }
        headers
    }
}
