//! # Fixed Window State Machine
//!
//! Per-identifier state used by the local store:
//!
//! ```text
//!   (none) ──first hit──→ OPEN(count=1) ──hit──→ ... ──count=limit──→ EXHAUSTED
//!                             ↑                                          │
//!                             └──────── hit after reset_at (lazy) ───────┘
//! ```
//!
//! There is no timer. Expiry is checked when the identifier is hit again or
//! when the store sweeps.

use super::decision::RateLimitDecision;

/// One identifier's current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowState {
    /// Requests admitted in this window.
    pub count: u32,
    /// Window end, Unix milliseconds.
    pub reset_at_ms: u64,
}

impl WindowState {
    /// A fresh, empty window starting at `now_ms`.
    pub fn open(now_ms: u64, window_ms: u64) -> Self {
        Self {
            count: 0,
            reset_at_ms: now_ms.saturating_add(window_ms.max(1)),
        }
    }

    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.reset_at_ms
    }

    /// Register one request, resetting first if the window has passed.
    pub fn hit(&mut self, now_ms: u64, limit: u32, window_ms: u64) -> RateLimitDecision {
        if self.is_expired(now_ms) {
            *self = Self::open(now_ms, window_ms);
        }

        let reset = epoch_seconds_ceil(self.reset_at_ms);
        if self.count >= limit {
            return RateLimitDecision::denied(limit, reset);
        }

        self.count += 1;
        RateLimitDecision::allowed(limit, limit - self.count, reset)
    }
}

/// Milliseconds to whole seconds, rounded up so a reset is never reported early.
pub fn epoch_seconds_ceil(epoch_ms: u64) -> u64 {
    epoch_ms.div_ceil(1000)
}
