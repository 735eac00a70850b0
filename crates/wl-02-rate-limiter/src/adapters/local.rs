//! Process-local fixed-window store.
//!
//! Same limit/window semantics as the distributed backend, without
//! cross-process visibility. Expired windows are evicted by an occasional
//! probabilistic sweep instead of a background task.

use crate::domain::decision::RateLimitDecision;
use crate::domain::window::WindowState;
use dashmap::DashMap;
use rand::Rng;

/// Per-identifier windows held in memory.
#[derive(Debug)]
pub struct LocalWindowStore {
    windows: DashMap<String, WindowState>,
    sweep_probability: f64,
}

impl LocalWindowStore {
    pub fn new(sweep_probability: f64) -> Self {
        Self {
            windows: DashMap::new(),
            sweep_probability: if sweep_probability.is_nan() {
                0.0
            } else {
                sweep_probability.clamp(0.0, 1.0)
            },
        }
    }

    /// Register one request and decide, then maybe sweep.
    pub fn check(&self, identifier: &str, limit: u32, window_ms: u64, now_ms: u64) -> RateLimitDecision {
        let decision = {
            let mut state = self
                .windows
                .entry(identifier.to_string())
                .or_insert_with(|| WindowState::open(now_ms, window_ms));
            state.hit(now_ms, limit, window_ms)
        };

        if self.sweep_probability > 0.0 && rand::thread_rng().gen_bool(self.sweep_probability) {
            self.sweep_expired(now_ms);
        }
        decision
    }

    /// Evict every expired window. Returns how many were removed.
    pub fn sweep_expired(&self, now_ms: u64) -> usize {
        let before = self.windows.len();
        self.windows.retain(|_, state| !state.is_expired(now_ms));
        let removed = before.saturating_sub(self.windows.len());
        if removed > 0 {
            tracing::debug!(removed, "[wl-02] Swept expired local windows");
        }
        removed
    }

    /// Number of identifiers currently tracked.
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}
