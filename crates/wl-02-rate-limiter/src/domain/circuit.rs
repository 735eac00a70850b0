//! Backend circuit.
//!
//! After `failure_threshold` consecutive backend failures the distributed
//! backend is skipped for `open_timeout`; checks go straight to the local
//! store. The first check after the timeout probes the backend again.
//!
//! ```text
//!   CLOSED ──N failures──→ OPEN ──open_timeout──→ probe ──ok──→ CLOSED
//!                            ↑                      │
//!                            └────────fail──────────┘
//! ```

use super::config::CircuitConfig;
use parking_lot::RwLock;
use std::fmt;

/// Circuit state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Backend is used
    Closed,
    /// Backend is skipped until the timeout passes
    Open,
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CircuitState::Closed => write!(f, "closed"),
            CircuitState::Open => write!(f, "open"),
        }
    }
}

#[derive(Debug, Default)]
struct CircuitInner {
    consecutive_failures: u32,
    open_until_ms: Option<u64>,
}

/// Consecutive-failure circuit around the distributed backend.
#[derive(Debug)]
pub struct BackendCircuit {
    inner: RwLock<CircuitInner>,
    config: CircuitConfig,
}

impl BackendCircuit {
    pub fn new(config: CircuitConfig) -> Self {
        Self {
            inner: RwLock::new(CircuitInner::default()),
            config,
        }
    }

    /// Should the backend be tried at `now_ms`?
    pub fn should_attempt(&self, now_ms: u64) -> bool {
        match self.inner.read().open_until_ms {
            Some(until) => now_ms >= until,
            None => true,
        }
    }

    pub fn state(&self, now_ms: u64) -> CircuitState {
        if self.should_attempt(now_ms) {
            CircuitState::Closed
        } else {
            CircuitState::Open
        }
    }

    pub fn record_success(&self) {
        let mut inner = self.inner.write();
        if inner.open_until_ms.is_some() || inner.consecutive_failures > 0 {
            tracing::info!("[wl-02] Rate limit backend recovered");
        }
        *inner = CircuitInner::default();
    }

    pub fn record_failure(&self, now_ms: u64) {
        let mut inner = self.inner.write();
        inner.consecutive_failures = inner.consecutive_failures.saturating_add(1);

        if inner.consecutive_failures >= self.config.failure_threshold.max(1) {
            let open_ms = u64::try_from(self.config.open_timeout.as_millis()).unwrap_or(u64::MAX);
            inner.open_until_ms = Some(now_ms.saturating_add(open_ms));
            tracing::warn!(
                failures = inner.consecutive_failures,
                open_ms,
                "[wl-02] Rate limit backend circuit opened"
            );
        }
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.inner.read().consecutive_failures
    }
}
