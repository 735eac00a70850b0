//! # Rate Limiter Service
//!
//! Tries the distributed backend first and falls back to the local store
//! when it is absent, failing, slow or circuit-broken. The fallback is a
//! degraded mode, not an error: callers always get a decision.
//!
//! ```text
//! check ──backend configured & circuit closed?──yes──→ backend (timeout)
//!   │                                                   │ ok → decision
//!   │ no                                                │ err/timeout → record failure
//!   ↓                                                   ↓
//! LocalWindowStore ←─────────────────────────────────────┘
//! ```


use crate::adapters::{LocalWindowStore, SystemClock};
use crate::domain::circuit::{BackendCircuit, CircuitState};
use crate::domain::config::RateLimiterConfig;
use crate::domain::decision::RateLimitDecision;
use crate::domain::errors::BackendError;
use crate::ports::inbound::RateLimitApi;
use crate::ports::outbound::{Clock, SlidingWindowBackend};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Dependencies for RateLimiter
pub struct RateLimiterDependencies {
    /// Distributed backend, if configured.
    pub backend: Option<Arc<dyn SlidingWindowBackend>>,
    pub clock: Arc<dyn Clock>,
}

/// Rate limiter with distributed backend and local fallback.
pub struct RateLimiter {
    backend: Option<Arc<dyn SlidingWindowBackend>>,
    local: LocalWindowStore,
    circuit: BackendCircuit,
    clock: Arc<dyn Clock>,
    config: RateLimiterConfig,
}

impl RateLimiter {
    pub fn new(deps: RateLimiterDependencies, config: RateLimiterConfig) -> Self {
        match &deps.backend {
            Some(backend) => tracing::info!(
                backend = backend.name(),
                "[wl-02] Rate limiter using distributed backend"
            ),
            None => tracing::info!("[wl-02] Rate limiter running on local store only"),
        }

        Self {
            backend: deps.backend,
            local: LocalWindowStore::new(config.sweep_probability),
            circuit: BackendCircuit::new(config.circuit.clone()),
            clock: deps.clock,
            config,
        }
    }

    /// Limiter without a distributed backend, on the system clock.
    pub fn local_only(config: RateLimiterConfig) -> Self {
        Self::new(
            RateLimiterDependencies {
                backend: None,
                clock: Arc::new(SystemClock),
            },
            config,
        )
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    pub fn circuit_state(&self) -> CircuitState {
        self.circuit.state(self.clock.now_millis())
    }

    /// Identifiers currently held by the local store.
    pub fn tracked_identifiers(&self) -> usize {
        self.local.len()
    }

    /// Evict expired local windows now. Returns how many were removed.
    pub fn sweep_expired(&self) -> usize {
        self.local.sweep_expired(self.clock.now_millis())
    }

    /// Current time in Unix seconds, for `Retry-After` computation.
    pub fn now_epoch_seconds(&self) -> u64 {
        self.clock.now_millis() / 1000
    }

    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
    }

    async fn try_backend(
        &self,
        backend: &dyn SlidingWindowBackend,
        identifier: &str,
        limit: u32,
        window: Duration,
        now_ms: u64,
    ) -> Result<RateLimitDecision, BackendError> {
        let timeout = self.config.backend_timeout;
        match tokio::time::timeout(timeout, backend.check(identifier, limit, window, now_ms)).await {
            Ok(result) => result,
            Err(_) => Err(BackendError::Timeout {
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        }
    }
}

#[async_trait]
impl RateLimitApi for RateLimiter {
    async fn check_rate_limit(&self, identifier: &str, limit: u32, window: Duration) -> RateLimitDecision {
        let now_ms = self.clock.now_millis();

        if let Some(backend) = &self.backend {
            if self.circuit.should_attempt(now_ms) {
                match self
                    .try_backend(backend.as_ref(), identifier, limit, window, now_ms)
                    .await
                {
                    Ok(decision) => {
                        self.circuit.record_success();
                        return decision;
                    }
                    Err(e) => {
                        tracing::warn!(
                            backend = backend.name(),
                            error = %e,
                            "[wl-02] Rate limit backend unavailable, using local fallback"
                        );
                        self.circuit.record_failure(now_ms);
                    }
                }
            } else {
                tracing::debug!("[wl-02] Backend circuit open, using local fallback");
            }
        }

        let window_ms = u64::try_from(window.as_millis()).unwrap_or(u64::MAX).max(1);
        let decision = self.local.check(identifier, limit, window_ms, now_ms);
        if !decision.success {
            tracing::debug!(limit, "[wl-02] Local rate limit exceeded");
        }
        decision
    }
}
