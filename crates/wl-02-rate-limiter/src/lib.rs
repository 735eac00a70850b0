//! # Rate Limiter (wl-02)
//!
//! Guards the request path into the waitlist ledger. A distributed sliding
//! window (Redis REST) is preferred when configured; when it is missing,
//! failing or slow, a process-local fixed window with the same limit and
//! window semantics answers instead.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Always Decide | A check yields a decision; backend errors are never surfaced |
//! | 2 | Bounded Wait | Backend calls are cut off after `backend_timeout` |
//! | 3 | Lazy Expiry | Windows reset on the next hit after `reset_at`; no timers |
//! | 4 | Bounded Memory | Expired local windows are swept probabilistically |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Presets, decisions and headers, window state machine, circuit, client IP
//! - `ports/` - Inbound API (`RateLimitApi`), outbound SPI (`SlidingWindowBackend`, `Clock`)
//! - `adapters/` - Upstash REST backend, local store, clocks
//! - `service/` - `RateLimiter`
//!
//! ## Usage
//!
//! ```ignore
//! use wl_02_rate_limiter::{client_ip, RateLimitApi, RateLimitPreset, RateLimiter, RateLimiterConfig};
//!
//! let limiter = RateLimiter::local_only(RateLimiterConfig::default());
//! let key = format!("signup:{}", client_ip(&headers));
//! let decision = limiter.check_preset(&key, RateLimitPreset::Strict).await;
//! for (name, value) in decision.headers(limiter.now_epoch_seconds()) { /* ... */ }
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export key types for convenience
pub use adapters::{LocalWindowStore, ManualClock, SystemClock, UpstashRestBackend};
pub use domain::circuit::{BackendCircuit, CircuitState};
pub use domain::client_ip::{client_ip, HeaderLookup, UNKNOWN_CLIENT};
pub use domain::config::{CircuitConfig, RateLimitPreset, RateLimiterConfig};
pub use domain::decision::{
    RateLimitDecision, HEADER_LIMIT, HEADER_REMAINING, HEADER_RESET, HEADER_RETRY_AFTER,
};
pub use domain::errors::BackendError;
pub use ports::inbound::RateLimitApi;
pub use ports::outbound::{Clock, SlidingWindowBackend};
pub use service::{RateLimiter, RateLimiterDependencies};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
