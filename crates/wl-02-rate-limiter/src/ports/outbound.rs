//! # Outbound Ports (Driven Ports)
//!
//! Dependencies required by the rate limiter service.

use crate::domain::decision::RateLimitDecision;
use crate::domain::errors::BackendError;
use async_trait::async_trait;
use std::time::Duration;

/// Shared, network-accessible sliding-window counter store.
///
/// One call must be atomic on the backend side: concurrent callers in other
/// processes see a consistent count.
///
/// Production: `UpstashRestBackend`
#[async_trait]
pub trait SlidingWindowBackend: Send + Sync {
    /// Register one request for `identifier` and decide.
    async fn check(
        &self,
        identifier: &str,
        limit: u32,
        window: Duration,
        now_ms: u64,
    ) -> Result<RateLimitDecision, BackendError>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Wall clock in Unix milliseconds (for testability).
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u64;
}
