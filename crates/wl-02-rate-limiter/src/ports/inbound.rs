//! # Inbound Ports (Driving Ports)
//!
//! The API exposed to request handlers.

use crate::domain::config::RateLimitPreset;
use crate::domain::decision::RateLimitDecision;
use async_trait::async_trait;
use std::time::Duration;

/// Primary API for the Rate Limiter.
///
/// Checks always yield a decision. Backend trouble degrades to the local
/// store and is never surfaced as an error.
#[async_trait]
pub trait RateLimitApi: Send + Sync {
    /// Register one request for `identifier` against `limit` per `window`.
    async fn check_rate_limit(&self, identifier: &str, limit: u32, window: Duration) -> RateLimitDecision;

    /// Same as [`check_rate_limit`](Self::check_rate_limit) with a named preset.
    async fn check_preset(&self, identifier: &str, preset: RateLimitPreset) -> RateLimitDecision {
        self.check_rate_limit(identifier, preset.limit(), preset.window())
            .await
    }
}
