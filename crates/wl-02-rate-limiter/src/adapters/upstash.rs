//! Distributed sliding window over a Redis REST endpoint (Upstash protocol).
//!
//! Each check is one `EVAL` of a Lua script, so the read-increment-expire
//! sequence is atomic on the server. The count is a weighted sliding window:
//! requests in the current fixed window plus the previous window's count
//! scaled by how much of it still overlaps.
//!
//! Request: `POST <url>` with `Authorization: Bearer <token>` and a JSON
//! command array. Response: `{"result": <n>}` or `{"error": "<msg>"}`.

use crate::domain::decision::RateLimitDecision;
use crate::domain::errors::BackendError;
use crate::domain::window::epoch_seconds_ceil;
use crate::ports::outbound::SlidingWindowBackend;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Key namespace for limiter counters.
pub const DEFAULT_KEY_PREFIX: &str = "waitlist:ratelimit";

/// Returns remaining requests, or -1 when the limit is reached.
const SLIDING_WINDOW_SCRIPT: &str = r#"
local current_key = KEYS[1]
local previous_key = KEYS[2]
local limit = tonumber(ARGV[1])
local now = tonumber(ARGV[2])
local window = tonumber(ARGV[3])

local current = tonumber(redis.call("GET", current_key) or "0")
local previous = tonumber(redis.call("GET", previous_key) or "0")
local overlap = 1 - ((now % window) / window)
local weighted_previous = math.floor(previous * overlap)

if weighted_previous + current >= limit then
  return -1
end

local updated = redis.call("INCR", current_key)
if updated == 1 then
  redis.call("PEXPIRE", current_key, window * 2 + 1000)
end
return limit - (updated + weighted_previous)
"#;

#[derive(Debug, Deserialize)]
struct RestResponse {
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Upstash-compatible Redis REST backend.
pub struct UpstashRestBackend {
    client: Client,
    url: String,
    token: String,
    key_prefix: String,
}

impl std::fmt::Debug for UpstashRestBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstashRestBackend")
            .field("url", &self.url)
            .field("token", &"***")
            .field("key_prefix", &self.key_prefix)
            .finish()
    }
}

impl UpstashRestBackend {
    /// Create a backend. `timeout` bounds each HTTP request.
    pub fn new(
        url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let url = url.into().trim().trim_end_matches('/').to_string();
        let token = token.into().trim().to_string();
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(BackendError::Misconfigured(
                "REST URL must be http(s)".to_string(),
            ));
        }
        if token.is_empty() {
            return Err(BackendError::Misconfigured("empty REST token".to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| BackendError::Misconfigured(e.to_string()))?;

        Ok(Self {
            client,
            url,
            token,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        })
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    fn window_keys(&self, identifier: &str, window_ms: u64, now_ms: u64) -> (String, String, u64) {
        let index = now_ms / window_ms;
        let current = format!("{}:{}:{}", self.key_prefix, identifier, index);
        let previous = format!(
            "{}:{}:{}",
            self.key_prefix,
            identifier,
            index.saturating_sub(1)
        );
        (current, previous, index)
    }

    async fn eval(&self, command: Vec<String>) -> Result<serde_json::Value, BackendError> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&command)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
            });
        }

        let body: RestResponse = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        if let Some(error) = body.error {
            return Err(BackendError::Command(error));
        }
        body.result
            .ok_or_else(|| BackendError::InvalidResponse("missing result".to_string()))
    }
}

/// Turn the script's return value into a decision.
fn decision_from_result(
    result: &serde_json::Value,
    limit: u32,
    reset_epoch_seconds: u64,
) -> Result<RateLimitDecision, BackendError> {
    let remaining = result
        .as_i64()
        .ok_or_else(|| BackendError::InvalidResponse(format!("non-integer result {result}")))?;

    if remaining < 0 {
        return Ok(RateLimitDecision::denied(limit, reset_epoch_seconds));
    }
    let remaining = u32::try_from(remaining).unwrap_or(limit).min(limit);
    Ok(RateLimitDecision::allowed(limit, remaining, reset_epoch_seconds))
}

#[async_trait]
impl SlidingWindowBackend for UpstashRestBackend {
    async fn check(
        &self,
        identifier: &str,
        limit: u32,
        window: Duration,
        now_ms: u64,
    ) -> Result<RateLimitDecision, BackendError> {
        let window_ms = u64::try_from(window.as_millis()).unwrap_or(u64::MAX).max(1);
        let (current, previous, index) = self.window_keys(identifier, window_ms, now_ms);
        let reset_ms = index.saturating_add(1).saturating_mul(window_ms);

        let command = vec![
            "EVAL".to_string(),
            SLIDING_WINDOW_SCRIPT.to_string(),
            "2".to_string(),
            current,
            previous,
            limit.to_string(),
            now_ms.to_string(),
            window_ms.to_string(),
        ];

        let result = self.eval(command).await?;
        decision_from_result(&result, limit, epoch_seconds_ceil(reset_ms))
    }

    fn name(&self) -> &'static str {
        "upstash-rest"
    }
}
