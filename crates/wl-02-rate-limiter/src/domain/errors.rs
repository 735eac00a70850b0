//! # Domain Errors
//!
//! Backend errors never reach callers of the limiter; they are logged and
//! answered from the local store.

use thiserror::Error;

/// Errors raised by a distributed sliding-window backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Backend call timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Backend transport error: {0}")]
    Transport(String),

    #[error("Backend returned HTTP {status}")]
    Status { status: u16 },

    #[error("Backend command failed: {0}")]
    Command(String),

    #[error("Unexpected backend response: {0}")]
    InvalidResponse(String),

    #[error("Backend misconfigured: {0}")]
    Misconfigured(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            BackendError::Status {
                status: status.as_u16(),
            }
        } else {
            BackendError::Transport(err.to_string())
        }
    }
}
