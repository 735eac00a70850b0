//! Rate limiter configuration and named presets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Named `(limit, window)` pairs chosen per endpoint sensitivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateLimitPreset {
    /// Signup and other abuse-prone writes: 5 per minute.
    Strict,
    /// Ordinary API reads: 20 per minute.
    Standard,
    /// Cheap lookups: 100 per minute.
    Lenient,
}

impl RateLimitPreset {
    /// All presets, strictest first.
    pub const ALL: [RateLimitPreset; 3] = [Self::Strict, Self::Standard, Self::Lenient];

    /// Requests allowed per window.
    pub fn limit(self) -> u32 {
        match self {
            Self::Strict => 5,
            Self::Standard => 20,
            Self::Lenient => 100,
        }
    }

    /// Window length.
    pub fn window(self) -> Duration {
        Duration::from_secs(60)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Standard => "standard",
            Self::Lenient => "lenient",
        }
    }
}

impl fmt::Display for RateLimitPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RateLimitPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "standard" => Ok(Self::Standard),
            "lenient" => Ok(Self::Lenient),
            other => Err(format!("unknown rate limit preset '{other}'")),
        }
    }
}

/// Backend circuit configuration
#[derive(Debug, Clone, PartialEq)]
pub struct CircuitConfig {
    /// Consecutive backend failures before the backend is skipped
    pub failure_threshold: u32,
    /// How long the backend is skipped once the circuit opens
    pub open_timeout: Duration,
}

impl Default for CircuitConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            open_timeout: Duration::from_secs(30),
        }
    }
}

/// Rate limiter configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimiterConfig {
    /// Upper bound on one distributed backend call
    pub backend_timeout: Duration,
    /// Chance that a local check also sweeps expired windows (0.0 to 1.0)
    pub sweep_probability: f64,
    /// Backend circuit
    pub circuit: CircuitConfig,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            backend_timeout: Duration::from_millis(1500),
            sweep_probability: 0.01,
            circuit: CircuitConfig::default(),
        }
    }
}

impl RateLimiterConfig {
    pub fn with_backend_timeout(mut self, timeout: Duration) -> Self {
        self.backend_timeout = timeout;
        self
    }

    /// Clamped to `[0.0, 1.0]`.
    pub fn with_sweep_probability(mut self, probability: f64) -> Self {
        self.sweep_probability = if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 1.0)
        };
        self
    }

    pub fn with_circuit(mut self, circuit: CircuitConfig) -> Self {
        self.circuit = circuit;
        self
    }
}
