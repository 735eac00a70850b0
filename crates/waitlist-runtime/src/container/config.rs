//! # Waitlist Configuration
//!
//! Everything is read from the environment.
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `WAITLIST_DATA_PATH` | snapshot file | `waitlist-data.json` |
//! | `WAITLIST_ENCRYPTION_KEY` | base64 32-byte key | unset |
//! | `WAITLIST_ENV` | `production` enables production mode | development |
//! | `UPSTASH_REDIS_REST_URL` | rate limit backend URL | unset |
//! | `UPSTASH_REDIS_REST_TOKEN` | rate limit backend token | unset |
//! | `WAITLIST_POSITION_BASELINE` | position counter baseline | `847` |
//! | `WAITLIST_SPOTS_PER_REFERRAL` | spots per referral | `10` |
//! | `WAITLIST_REFERRAL_PREFIX` | referral code prefix | `REF` |
//!
//! ## Security Requirements
//!
//! - The encryption key MUST be set in production
//! - The backend URL and token come as a pair or not at all

use shared_crypto::{RuntimeMode, SecretKey};
use std::path::PathBuf;
use thiserror::Error;
use wl_01_waitlist_ledger::{LedgerConfig, DEFAULT_SNAPSHOT_FILE};
use wl_02_rate_limiter::RateLimiterConfig;

pub const ENV_DATA_PATH: &str = "WAITLIST_DATA_PATH";
pub const ENV_ENCRYPTION_KEY: &str = "WAITLIST_ENCRYPTION_KEY";
pub const ENV_MODE: &str = "WAITLIST_ENV";
pub const ENV_BACKEND_URL: &str = "UPSTASH_REDIS_REST_URL";
pub const ENV_BACKEND_TOKEN: &str = "UPSTASH_REDIS_REST_TOKEN";
pub const ENV_POSITION_BASELINE: &str = "WAITLIST_POSITION_BASELINE";
pub const ENV_SPOTS_PER_REFERRAL: &str = "WAITLIST_SPOTS_PER_REFERRAL";
pub const ENV_REFERRAL_PREFIX: &str = "WAITLIST_REFERRAL_PREFIX";

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No encryption key in production.
    #[error(
        "SECURITY VIOLATION: no encryption key configured. \
         Set WAITLIST_ENCRYPTION_KEY to a base64-encoded 32-byte key."
    )]
    MissingEncryptionKey,

    /// Key material does not decode to 32 bytes.
    #[error("WAITLIST_ENCRYPTION_KEY is not a valid key: {0}")]
    InvalidEncryptionKey(String),

    /// Only one of URL/token is set.
    #[error("UPSTASH_REDIS_REST_URL and UPSTASH_REDIS_REST_TOKEN must be set together")]
    IncompleteBackend,

    /// A numeric variable did not parse.
    #[error("{var} has invalid value '{value}'")]
    InvalidValue { var: &'static str, value: String },
}

/// Complete waitlist configuration.
#[derive(Clone)]
pub struct WaitlistConfig {
    /// Snapshot file location.
    pub data_path: PathBuf,
    /// Base64 key material.
    pub encryption_key: Option<String>,
    /// Runtime mode.
    pub mode: RuntimeMode,
    /// Rate limit backend URL.
    pub backend_url: Option<String>,
    /// Rate limit backend token.
    pub backend_token: Option<String>,
    /// Ledger configuration.
    pub ledger: LedgerConfig,
    /// Rate limiter configuration.
    pub rate_limiter: RateLimiterConfig,
}

impl Default for WaitlistConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_SNAPSHOT_FILE),
            encryption_key: None,
            mode: RuntimeMode::Development,
            backend_url: None,
            backend_token: None,
            ledger: LedgerConfig::default(),
            rate_limiter: RateLimiterConfig::default(),
        }
    }
}

impl std::fmt::Debug for WaitlistConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaitlistConfig")
            .field("data_path", &self.data_path)
            .field("encryption_key", &self.encryption_key.as_ref().map(|_| "***"))
            .field("mode", &self.mode)
            .field("backend_url", &self.backend_url)
            .field("backend_token", &self.backend_token.as_ref().map(|_| "***"))
            .field("ledger", &self.ledger)
            .field("rate_limiter", &self.rate_limiter)
            .finish()
    }
}

impl WaitlistConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();

        if let Some(path) = get(ENV_DATA_PATH) {
            config.data_path = PathBuf::from(path);
        }
        config.encryption_key = get(ENV_ENCRYPTION_KEY);
        config.mode = RuntimeMode::from_env_value(get(ENV_MODE).as_deref());
        config.backend_url = get(ENV_BACKEND_URL);
        config.backend_token = get(ENV_BACKEND_TOKEN);

        if let Some(raw) = get(ENV_POSITION_BASELINE) {
            config.ledger = config
                .ledger
                .with_position_baseline(parse_number(ENV_POSITION_BASELINE, &raw)?);
        }
        if let Some(raw) = get(ENV_SPOTS_PER_REFERRAL) {
            config.ledger = config
                .ledger
                .with_spots_per_referral(parse_number(ENV_SPOTS_PER_REFERRAL, &raw)?);
        }
        if let Some(prefix) = get(ENV_REFERRAL_PREFIX) {
            config.ledger = config.ledger.with_referral_prefix(prefix.to_ascii_uppercase());
        }

        Ok(config)
    }

    /// URL and token, when both are configured.
    pub fn backend_credentials(&self) -> Option<(&str, &str)> {
        match (&self.backend_url, &self.backend_token) {
            (Some(url), Some(token)) => Some((url.as_str(), token.as_str())),
            _ => None,
        }
    }

    /// Checks that apply in every mode.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend_url.is_some() != self.backend_token.is_some() {
            return Err(ConfigError::IncompleteBackend);
        }
        if let Some(key) = &self.encryption_key {
            SecretKey::from_base64(key)
                .map_err(|e| ConfigError::InvalidEncryptionKey(e.to_string()))?;
        }
        Ok(())
    }

    /// Validate configuration for production readiness.
    ///
    /// # Returns
    ///
    /// Returns `Err` if:
    /// - no encryption key is configured, or it is malformed
    /// - only one of the backend URL/token is set
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        if self.encryption_key.is_none() {
            return Err(ConfigError::MissingEncryptionKey);
        }
        self.validate()
    }
}

fn parse_number<N: std::str::FromStr>(var: &'static str, raw: &str) -> Result<N, ConfigError> {
    raw.parse().map_err(|_| ConfigError::InvalidValue {
        var,
        value: raw.to_string(),
    })
}
