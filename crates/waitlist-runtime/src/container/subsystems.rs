//! # Subsystem Container
//!
//! Builds the ledger and the rate limiter once at process start. Handlers
//! receive them by `Arc` instead of reaching for globals, so a test can
//! build a fresh container per case.

use super::config::{ConfigError, WaitlistConfig};
use crate::handlers::signup::SignupCoordinator;
use parking_lot::RwLock;
use shared_crypto::{CryptoError, EncryptionCodec};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use wl_01_waitlist_ledger::{
    LedgerDependencies, LedgerError, SnapshotFileStore, SystemTimeSource, WaitlistLedger,
    WaitlistLedgerApi,
};
use wl_02_rate_limiter::{
    RateLimitApi, RateLimiter, RateLimiterDependencies, SlidingWindowBackend, SystemClock,
    UpstashRestBackend,
};

/// Ledger persisted to the encrypted snapshot file.
pub type FileLedger = WaitlistLedger<SnapshotFileStore, SystemTimeSource>;

/// Errors raised while assembling the container.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Encryption setup failed: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Ledger could not be opened: {0}")]
    Ledger(#[from] LedgerError),
}

/// Container for the waitlist subsystems.
pub struct WaitlistContainer {
    /// Waitlist Ledger (wl-01)
    pub ledger: Arc<RwLock<FileLedger>>,
    /// Rate Limiter (wl-02)
    pub rate_limiter: Arc<RateLimiter>,
    /// Field codec, shared with other PII-persisting code
    pub codec: EncryptionCodec,
    config: WaitlistConfig,
}

impl WaitlistContainer {
    /// Validate `config`, open the ledger and build the rate limiter.
    pub fn build(config: WaitlistConfig) -> Result<Self, StartupError> {
        if config.mode.is_production() {
            config.validate_for_production()?;
        } else {
            config.validate()?;
        }

        let codec = EncryptionCodec::from_base64_key(config.encryption_key.as_deref(), config.mode)?;
        if !codec.is_configured() {
            warn!("[runtime] No encryption key configured; PII is stored unencrypted (development mode)");
        }

        let ledger = WaitlistLedger::open(
            LedgerDependencies {
                repository: SnapshotFileStore::new(&config.data_path, codec.clone()),
                time_source: SystemTimeSource,
            },
            config.ledger.clone(),
        )?;
        info!(
            path = %config.data_path.display(),
            entries = ledger.total_count(),
            "[runtime] Waitlist ledger opened"
        );

        let rate_limiter = RateLimiter::new(
            RateLimiterDependencies {
                backend: Self::build_backend(&config),
                clock: Arc::new(SystemClock),
            },
            config.rate_limiter.clone(),
        );

        Ok(Self {
            ledger: Arc::new(RwLock::new(ledger)),
            rate_limiter: Arc::new(rate_limiter),
            codec,
            config,
        })
    }

    /// A misconfigured backend degrades to local limiting instead of failing startup.
    fn build_backend(config: &WaitlistConfig) -> Option<Arc<dyn SlidingWindowBackend>> {
        let (url, token) = config.backend_credentials()?;
        match UpstashRestBackend::new(url, token, config.rate_limiter.backend_timeout) {
            Ok(backend) => Some(Arc::new(backend) as Arc<dyn SlidingWindowBackend>),
            Err(e) => {
                warn!(error = %e, "[runtime] Rate limit backend disabled");
                None
            }
        }
    }

    /// Signup flow over this container's ledger and limiter.
    pub fn signup_coordinator(&self) -> SignupCoordinator<SnapshotFileStore, SystemTimeSource> {
        let limiter: Arc<dyn RateLimitApi> = self.rate_limiter.clone();
        SignupCoordinator::new(Arc::clone(&self.ledger), limiter)
    }

    pub fn config(&self) -> &WaitlistConfig {
        &self.config
    }
}
