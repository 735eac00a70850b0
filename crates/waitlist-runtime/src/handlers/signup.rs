//! # Signup Handler
//!
//! Orchestrates one public signup:
//!
//! ```text
//! RateLimiter.check("signup:<ip>", strict)
//!       │ allowed
//!       ▼
//! Ledger.exists(email) ──yes──→ AlreadyRegistered
//!       │ no
//!       ▼
//! Ledger.add_entry(...)  ──DuplicateEmail──→ AlreadyRegistered
//!       │
//!       ▼
//! Ledger.process_referral(referrer)   (only for a known, well-formed code)
//! ```
//!
//! `Created` and `AlreadyRegistered` render the same [`SignupResponse`], so a
//! public caller cannot probe which emails are on the list.

use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use wl_01_waitlist_ledger::{
    is_valid_referral_code, EntryRepository, LedgerError, NewEntry, TimeSource, WaitlistEntry,
    WaitlistLedger, WaitlistLedgerApi,
};
use wl_02_rate_limiter::{RateLimitApi, RateLimitDecision, RateLimitPreset};

/// Locale used when the request carries none.
pub const DEFAULT_LOCALE: &str = "en";

/// Message shared by new and repeat signups.
pub const SIGNUP_ACCEPTED_MESSAGE: &str = "You're on the list! Check your inbox for confirmation.";

/// Message for throttled signups.
pub const SIGNUP_THROTTLED_MESSAGE: &str = "Too many requests. Please try again later.";

/// A validated signup as handed over by the route layer.
#[derive(Debug, Clone)]
pub struct SignupRequest {
    pub email: String,
    pub name: Option<String>,
    /// Referral code the visitor arrived with.
    pub referred_by: Option<String>,
    pub locale: String,
    pub source: Option<String>,
    pub tags: Vec<String>,
    /// Rate limit identity, usually from [`wl_02_rate_limiter::client_ip`].
    pub client_ip: String,
}

impl SignupRequest {
    pub fn new(email: impl Into<String>, client_ip: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
            referred_by: None,
            locale: DEFAULT_LOCALE.to_string(),
            source: None,
            tags: Vec::new(),
            client_ip: client_ip.into(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_referred_by(mut self, code: impl Into<String>) -> Self {
        self.referred_by = Some(code.into());
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    fn rate_limit_key(&self) -> String {
        format!("signup:{}", self.client_ip)
    }
}

/// What happened to a signup. Only trusted callers may look inside.
#[derive(Debug, Clone)]
pub enum SignupOutcome {
    /// A new entry was stored.
    Created(WaitlistEntry),
    /// The email was already on the list; nothing changed.
    AlreadyRegistered,
    /// Throttled before touching the ledger.
    RateLimited(RateLimitDecision),
}

impl SignupOutcome {
    /// Body for the public endpoint.
    pub fn response(&self) -> SignupResponse {
        match self {
            SignupOutcome::Created(_) | SignupOutcome::AlreadyRegistered => SignupResponse {
                success: true,
                message: SIGNUP_ACCEPTED_MESSAGE.to_string(),
            },
            SignupOutcome::RateLimited(_) => SignupResponse {
                success: false,
                message: SIGNUP_THROTTLED_MESSAGE.to_string(),
            },
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, SignupOutcome::RateLimited(_))
    }
}

/// Public response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignupResponse {
    pub success: bool,
    pub message: String,
}

/// Signup failures that are not the caller's fault.
#[derive(Debug, Error)]
pub enum SignupError {
    #[error("Email is required")]
    MissingEmail,

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

/// Runs the signup flow against a shared ledger and limiter.
pub struct SignupCoordinator<R, T>
where
    R: EntryRepository,
    T: TimeSource,
{
    ledger: Arc<RwLock<WaitlistLedger<R, T>>>,
    limiter: Arc<dyn RateLimitApi>,
}

impl<R, T> SignupCoordinator<R, T>
where
    R: EntryRepository,
    T: TimeSource,
{
    pub fn new(ledger: Arc<RwLock<WaitlistLedger<R, T>>>, limiter: Arc<dyn RateLimitApi>) -> Self {
        Self { ledger, limiter }
    }

    /// Throttle, then register.
    pub async fn signup(&self, request: SignupRequest) -> Result<SignupOutcome, SignupError> {
        if request.email.trim().is_empty() {
            return Err(SignupError::MissingEmail);
        }

        let decision = self
            .limiter
            .check_preset(&request.rate_limit_key(), RateLimitPreset::Strict)
            .await;
        if !decision.success {
            debug!(client_ip = %request.client_ip, "[runtime] Signup throttled");
            return Ok(SignupOutcome::RateLimited(decision));
        }

        self.register(request)
    }

    /// Ledger half of the flow. The write lock is held for the whole
    /// check-insert-credit sequence so concurrent signups cannot interleave.
    fn register(&self, request: SignupRequest) -> Result<SignupOutcome, SignupError> {
        let mut ledger = self.ledger.write();

        if ledger.exists(&request.email) {
            return Ok(SignupOutcome::AlreadyRegistered);
        }

        let referral_code = ledger.generate_unique_referral_code()?;
        let referrer = request
            .referred_by
            .as_deref()
            .and_then(|code| Self::resolve_referrer(&ledger, code));

        let mut new_entry = NewEntry::new(request.email, referral_code, request.locale)
            .with_tags(request.tags);
        new_entry.name = request.name;
        new_entry.source = request.source;
        if let Some(referrer) = &referrer {
            new_entry.referred_by = Some(referrer.referral_code.clone());
        }

        let entry = match ledger.add_entry(new_entry) {
            Ok(entry) => entry,
            Err(LedgerError::DuplicateEmail) => return Ok(SignupOutcome::AlreadyRegistered),
            Err(e) => return Err(e.into()),
        };

        if let Some(referrer) = referrer {
            let spots = ledger.config().spots_per_referral;
            match ledger.process_referral(&referrer.email, spots) {
                Ok(Some(updated)) => info!(
                    referrer_id = %updated.id,
                    position = updated.position,
                    referrals = updated.referral_count,
                    "[runtime] Referral credited"
                ),
                Ok(None) => warn!(referrer_id = %referrer.id, "[runtime] Referrer vanished before credit"),
                // The new entry is already stored; the referral credit is lost.
                Err(e) => error!(
                    referrer_id = %referrer.id,
                    error = %e,
                    "[runtime] Referral credit failed"
                ),
            }
        }

        Ok(SignupOutcome::Created(entry))
    }

    /// Malformed and unknown codes are ignored rather than rejected.
    fn resolve_referrer(ledger: &WaitlistLedger<R, T>, code: &str) -> Option<WaitlistEntry> {
        if !is_valid_referral_code(code, &ledger.config().referral_prefix) {
            debug!("[runtime] Ignoring malformed referral code");
            return None;
        }
        let referrer = ledger.get_by_referral_code(code);
        if referrer.is_none() {
            debug!("[runtime] Ignoring unknown referral code");
        }
        referrer
    }
}
