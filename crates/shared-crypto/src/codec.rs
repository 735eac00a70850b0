//! # Field Encryption Codec
//!
//! String-in, string-out encryption for individual PII fields.
//!
//! ## Behaviour Matrix
//!
//! | Key | Mode | `encrypt` | `decrypt` |
//! |-----|------|-----------|-----------|
//! | set | any | base64 envelope | plaintext, or legacy passthrough, or `None` |
//! | unset | development | input unchanged | input unchanged |
//! | unset | production | `None` | `None` |
//!
//! ## Legacy Passthrough
//!
//! Snapshots written before encryption was introduced hold plaintext PII.
//! When a value cannot be opened (not base64, too short, or fails
//! authentication) and it looks like a plain email address or a personal
//! name, it is returned as-is instead of failing the read.

use crate::symmetric::{self, SecretKey};
use crate::CryptoError;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, error, warn};

static LEGACY_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid legacy email pattern")
});

static LEGACY_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{L}\p{M}][\p{L}\p{M}'’. \-]{0,99}$").expect("invalid legacy name pattern")
});

/// Whether the process runs with production safeguards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RuntimeMode {
    /// Missing keys degrade to plaintext passthrough.
    #[default]
    Development,
    /// Missing keys make every encryption attempt fail.
    Production,
}

impl RuntimeMode {
    /// Interpret an environment value (`production`/`prod`, case-insensitive).
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "production" || v == "prod" => RuntimeMode::Production,
            _ => RuntimeMode::Development,
        }
    }

    /// Production mode?
    pub fn is_production(self) -> bool {
        matches!(self, RuntimeMode::Production)
    }
}

/// Authenticated field encryption with a dev-mode and legacy fallback.
#[derive(Debug, Clone)]
pub struct EncryptionCodec {
    key: Option<SecretKey>,
    mode: RuntimeMode,
}

impl EncryptionCodec {
    /// Create a codec from an optional key.
    pub fn new(key: Option<SecretKey>, mode: RuntimeMode) -> Self {
        Self { key, mode }
    }

    /// Create a codec from optional base64 key material.
    ///
    /// Blank material counts as "no key".
    ///
    /// # Errors
    ///
    /// Propagates [`SecretKey::from_base64`] failures for malformed keys.
    pub fn from_base64_key(encoded: Option<&str>, mode: RuntimeMode) -> Result<Self, CryptoError> {
        let key = match encoded.map(str::trim).filter(|s| !s.is_empty()) {
            Some(material) => Some(SecretKey::from_base64(material)?),
            None => None,
        };
        Ok(Self::new(key, mode))
    }

    /// Codec without a key.
    pub fn without_key(mode: RuntimeMode) -> Self {
        Self::new(None, mode)
    }

    /// Is a key configured?
    pub fn is_configured(&self) -> bool {
        self.key.is_some()
    }

    /// Runtime mode.
    pub fn mode(&self) -> RuntimeMode {
        self.mode
    }

    /// Encrypt a field value.
    ///
    /// `None` means the value could not be protected; callers persisting PII
    /// must abort the write.
    pub fn encrypt(&self, plaintext: &str) -> Option<String> {
        if plaintext.is_empty() {
            return Some(String::new());
        }

        let Some(key) = &self.key else {
            if self.mode.is_production() {
                error!("Encryption key missing in production; refusing to encode field");
                return None;
            }
            return Some(plaintext.to_string());
        };

        match symmetric::seal_str(key, plaintext) {
            Ok(sealed) => Some(sealed),
            Err(e) => {
                error!(error = %e, "Field encryption failed");
                None
            }
        }
    }

    /// Decrypt a field value.
    ///
    /// `None` means the value is neither a valid envelope for this key nor
    /// recognisable legacy plaintext.
    pub fn decrypt(&self, value: &str) -> Option<String> {
        if value.is_empty() {
            return Some(String::new());
        }

        let Some(key) = &self.key else {
            if self.mode.is_production() {
                error!("Encryption key missing in production; refusing to decode field");
                return None;
            }
            return Some(value.to_string());
        };

        match symmetric::open_str(key, value) {
            Ok(plaintext) => Some(plaintext),
            Err(e) => {
                if looks_like_legacy_plaintext(value) {
                    debug!(reason = %e, "Field is not an envelope; treating as legacy plaintext");
                    Some(value.to_string())
                } else {
                    warn!(error = %e, "Field could not be decrypted");
                    None
                }
            }
        }
    }
}

/// Shape check for values stored before encryption existed.
///
/// Approximate by nature: a damaged envelope that happens to look like a
/// name would be returned verbatim.
pub fn looks_like_legacy_plaintext(value: &str) -> bool {
    LEGACY_EMAIL.is_match(value) || LEGACY_NAME.is_match(value)
}
