//! # Domain Errors
//!
//! Error types for the Waitlist Ledger subsystem.
//!
//! "Not found" is never an error here: lookups and mutations of unknown
//! emails return `None`.

use thiserror::Error;

/// Errors raised by ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The normalized email is already on the list.
    ///
    /// Public endpoints must answer this exactly like a fresh signup.
    #[error("Email already registered")]
    DuplicateEmail,

    /// The referral code passed to `add_entry` belongs to another entry.
    #[error("Referral code already assigned: {code}")]
    DuplicateReferralCode {
        /// Offending code
        code: String,
    },

    /// Code generation kept colliding with existing codes.
    #[error("No unique referral code after {attempts} attempts")]
    ReferralCodeExhausted {
        /// Attempts made
        attempts: u32,
    },

    /// Persisting the snapshot failed; the mutation was rolled back.
    #[error("Storage error: {0}")]
    Storage(#[from] RepositoryError),
}

/// Errors raised by snapshot repositories.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Read/write failure.
    #[error("Snapshot I/O error: {message}")]
    Io {
        /// Underlying error
        message: String,
    },

    /// The snapshot exists but cannot be parsed.
    #[error("Snapshot corrupted: {message}")]
    Corrupted {
        /// Parse failure
        message: String,
    },

    /// A PII field could not be protected; nothing was written.
    #[error("Field '{field}' could not be encrypted")]
    Encryption {
        /// Field name
        field: &'static str,
    },

    /// Encoding the snapshot failed.
    #[error("Snapshot serialization error: {message}")]
    Serialization {
        /// Encoder failure
        message: String,
    },
}

impl RepositoryError {
    pub(crate) fn io(err: std::io::Error) -> Self {
        RepositoryError::Io {
            message: err.to_string(),
        }
    }
}
