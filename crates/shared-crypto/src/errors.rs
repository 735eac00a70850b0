//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Decryption failed (bad tag, wrong key, tampered data)
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    /// Invalid key length
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes
        expected: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// Key material is not valid base64
    #[error("Invalid key encoding: {0}")]
    InvalidKeyEncoding(String),

    /// Envelope shorter than nonce + tag
    #[error("Envelope too short: {len} bytes, minimum {min}")]
    EnvelopeTooShort {
        /// Actual envelope length in bytes
        len: usize,
        /// Minimum envelope length in bytes
        min: usize,
    },

    /// Envelope is not valid base64
    #[error("Invalid envelope encoding: {0}")]
    InvalidEnvelopeEncoding(String),
}
