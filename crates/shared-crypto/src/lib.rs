//! # Shared Crypto - PII Field Protection
//!
//! Field-level encryption for personal data persisted by the waitlist core
//! and by any other subsystem that stores PII.
//!
//! ## Components
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `symmetric` | AES-256-GCM envelopes (`nonce ‖ ciphertext ‖ tag`, base64) |
//! | `codec` | `EncryptionCodec`: dev/production key policy, legacy plaintext fallback |
//! | `fields` | Apply the codec to named fields of a JSON record |
//!
//! ## Security Properties
//!
//! - 256-bit key, 96-bit random nonce per call, 128-bit tag
//! - Keys zeroized on drop and redacted from `Debug`
//! - Production mode fails closed when no key is configured

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod errors;
pub mod fields;
pub mod symmetric;

// Re-exports
pub use codec::{looks_like_legacy_plaintext, EncryptionCodec, RuntimeMode};
pub use errors::CryptoError;
pub use fields::{decrypt_fields, encrypt_fields};
pub use symmetric::{decrypt, encrypt, generate_key_base64, Nonce, SecretKey};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
