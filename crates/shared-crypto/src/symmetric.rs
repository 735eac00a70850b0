//! # Symmetric Encryption
//!
//! AES-256-GCM sealing of individual field values.
//!
//! ## Envelope Format
//!
//! ```text
//! base64( nonce[12] ‖ ciphertext[n] ‖ tag[16] )
//! ```
//!
//! A fresh 96-bit nonce is drawn for every call, so sealing the same value
//! twice yields different envelopes.

use crate::CryptoError;
use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use zeroize::Zeroize;

/// Key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// Nonce length in bytes (96-bit GCM nonce).
pub const NONCE_LEN: usize = 12;

/// Authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Smallest decoded envelope that can possibly be valid.
pub const MIN_ENVELOPE_LEN: usize = NONCE_LEN + TAG_LEN;

/// Secret key (256-bit).
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretKey([u8; KEY_LEN]);

impl SecretKey {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse a base64-encoded 32-byte key.
    ///
    /// # Errors
    ///
    /// `InvalidKeyEncoding` if the input is not base64, `InvalidKeyLength`
    /// if it does not decode to exactly 32 bytes.
    pub fn from_base64(encoded: &str) -> Result<Self, CryptoError> {
        let mut raw = BASE64
            .decode(encoded.trim())
            .map_err(|e| CryptoError::InvalidKeyEncoding(e.to_string()))?;

        if raw.len() != KEY_LEN {
            let actual = raw.len();
            raw.zeroize();
            return Err(CryptoError::InvalidKeyLength {
                expected: KEY_LEN,
                actual,
            });
        }

        let mut bytes = [0u8; KEY_LEN];
        bytes.copy_from_slice(&raw);
        raw.zeroize();
        Ok(Self(bytes))
    }

    /// Generate random key.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut bytes);
        Self(bytes)
    }

    /// Encode as base64 (the format expected in configuration).
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.0)
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

/// Fresh random key in the base64 form read from configuration.
pub fn generate_key_base64() -> String {
    SecretKey::generate().to_base64()
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey(***)")
    }
}

/// Nonce for encryption.
#[derive(Clone)]
pub struct Nonce([u8; NONCE_LEN]);

impl Nonce {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; NONCE_LEN]) -> Self {
        Self(bytes)
    }

    /// Generate random nonce.
    pub fn generate() -> Self {
        let mut bytes = [0u8; NONCE_LEN];
        rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut bytes);
        Self(bytes)
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; NONCE_LEN] {
        &self.0
    }
}

/// Encrypt plaintext into a raw `nonce ‖ ciphertext ‖ tag` envelope.
///
/// # Errors
///
/// Returns `CryptoError::EncryptionFailed` if encryption fails.
pub fn encrypt(key: &SecretKey, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
    let nonce = Nonce::generate();

    // aes-gcm appends the tag to the ciphertext
    let sealed = cipher
        .encrypt(aes_gcm::Nonce::from_slice(nonce.as_bytes()), plaintext)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    let mut envelope = Vec::with_capacity(NONCE_LEN + sealed.len());
    envelope.extend_from_slice(nonce.as_bytes());
    envelope.extend_from_slice(&sealed);
    Ok(envelope)
}

/// Decrypt a raw `nonce ‖ ciphertext ‖ tag` envelope.
///
/// # Errors
///
/// `EnvelopeTooShort` when the input cannot hold a nonce and a tag,
/// `DecryptionFailed` when authentication fails.
pub fn decrypt(key: &SecretKey, envelope: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if envelope.len() < MIN_ENVELOPE_LEN {
        return Err(CryptoError::EnvelopeTooShort {
            len: envelope.len(),
            min: MIN_ENVELOPE_LEN,
        });
    }

    let (nonce, sealed) = envelope.split_at(NONCE_LEN);
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))?;

    cipher
        .decrypt(aes_gcm::Nonce::from_slice(nonce), sealed)
        .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))
}

/// Encrypt a UTF-8 string into a base64 envelope.
///
/// # Errors
///
/// Returns `CryptoError::EncryptionFailed` if encryption fails.
pub fn seal_str(key: &SecretKey, plaintext: &str) -> Result<String, CryptoError> {
    encrypt(key, plaintext.as_bytes()).map(|envelope| BASE64.encode(envelope))
}

/// Decrypt a base64 envelope back into a UTF-8 string.
///
/// # Errors
///
/// `InvalidEnvelopeEncoding` for non-base64 input, otherwise whatever
/// [`decrypt`] reports. Non-UTF-8 plaintext is a `DecryptionFailed`.
pub fn open_str(key: &SecretKey, encoded: &str) -> Result<String, CryptoError> {
    let envelope = BASE64
        .decode(encoded)
        .map_err(|e| CryptoError::InvalidEnvelopeEncoding(e.to_string()))?;
    let plaintext = decrypt(key, &envelope)?;
    String::from_utf8(plaintext).map_err(|e| CryptoError::DecryptionFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let key = SecretKey::generate();
        let plaintext = b"Hello, waitlist!";

        let envelope = encrypt(&key, plaintext).unwrap();
        let decrypted = decrypt(&key, &envelope).unwrap();

        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_envelope_layout() {
        let key = SecretKey::generate();
        let envelope = encrypt(&key, b"abc").unwrap();
        assert_eq!(envelope.len(), NONCE_LEN + 3 + TAG_LEN);
    }

    #[test]
    fn test_wrong_key_fails() {
        let key1 = SecretKey::generate();
        let key2 = SecretKey::generate();

        let envelope = encrypt(&key1, b"Secret message").unwrap();
        assert!(decrypt(&key2, &envelope).is_err());
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let key = SecretKey::generate();

        let mut envelope = encrypt(&key, b"Secret message").unwrap();
        envelope[NONCE_LEN] ^= 0xFF; // Tamper

        assert!(matches!(
            decrypt(&key, &envelope),
            Err(CryptoError::DecryptionFailed(_))
        ));
    }

    #[test]
    fn test_short_envelope_rejected() {
        let key = SecretKey::generate();
        let result = decrypt(&key, &[0u8; MIN_ENVELOPE_LEN - 1]);
        assert!(matches!(result, Err(CryptoError::EnvelopeTooShort { .. })));
    }

    #[test]
    fn test_same_plaintext_different_envelopes() {
        let key = SecretKey::generate();
        let a = seal_str(&key, "Jane Doe").unwrap();
        let b = seal_str(&key, "Jane Doe").unwrap();
        assert_ne!(a, b);
        assert_eq!(open_str(&key, &a).unwrap(), "Jane Doe");
        assert_eq!(open_str(&key, &b).unwrap(), "Jane Doe");
    }

    #[test]
    fn test_key_base64_roundtrip() {
        let key = SecretKey::generate();
        let parsed = SecretKey::from_base64(&key.to_base64()).unwrap();
        assert_eq!(parsed.as_bytes(), key.as_bytes());
    }

    #[test]
    fn test_generated_key_material_parses() {
        assert!(SecretKey::from_base64(&generate_key_base64()).is_ok());
    }

    #[test]
    fn test_key_wrong_length_rejected() {
        let short = BASE64.encode([7u8; 16]);
        assert!(matches!(
            SecretKey::from_base64(&short),
            Err(CryptoError::InvalidKeyLength {
                expected: 32,
                actual: 16
            })
        ));
    }

    #[test]
    fn test_key_debug_is_redacted() {
        let key = SecretKey::from_bytes([0xAB; KEY_LEN]);
        assert_eq!(format!("{:?}", key), "SecretKey(***)");
    }
}
