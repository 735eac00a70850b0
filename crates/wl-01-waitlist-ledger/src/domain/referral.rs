//! # Referral Engine
//!
//! Pure functions for referral codes and referral-driven reordering.
//!
//! Codes are `prefix + body`, the body drawn from an alphabet without the
//! look-alikes `0/O` and `1/I`. Generation does not guarantee uniqueness;
//! the ledger retries against its code index.

use rand::Rng;

/// Characters used for generated code bodies.
pub const REFERRAL_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Shortest accepted code body.
pub const MIN_CODE_BODY_LEN: usize = 4;

/// Longest accepted code body.
pub const MAX_CODE_BODY_LEN: usize = 8;

/// Generate `prefix` followed by `length` random characters.
pub fn generate_referral_code(prefix: &str, length: usize) -> String {
    generate_referral_code_with(&mut rand::thread_rng(), prefix, length)
}

/// Same as [`generate_referral_code`] with a caller-supplied RNG.
pub fn generate_referral_code_with<R: Rng + ?Sized>(
    rng: &mut R,
    prefix: &str,
    length: usize,
) -> String {
    let mut code = String::with_capacity(prefix.len() + length);
    code.push_str(&prefix.to_ascii_uppercase());
    for _ in 0..length {
        let idx = rng.gen_range(0..REFERRAL_ALPHABET.len());
        code.push(REFERRAL_ALPHABET[idx] as char);
    }
    code
}

/// Format check only: `prefix` then 4 to 8 ASCII alphanumerics, any case.
pub fn is_valid_referral_code(code: &str, prefix: &str) -> bool {
    let code = code.trim();
    if code.len() < prefix.len() || !code.is_char_boundary(prefix.len()) {
        return false;
    }
    let (head, body) = code.split_at(prefix.len());
    head.eq_ignore_ascii_case(prefix)
        && (MIN_CODE_BODY_LEN..=MAX_CODE_BODY_LEN).contains(&body.len())
        && body.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Canonical (trimmed, uppercase) form used for storage and lookup.
pub fn normalize_referral_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// `max(1, current - referral_count * spots_per_referral)`.
pub fn calculate_new_position(current_position: u64, referral_count: u64, spots_per_referral: u64) -> u64 {
    current_position
        .saturating_sub(referral_count.saturating_mul(spots_per_referral))
        .max(1)
}

/// One referral event: the repeated-application form of
/// [`calculate_new_position`].
pub fn apply_referral(current_position: u64, spots_per_referral: u64) -> u64 {
    calculate_new_position(current_position, 1, spots_per_referral)
}
