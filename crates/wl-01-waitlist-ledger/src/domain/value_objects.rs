//! # Value Objects
//!
//! Configuration for the ledger.

/// Position counter value of an empty ledger. The first signup lands on
/// `baseline + 1`.
pub const DEFAULT_POSITION_BASELINE: u64 = 847;

/// Default referral code prefix.
pub const DEFAULT_REFERRAL_PREFIX: &str = "REF";

/// Default number of random characters after the prefix.
pub const DEFAULT_REFERRAL_CODE_LENGTH: usize = 6;

/// Default spots gained per successful referral.
pub const DEFAULT_SPOTS_PER_REFERRAL: u64 = 10;

/// Default cap on referral code generation attempts.
pub const DEFAULT_MAX_CODE_ATTEMPTS: u32 = 10;

/// Ledger configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Position counter baseline (empty ledger, and after `clear`).
    pub position_baseline: u64,
    /// Prefix of generated referral codes.
    pub referral_prefix: String,
    /// Random characters after the prefix.
    pub referral_code_length: usize,
    /// Spots a referrer gains per successful referral.
    pub spots_per_referral: u64,
    /// Attempts before `generate_unique_referral_code` gives up.
    pub max_code_attempts: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            position_baseline: DEFAULT_POSITION_BASELINE,
            referral_prefix: DEFAULT_REFERRAL_PREFIX.to_string(),
            referral_code_length: DEFAULT_REFERRAL_CODE_LENGTH,
            spots_per_referral: DEFAULT_SPOTS_PER_REFERRAL,
            max_code_attempts: DEFAULT_MAX_CODE_ATTEMPTS,
        }
    }
}

impl LedgerConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the position baseline.
    pub fn with_position_baseline(mut self, baseline: u64) -> Self {
        self.position_baseline = baseline;
        self
    }

    /// Set the referral code prefix.
    pub fn with_referral_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.referral_prefix = prefix.into();
        self
    }

    /// Set the spots gained per referral.
    pub fn with_spots_per_referral(mut self, spots: u64) -> Self {
        self.spots_per_referral = spots;
        self
    }

    /// Set the referral code generation cap.
    pub fn with_max_code_attempts(mut self, attempts: u32) -> Self {
        self.max_code_attempts = attempts.max(1);
        self
    }
}
