//! # Inbound Ports (Driving Ports)
//!
//! The primary API for the Waitlist Ledger subsystem.
//!
//! All operations complete synchronously. Every successful mutation has
//! already been persisted when it returns.

use crate::domain::entities::{EntryUpdate, NewEntry, WaitlistEntry};
use crate::domain::errors::LedgerError;
use serde::Serialize;

/// Introspection counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerStats {
    /// Entries on the list.
    pub total_entries: usize,
    /// Entries that signed up with a referral code.
    pub referred_entries: usize,
    /// Sum of all referral counts.
    pub total_referrals: u64,
    /// Last position handed out.
    pub position_counter: u64,
    /// Last entry id sequence number handed out.
    pub entry_id_counter: u64,
}

/// Primary API for the Waitlist Ledger.
///
/// Email and referral code arguments are matched case-insensitively.
pub trait WaitlistLedgerApi {
    /// Insert a new entry at the back of the queue.
    ///
    /// ## Errors
    ///
    /// - `DuplicateEmail`: the normalized email is already present; the
    ///   ledger is left untouched
    /// - `DuplicateReferralCode`: the supplied code is already in use
    /// - `Storage`: the snapshot could not be written
    fn add_entry(&mut self, entry: NewEntry) -> Result<WaitlistEntry, LedgerError>;

    /// Look up by email.
    fn get_by_email(&self, email: &str) -> Option<WaitlistEntry>;

    /// Look up by entry id.
    fn get_by_id(&self, id: &str) -> Option<WaitlistEntry>;

    /// Look up by the entry's own referral code.
    fn get_by_referral_code(&self, code: &str) -> Option<WaitlistEntry>;

    /// Is the email on the list?
    fn exists(&self, email: &str) -> bool;

    /// Merge `update` into the entry. `Ok(None)` if the email is unknown.
    fn update_entry(
        &mut self,
        email: &str,
        update: EntryUpdate,
    ) -> Result<Option<WaitlistEntry>, LedgerError>;

    /// Credit one referral: `referral_count + 1` and
    /// `position = max(1, position - spots_per_referral)`.
    /// `Ok(None)` if the referrer is unknown.
    fn process_referral(
        &mut self,
        referrer_email: &str,
        spots_per_referral: u64,
    ) -> Result<Option<WaitlistEntry>, LedgerError>;

    /// Union `tags` into the entry's tags. `Ok(None)` if the email is unknown.
    fn add_tags(&mut self, email: &str, tags: &[String]) -> Result<Option<WaitlistEntry>, LedgerError>;

    /// Physically remove the entry. `Ok(false)` if nothing was removed.
    fn delete_by_email(&mut self, email: &str) -> Result<bool, LedgerError>;

    /// Number of entries.
    fn total_count(&self) -> usize;

    /// All entries, ordered by position.
    fn all_entries(&self) -> Vec<WaitlistEntry>;

    /// Counters for operators.
    fn stats(&self) -> LedgerStats;
}
