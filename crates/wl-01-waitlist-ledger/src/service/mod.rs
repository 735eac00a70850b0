//! # Waitlist Ledger Service
//!
//! The in-memory authority over all entries.
//!
//! ## Architecture
//!
//! This service:
//! 1. Owns the entry map (keyed by normalized email), the referral-code and
//!    id indexes, and the position and entry-id counters
//! 2. Implements `WaitlistLedgerApi`
//! 3. Writes the full snapshot through `EntryRepository` after every mutation
//!
//! ## Concurrency
//!
//! Mutations take `&mut self` and run to completion. One ledger owns one
//! repository; running several processes against the same snapshot file
//! breaks the uniqueness and ordering guarantees.

mod ledger;

use crate::adapters::{InMemoryRepository, SystemTimeSource};
use crate::domain::entities::{normalize_email, WaitlistEntry};
use crate::domain::errors::LedgerError;
use crate::domain::referral::{generate_referral_code, normalize_referral_code};
use crate::domain::snapshot::LedgerSnapshot;
use crate::domain::value_objects::LedgerConfig;
use crate::ports::outbound::{EntryRepository, TimeSource};
use std::collections::HashMap;

/// Dependencies for WaitlistLedger
pub struct LedgerDependencies<R, T> {
    pub repository: R,
    pub time_source: T,
}

/// The Waitlist Ledger.
pub struct WaitlistLedger<R, T>
where
    R: EntryRepository,
    T: TimeSource,
{
    pub(crate) repository: R,
    pub(crate) time_source: T,
    pub(crate) config: LedgerConfig,
    /// normalized email -> entry
    pub(crate) entries: HashMap<String, WaitlistEntry>,
    /// uppercase referral code -> normalized email
    pub(crate) by_referral_code: HashMap<String, String>,
    /// entry id -> normalized email
    pub(crate) by_id: HashMap<String, String>,
    pub(crate) position_counter: u64,
    pub(crate) entry_id_counter: u64,
}

/// State of one entry before a mutation.
pub(crate) struct Checkpoint {
    key: String,
    entry: Option<WaitlistEntry>,
}

impl<R, T> WaitlistLedger<R, T>
where
    R: EntryRepository,
    T: TimeSource,
{
    /// Open the ledger, loading any existing snapshot before returning.
    ///
    /// # Errors
    ///
    /// `Storage` if the snapshot exists but cannot be read.
    pub fn open(deps: LedgerDependencies<R, T>, config: LedgerConfig) -> Result<Self, LedgerError> {
        let mut ledger = Self {
            repository: deps.repository,
            time_source: deps.time_source,
            position_counter: config.position_baseline,
            config,
            entries: HashMap::new(),
            by_referral_code: HashMap::new(),
            by_id: HashMap::new(),
            entry_id_counter: 0,
        };
        ledger.reload_from_storage()?;
        Ok(ledger)
    }

    /// Discard in-memory state and load it again from the repository.
    ///
    /// # Errors
    ///
    /// `Storage` if the snapshot cannot be read; in-memory state is then
    /// left as it was.
    pub fn reload_from_storage(&mut self) -> Result<(), LedgerError> {
        let snapshot = self
            .repository
            .load_all()
            .inspect_err(|e| tracing::error!("[wl-01] Failed to load snapshot: {}", e))?
            .unwrap_or_else(|| LedgerSnapshot::empty(self.config.position_baseline));
        self.install(snapshot);
        Ok(())
    }

    /// Remove every entry, reset counters to their baseline and persist.
    ///
    /// # Errors
    ///
    /// `Storage` if the write fails; the previous state is then restored.
    pub fn clear(&mut self) -> Result<(), LedgerError> {
        let previous = self.snapshot();
        let removed = previous.entries.len();
        self.install(LedgerSnapshot::empty(self.config.position_baseline));
        if let Err(e) = self.persist() {
            self.install(previous);
            return Err(e);
        }
        tracing::warn!("[wl-01] Ledger cleared ({} entries removed)", removed);
        Ok(())
    }

    /// Generate a referral code not used by any entry.
    ///
    /// # Errors
    ///
    /// `ReferralCodeExhausted` after `max_code_attempts` collisions.
    pub fn generate_unique_referral_code(&self) -> Result<String, LedgerError> {
        let attempts = self.config.max_code_attempts.max(1);
        for attempt in 1..=attempts {
            let code = generate_referral_code(
                &self.config.referral_prefix,
                self.config.referral_code_length,
            );
            if !self.by_referral_code.contains_key(&code) {
                return Ok(code);
            }
            tracing::debug!(attempt, "[wl-01] Referral code collision, retrying");
        }
        tracing::error!(attempts, "[wl-01] Referral code space exhausted");
        Err(LedgerError::ReferralCodeExhausted { attempts })
    }

    /// Entries ordered by `(position, original_position)`.
    pub fn entries_by_position(&self) -> Vec<WaitlistEntry> {
        let mut all: Vec<WaitlistEntry> = self.entries.values().cloned().collect();
        all.sort_by_key(|e| (e.position, e.original_position));
        all
    }

    /// Ledger configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Underlying repository, mutably (test fault injection).
    pub fn repository_mut(&mut self) -> &mut R {
        &mut self.repository
    }

    /// Current full state.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            entries: self.entries_by_position(),
            position_counter: self.position_counter,
            entry_id_counter: self.entry_id_counter,
        }
    }

    fn install(&mut self, snapshot: LedgerSnapshot) {
        self.entries.clear();
        self.by_referral_code.clear();
        self.by_id.clear();

        let mut max_position = 0;
        for mut entry in snapshot.entries {
            max_position = max_position.max(entry.original_position);
            let key = normalize_email(&entry.email);
            if self.entries.contains_key(&key) {
                tracing::warn!(entry_id = %entry.id, "[wl-01] Duplicate email in snapshot, skipping");
                continue;
            }
            let code = normalize_referral_code(&entry.referral_code);
            if self.by_referral_code.contains_key(&code) {
                tracing::warn!(entry_id = %entry.id, "[wl-01] Duplicate referral code in snapshot, skipping");
                continue;
            }
            // hand-written and legacy files may carry raw casing
            entry.email = key.clone();
            entry.referral_code = code;
            entry.referred_by = entry.referred_by.as_deref().map(normalize_referral_code);
            self.index(key, entry);
        }

        // counters never trail what has already been handed out
        self.position_counter = snapshot
            .position_counter
            .max(max_position)
            .max(self.config.position_baseline);
        self.entry_id_counter = snapshot.entry_id_counter;

        tracing::info!(
            "[wl-01] Ledger ready: {} entries, position counter {}",
            self.entries.len(),
            self.position_counter
        );
    }

    pub(crate) fn index(&mut self, key: String, entry: WaitlistEntry) {
        self.by_referral_code
            .insert(normalize_referral_code(&entry.referral_code), key.clone());
        self.by_id.insert(entry.id.clone(), key.clone());
        self.entries.insert(key, entry);
    }

    pub(crate) fn unindex(&mut self, key: &str) -> Option<WaitlistEntry> {
        let entry = self.entries.remove(key)?;
        self.by_referral_code
            .remove(&normalize_referral_code(&entry.referral_code));
        self.by_id.remove(&entry.id);
        Some(entry)
    }

    pub(crate) fn checkpoint(&self, key: &str) -> Checkpoint {
        Checkpoint {
            key: key.to_string(),
            entry: self.entries.get(key).cloned(),
        }
    }

    /// Persist the current state, undoing the checkpointed mutation on
    /// failure. Counters are not rewound, so positions are never reissued.
    pub(crate) fn commit(&mut self, checkpoint: Checkpoint) -> Result<(), LedgerError> {
        if let Err(e) = self.persist() {
            self.unindex(&checkpoint.key);
            if let Some(previous) = checkpoint.entry {
                self.index(checkpoint.key, previous);
            }
            return Err(e);
        }
        Ok(())
    }

    fn persist(&mut self) -> Result<(), LedgerError> {
        let snapshot = self.snapshot();
        self.repository.save(&snapshot).map_err(|e| {
            tracing::error!("[wl-01] Snapshot write failed: {}", e);
            LedgerError::Storage(e)
        })
    }
}

impl WaitlistLedger<InMemoryRepository, SystemTimeSource> {
    /// Ledger backed by an empty in-memory repository.
    pub fn new_in_memory(config: LedgerConfig) -> Self {
        Self {
            repository: InMemoryRepository::new(),
            time_source: SystemTimeSource,
            position_counter: config.position_baseline,
            config,
            entries: HashMap::new(),
            by_referral_code: HashMap::new(),
            by_id: HashMap::new(),
            entry_id_counter: 0,
        }
    }
}
