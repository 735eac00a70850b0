//! # Waitlist Ledger (wl-01)
//!
//! The authoritative store of waitlist signups. Assigns globally ordered
//! positions, lets entrants jump the queue through referrals and keeps the
//! whole state in an encrypted JSON snapshot that survives restarts.
//!
//! ## Architecture
//!
//! ```text
//! SignupCoordinator ──add_entry / process_referral──→ WaitlistLedger
//!                                                       │ (in-memory authority)
//!                                                       ↓ full snapshot after every mutation
//!                                                  EntryRepository
//!                                                       │
//!                                   SnapshotFileStore ──┴── InMemoryRepository
//!                                   (email/name encrypted)   (tests)
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Unique Email | One entry per normalized email; duplicates are rejected |
//! | 2 | Unique Referral Code | Codes are unique across all entries |
//! | 3 | Position Floor | `position >= 1`, referrals never push below it |
//! | 4 | Monotonic Counter | Positions are never reissued, even after deletion or a failed write |
//! | 5 | Immutable Audit Fields | `id`, `email`, `original_position`, `created_at` never change |
//! | 6 | Durable Mutations | A mutation that could not be persisted is rolled back in memory |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Entities, referral engine, snapshot format, configuration
//! - `ports/` - Inbound API (`WaitlistLedgerApi`), outbound SPI (`EntryRepository`, `TimeSource`)
//! - `adapters/` - Encrypted snapshot file, in-memory repository, clocks
//! - `service/` - `WaitlistLedger`
//!
//! ## Usage
//!
//! ```ignore
//! use wl_01_waitlist_ledger::{LedgerConfig, NewEntry, WaitlistLedger, WaitlistLedgerApi};
//!
//! let mut ledger = WaitlistLedger::new_in_memory(LedgerConfig::default());
//! let code = ledger.generate_unique_referral_code()?;
//! let entry = ledger.add_entry(NewEntry::new("new@x.com", code, "en"))?;
//! assert_eq!(entry.position, 848);
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export key types for convenience
pub use adapters::{
    InMemoryRepository, ManualTimeSource, SnapshotFileStore, SystemTimeSource,
    DEFAULT_SNAPSHOT_FILE,
};
pub use domain::entities::{
    normalize_email, EntryUpdate, NewEntry, WaitlistEntry, SOURCE_DIRECT, SOURCE_REFERRAL,
};
pub use domain::errors::{LedgerError, RepositoryError};
pub use domain::referral::{
    apply_referral, calculate_new_position, generate_referral_code, is_valid_referral_code,
    normalize_referral_code,
};
pub use domain::snapshot::LedgerSnapshot;
pub use domain::value_objects::LedgerConfig;
pub use ports::inbound::{LedgerStats, WaitlistLedgerApi};
pub use ports::outbound::{EntryRepository, TimeSource};
pub use service::{LedgerDependencies, WaitlistLedger};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
