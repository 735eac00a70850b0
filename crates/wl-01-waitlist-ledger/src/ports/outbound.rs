//! # Outbound Ports (Driven Ports)
//!
//! Dependencies required by the ledger service.

use crate::domain::errors::RepositoryError;
use crate::domain::snapshot::LedgerSnapshot;
use chrono::{DateTime, Utc};

/// Durable home of the ledger state.
///
/// The ledger is the in-memory authority; the repository only loads the
/// whole state once and receives the whole state after every mutation.
/// There is no per-entry `find`/`delete`: lookups and removals happen on the
/// ledger's map and reach storage through the next `save`. A keyed backend
/// (one row per entry) must diff or rewrite the snapshot inside `save`.
/// Swapping the file for a database means writing another implementation
/// of this trait.
///
/// Production: `SnapshotFileStore`
/// Testing: `InMemoryRepository`
pub trait EntryRepository: Send + Sync {
    /// Load the full state. `Ok(None)` when nothing was ever saved.
    fn load_all(&self) -> Result<Option<LedgerSnapshot>, RepositoryError>;

    /// Replace the stored state with `snapshot`.
    fn save(&mut self, snapshot: &LedgerSnapshot) -> Result<(), RepositoryError>;
}

/// Abstract interface for time operations (for testability).
pub trait TimeSource: Send + Sync {
    /// Current wall-clock time.
    fn now(&self) -> DateTime<Utc>;
}
