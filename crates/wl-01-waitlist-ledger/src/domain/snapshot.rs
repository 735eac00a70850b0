//! # Ledger Snapshot
//!
//! The full persisted state: every entry plus both counters.
//!
//! ```json
//! {
//!   "entries": [ { "id": "...", "email": "<enc>", "position": 848, ... } ],
//!   "positionCounter": 848,
//!   "entryIdCounter": 1
//! }
//! ```
//!
//! Repositories receive and return snapshots with PII in plaintext;
//! protecting it on the way to disk is the adapter's job.

use super::entities::WaitlistEntry;
use serde::{Deserialize, Serialize};

/// Full ledger state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSnapshot {
    /// All entries, in no particular order.
    #[serde(default)]
    pub entries: Vec<WaitlistEntry>,
    /// Last position handed out. Older files may omit it.
    #[serde(default)]
    pub position_counter: u64,
    /// Last entry id sequence number handed out.
    #[serde(default)]
    pub entry_id_counter: u64,
}

impl LedgerSnapshot {
    /// State of an empty ledger.
    pub fn empty(position_baseline: u64) -> Self {
        Self {
            entries: Vec::new(),
            position_counter: position_baseline,
            entry_id_counter: 0,
        }
    }
}
