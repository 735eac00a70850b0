//! # Adapters Module
//!
//! Contains adapter implementations for the Waitlist Ledger subsystem.
//!
//! ## Modules
//!
//! - `storage`: Snapshot repositories (encrypted JSON file, in-memory)
//! - `infra`: Time sources

pub mod infra;
pub mod storage;

pub use infra::{ManualTimeSource, SystemTimeSource};
pub use storage::{InMemoryRepository, SnapshotFileStore, DEFAULT_SNAPSHOT_FILE};
