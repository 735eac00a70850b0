//! Storage Adapters
//!
//! Implementations of the `EntryRepository` trait.

mod file;
mod memory;

pub use file::{SnapshotFileStore, DEFAULT_SNAPSHOT_FILE};
pub use memory::InMemoryRepository;
