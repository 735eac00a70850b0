use crate::domain::errors::RepositoryError;
use crate::domain::snapshot::LedgerSnapshot;
use crate::ports::outbound::EntryRepository;

/// In-memory repository for unit tests.
///
/// Keeps the last saved snapshot and can be told to fail writes, to exercise
/// the ledger's storage-error path.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    stored: Option<LedgerSnapshot>,
    fail_writes: bool,
    save_count: usize,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing snapshot, as if loaded from disk.
    pub fn with_snapshot(snapshot: LedgerSnapshot) -> Self {
        Self {
            stored: Some(snapshot),
            ..Self::default()
        }
    }

    /// Make subsequent writes fail (or succeed again).
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Last successfully saved snapshot.
    pub fn stored(&self) -> Option<&LedgerSnapshot> {
        self.stored.as_ref()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.save_count
    }
}

impl EntryRepository for InMemoryRepository {
    fn load_all(&self) -> Result<Option<LedgerSnapshot>, RepositoryError> {
        Ok(self.stored.clone())
    }

    fn save(&mut self, snapshot: &LedgerSnapshot) -> Result<(), RepositoryError> {
        if self.fail_writes {
            return Err(RepositoryError::Io {
                message: "simulated write failure".to_string(),
            });
        }
        self.stored = Some(snapshot.clone());
        self.save_count += 1;
        Ok(())
    }
}
