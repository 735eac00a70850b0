use crate::domain::errors::RepositoryError;
use crate::domain::snapshot::LedgerSnapshot;
use crate::ports::outbound::EntryRepository;
use shared_crypto::EncryptionCodec;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Snapshot file name used when no path is configured.
pub const DEFAULT_SNAPSHOT_FILE: &str = "waitlist-data.json";

/// JSON snapshot file with encrypted PII.
///
/// `email` and `name` pass through the codec on every write and read. Writes
/// replace the file atomically via a synced temp file and a rename.
pub struct SnapshotFileStore {
    path: PathBuf,
    codec: EncryptionCodec,
}

impl SnapshotFileStore {
    /// Create a store for the snapshot at `path`.
    pub fn new<P: AsRef<Path>>(path: P, codec: EncryptionCodec) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            codec,
        }
    }

    /// Snapshot location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn seal(&self, snapshot: &LedgerSnapshot) -> Result<LedgerSnapshot, RepositoryError> {
        let mut sealed = snapshot.clone();
        for entry in &mut sealed.entries {
            entry.email = self
                .codec
                .encrypt(&entry.email)
                .ok_or(RepositoryError::Encryption { field: "email" })?;
            if let Some(name) = entry.name.as_deref().filter(|n| !n.is_empty()) {
                entry.name = Some(
                    self.codec
                        .encrypt(name)
                        .ok_or(RepositoryError::Encryption { field: "name" })?,
                );
            }
        }
        Ok(sealed)
    }

    fn unseal(&self, snapshot: &mut LedgerSnapshot) {
        for entry in &mut snapshot.entries {
            // an undecodable value is kept as stored rather than dropped
            match self.codec.decrypt(&entry.email) {
                Some(email) => entry.email = email,
                None => tracing::warn!(
                    entry_id = %entry.id,
                    "[wl-01] Snapshot email could not be decrypted; keeping stored value"
                ),
            }
            if let Some(name) = entry.name.as_deref().filter(|n| !n.is_empty()) {
                match self.codec.decrypt(name) {
                    Some(plain) => entry.name = Some(plain),
                    None => tracing::warn!(
                        entry_id = %entry.id,
                        "[wl-01] Snapshot name could not be decrypted; keeping stored value"
                    ),
                }
            }
        }
    }
}

impl EntryRepository for SnapshotFileStore {
    fn load_all(&self) -> Result<Option<LedgerSnapshot>, RepositoryError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("[wl-01] No snapshot at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(RepositoryError::io(e)),
        };

        let mut snapshot: LedgerSnapshot =
            serde_json::from_slice(&bytes).map_err(|e| RepositoryError::Corrupted {
                message: e.to_string(),
            })?;
        self.unseal(&mut snapshot);

        tracing::info!(
            "[wl-01] Loaded {} entries from {} ({} bytes)",
            snapshot.entries.len(),
            self.path.display(),
            bytes.len()
        );
        Ok(Some(snapshot))
    }

    fn save(&mut self, snapshot: &LedgerSnapshot) -> Result<(), RepositoryError> {
        let sealed = self.seal(snapshot)?;
        let bytes =
            serde_json::to_vec_pretty(&sealed).map_err(|e| RepositoryError::Serialization {
                message: e.to_string(),
            })?;

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(RepositoryError::io)?;
        }

        // Write atomically via temp file
        let temp_path = self.path.with_extension("tmp");
        let mut file = std::fs::File::create(&temp_path).map_err(RepositoryError::io)?;
        file.write_all(&bytes).map_err(RepositoryError::io)?;
        file.sync_all().map_err(RepositoryError::io)?;
        std::fs::rename(&temp_path, &self.path).map_err(RepositoryError::io)?;

        tracing::debug!(
            "[wl-01] Snapshot written: {} entries, {} bytes",
            snapshot.entries.len(),
            bytes.len()
        );
        Ok(())
    }
}
