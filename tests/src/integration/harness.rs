//! # Test Harness
//!
//! A production-mode container over a snapshot file in a temp directory.
//! `restart` drops the container and builds a new one over the same file,
//! which is what a process restart looks like to the ledger.

use shared_crypto::RuntimeMode;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use waitlist_runtime::{SignupCoordinator, StartupError, WaitlistConfig, WaitlistContainer};
use wl_01_waitlist_ledger::{SnapshotFileStore, SystemTimeSource};

pub type FileSignupCoordinator = SignupCoordinator<SnapshotFileStore, SystemTimeSource>;

pub struct WaitlistHarness {
    dir: TempDir,
    key: String,
    pub container: WaitlistContainer,
}

impl Default for WaitlistHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl WaitlistHarness {
    /// Fresh container with a newly generated key.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let key = shared_crypto::generate_key_base64();
        let container =
            WaitlistContainer::build(Self::config_for(&dir, &key)).expect("container builds");
        Self {
            dir,
            key,
            container,
        }
    }

    fn config_for(dir: &TempDir, key: &str) -> WaitlistConfig {
        WaitlistConfig {
            data_path: dir.path().join("waitlist-data.json"),
            encryption_key: Some(key.to_string()),
            mode: RuntimeMode::Production,
            ..Default::default()
        }
    }

    /// Rebuild the container over the same snapshot file and key.
    pub fn restart(&mut self) {
        self.container = WaitlistContainer::build(Self::config_for(&self.dir, &self.key))
            .expect("container rebuilds");
    }

    /// Build a second container over the same file with other key material.
    pub fn open_with_key(&self, key: Option<&str>, mode: RuntimeMode) -> Result<WaitlistContainer, StartupError> {
        WaitlistContainer::build(WaitlistConfig {
            encryption_key: key.map(str::to_string),
            mode,
            ..Self::config_for(&self.dir, &self.key)
        })
    }

    pub fn coordinator(&self) -> Arc<FileSignupCoordinator> {
        Arc::new(self.container.signup_coordinator())
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.container.config().data_path.clone()
    }

    /// Raw snapshot file contents.
    pub fn raw_snapshot(&self) -> String {
        std::fs::read_to_string(self.snapshot_path()).unwrap_or_default()
    }
}
