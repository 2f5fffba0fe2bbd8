//! Wallet snapshots on disk
//!
//! The wallet and its payout record are written together as one versioned
//! JSON document. A save goes through a temporary file and a rename, and
//! the document it replaces is kept as backup generation 1 (older
//! generations shift up). Every document read back, current or backup, is
//! checked against the wallet invariants before it is returned.

use crate::multisig::{MultisigWallet, PayoutLog};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Layout version written into every snapshot
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("No snapshot at {0:?}")]
    NotFound(PathBuf),
    #[error("Snapshot format {found} is not supported (expected {expected})")]
    UnsupportedFormat { found: u32, expected: u32 },
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Everything persisted between runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSnapshot {
    pub format_version: u32,
    pub wallet: MultisigWallet,
    /// Funds released by executed proposals
    pub payouts: PayoutLog,
}

impl WalletSnapshot {
    /// Snapshot of a fresh wallet with no payouts
    pub fn new(wallet: MultisigWallet) -> Self {
        Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            wallet,
            payouts: PayoutLog::new(),
        }
    }

    /// Reject snapshots this build cannot trust: an unknown layout, or a
    /// wallet whose owner set, proposals or history break an invariant
    pub fn verify(&self) -> Result<(), StorageError> {
        if self.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(StorageError::UnsupportedFormat {
                found: self.format_version,
                expected: SNAPSHOT_FORMAT_VERSION,
            });
        }

        self.wallet
            .validate()
            .map_err(|e| StorageError::InvalidData(e.to_string()))
    }
}

/// Where snapshots live and how many old ones to keep
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub file_name: String,
    /// Backup generations kept; 0 disables backups
    pub keep_backups: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".multisig_data"),
            file_name: "wallet.json".to_string(),
            keep_backups: 5,
        }
    }
}

/// Snapshot store for a single wallet
pub struct Storage {
    config: StorageConfig,
}

impl Storage {
    /// Open the store, creating its directory if needed
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        fs::create_dir_all(&config.data_dir)?;
        Ok(Self { config })
    }

    fn snapshot_path(&self) -> PathBuf {
        self.config.data_dir.join(&self.config.file_name)
    }

    /// Backup generation `n`, where 1 is the snapshot replaced by the last save
    fn backup_path(&self, generation: usize) -> PathBuf {
        self.config
            .data_dir
            .join(format!("{}.{}", self.config.file_name, generation))
    }

    /// Whether a current snapshot exists
    pub fn exists(&self) -> bool {
        self.snapshot_path().exists()
    }

    /// Write `snapshot` as the current state
    ///
    /// Snapshots that fail [`WalletSnapshot::verify`] are refused so a bad
    /// state never replaces a good one.
    pub fn save(&self, snapshot: &WalletSnapshot) -> Result<(), StorageError> {
        snapshot.verify()?;

        let path = self.snapshot_path();
        let bytes = serde_json::to_vec_pretty(snapshot)?;

        if self.config.keep_backups > 0 && path.exists() {
            self.shift_backups()?;
            fs::copy(&path, self.backup_path(1))?;
        }

        let staging = path.with_extension("tmp");
        fs::write(&staging, bytes)?;
        fs::rename(&staging, &path)?;

        log::debug!(
            "Saved wallet snapshot v{} ({} proposals) to {:?}",
            snapshot.format_version,
            snapshot.wallet.proposal_count(),
            path
        );
        Ok(())
    }

    /// Read and verify the current snapshot
    pub fn load(&self) -> Result<WalletSnapshot, StorageError> {
        read_verified(&self.snapshot_path())
    }

    /// Read and verify backup `generation`
    pub fn restore_backup(&self, generation: usize) -> Result<WalletSnapshot, StorageError> {
        read_verified(&self.backup_path(generation))
    }

    /// Backup generations present on disk, newest first
    pub fn list_backups(&self) -> Vec<usize> {
        (1..=self.config.keep_backups)
            .filter(|g| self.backup_path(*g).exists())
            .collect()
    }

    /// Move every generation up by one, dropping the oldest
    fn shift_backups(&self) -> Result<(), StorageError> {
        for generation in (1..=self.config.keep_backups).rev() {
            let from = self.backup_path(generation);
            if !from.exists() {
                continue;
            }
            if generation == self.config.keep_backups {
                fs::remove_file(&from)?;
            } else {
                fs::rename(&from, self.backup_path(generation + 1))?;
            }
        }
        Ok(())
    }
}

fn read_verified(path: &Path) -> Result<WalletSnapshot, StorageError> {
    if !path.exists() {
        return Err(StorageError::NotFound(path.to_path_buf()));
    }

    let snapshot: WalletSnapshot = serde_json::from_slice(&fs::read(path)?)?;
    snapshot.verify().inspect_err(|e| {
        log::warn!("Rejected snapshot {:?}: {}", path, e);
    })?;
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Address;
    use serde_json::Value;

    fn addr(label: &str) -> Address {
        Address::from_label(label)
    }

    fn create_test_snapshot() -> WalletSnapshot {
        let wallet =
            MultisigWallet::with_defaults(addr("alice"), &[addr("bob"), addr("carol")]).unwrap();
        WalletSnapshot::new(wallet)
    }

    /// Snapshot with one proposal approved by bob
    fn create_voted_snapshot() -> WalletSnapshot {
        let mut snapshot = create_test_snapshot();
        snapshot.wallet.deposit(addr("alice"), 1_000).unwrap();
        let id = snapshot
            .wallet
            .propose(addr("alice"), addr("dave"), 300)
            .unwrap();
        snapshot.wallet.approve(addr("bob"), id).unwrap();
        snapshot
    }

    fn storage_in(dir: &Path, keep_backups: usize) -> Storage {
        Storage::new(StorageConfig {
            data_dir: dir.to_path_buf(),
            keep_backups,
            ..Default::default()
        })
        .unwrap()
    }

    /// Rewrite a stored document in place
    fn edit_json(path: &Path, edit: impl FnOnce(&mut Value)) {
        let mut doc: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        edit(&mut doc);
        fs::write(path, serde_json::to_vec(&doc).unwrap()).unwrap();
    }

    #[test]
    fn test_save_load_snapshot() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = storage_in(temp_dir.path(), 5);
        let snapshot = create_voted_snapshot();

        storage.save(&snapshot).unwrap();
        assert!(storage.exists());

        let loaded = storage.load().unwrap();
        assert_eq!(loaded, snapshot);
        assert_eq!(loaded.format_version, SNAPSHOT_FORMAT_VERSION);
        assert_eq!(loaded.wallet.proposal(0).unwrap().approval_count(), 1);
    }

    #[test]
    fn test_load_missing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = storage_in(temp_dir.path(), 5);

        assert!(!storage.exists());
        assert!(matches!(storage.load(), Err(StorageError::NotFound(_))));
        assert!(matches!(
            storage.restore_backup(1),
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn test_tampered_tally_is_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = storage_in(temp_dir.path(), 5);
        storage.save(&create_voted_snapshot()).unwrap();

        // Bob is still listed as an approver but the tally says nobody is
        edit_json(&storage.snapshot_path(), |doc| {
            doc["wallet"]["ledger"]["proposals"][0]["approval_count"] = Value::from(0);
        });

        assert!(matches!(storage.load(), Err(StorageError::InvalidData(_))));
    }

    #[test]
    fn test_tampered_membership_is_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = storage_in(temp_dir.path(), 5);
        storage.save(&create_voted_snapshot()).unwrap();
        let path = storage.snapshot_path();

        // Administrator dropped from the owner list
        edit_json(&path, |doc| {
            let owners = doc["wallet"]["registry"]["owners"].as_array_mut().unwrap();
            owners.remove(0);
        });
        assert!(matches!(storage.load(), Err(StorageError::InvalidData(_))));

        // Owner listed twice
        storage.save(&create_voted_snapshot()).unwrap();
        edit_json(&path, |doc| {
            let owners = doc["wallet"]["registry"]["owners"].as_array_mut().unwrap();
            let bob = owners[1].clone();
            owners.push(bob);
        });
        assert!(matches!(storage.load(), Err(StorageError::InvalidData(_))));
    }

    #[test]
    fn test_renumbered_proposal_is_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = storage_in(temp_dir.path(), 5);
        storage.save(&create_voted_snapshot()).unwrap();

        edit_json(&storage.snapshot_path(), |doc| {
            doc["wallet"]["ledger"]["proposals"][0]["id"] = Value::from(7);
        });

        assert!(matches!(storage.load(), Err(StorageError::InvalidData(_))));
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = storage_in(temp_dir.path(), 5);
        storage.save(&create_test_snapshot()).unwrap();

        edit_json(&storage.snapshot_path(), |doc| {
            doc["format_version"] = Value::from(SNAPSHOT_FORMAT_VERSION + 1);
        });

        assert!(matches!(
            storage.load(),
            Err(StorageError::UnsupportedFormat { found: 2, expected: 1 })
        ));
    }

    #[test]
    fn test_invalid_snapshot_is_not_saved() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = storage_in(temp_dir.path(), 5);

        let mut snapshot = create_test_snapshot();
        snapshot.format_version = 0;

        assert!(storage.save(&snapshot).is_err());
        assert!(!storage.exists());
    }

    #[test]
    fn test_backup_rotation() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = storage_in(temp_dir.path(), 3);
        let mut snapshot = create_test_snapshot();

        for amount in 1..=5 {
            snapshot.wallet.deposit(addr("funder"), amount).unwrap();
            storage.save(&snapshot).unwrap();
        }

        assert_eq!(storage.list_backups(), vec![1, 2, 3]);

        // Generation 1 is the state before the last save
        let previous = storage.restore_backup(1).unwrap();
        assert_eq!(previous.wallet.balance(), 1 + 2 + 3 + 4);
        let oldest = storage.restore_backup(3).unwrap();
        assert_eq!(oldest.wallet.balance(), 1 + 2);
    }

    #[test]
    fn test_tampered_backup_is_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = storage_in(temp_dir.path(), 2);
        let snapshot = create_voted_snapshot();
        storage.save(&snapshot).unwrap();
        storage.save(&snapshot).unwrap();

        edit_json(&storage.backup_path(1), |doc| {
            doc["wallet"]["ledger"]["proposals"][0]["approval_count"] = Value::from(0);
        });

        assert!(matches!(
            storage.restore_backup(1),
            Err(StorageError::InvalidData(_))
        ));
    }

    #[test]
    fn test_backups_disabled() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = storage_in(temp_dir.path(), 0);
        let snapshot = create_test_snapshot();

        storage.save(&snapshot).unwrap();
        storage.save(&snapshot).unwrap();

        assert!(storage.list_backups().is_empty());
    }
}
