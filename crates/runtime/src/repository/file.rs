//! File-based StateRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{RepositoryError, Result, StateRepository};
use crate::ledger::LedgerSnapshot;

/// On-disk envelope: the snapshot plus the battle state root it committed to.
#[derive(Serialize, Deserialize)]
struct StoredSnapshot {
    state_root: [u8; 32],
    snapshot: LedgerSnapshot,
}

/// File-based implementation of StateRepository.
///
/// Snapshots are stored as `block_{number}.bin` in bincode format. Writes go
/// to a temp file first and are renamed into place. Loads recompute the
/// battle state root and reject files whose root does not match.
pub struct FileStateRepository {
    base_dir: PathBuf,
}

impl FileStateRepository {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn snapshot_path(&self, block_number: u64) -> PathBuf {
        self.base_dir.join(format!("block_{}.bin", block_number))
    }
}

impl StateRepository for FileStateRepository {
    fn save(&self, block_number: u64, snapshot: &LedgerSnapshot) -> Result<()> {
        let path = self.snapshot_path(block_number);
        let temp_path = path.with_extension("bin.tmp");

        let stored = StoredSnapshot {
            state_root: snapshot.state.state_root(),
            snapshot: snapshot.clone(),
        };
        let bytes = bincode::serialize(&stored)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!("Saved snapshot[{}] to {}", block_number, path.display());
        Ok(())
    }

    fn load(&self, block_number: u64) -> Result<Option<LedgerSnapshot>> {
        let path = self.snapshot_path(block_number);
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let stored: StoredSnapshot = bincode::deserialize(&bytes)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        let actual = stored.snapshot.state.state_root();
        if actual != stored.state_root {
            return Err(RepositoryError::CorruptedData(format!(
                "block {} state root {} does not match recorded {}",
                block_number,
                hex::encode(actual),
                hex::encode(stored.state_root)
            )));
        }

        tracing::debug!("Loaded snapshot[{}] from {}", block_number, path.display());
        Ok(Some(stored.snapshot))
    }

    fn exists(&self, block_number: u64) -> bool {
        self.snapshot_path(block_number).exists()
    }

    fn delete(&self, block_number: u64) -> Result<()> {
        let path = self.snapshot_path(block_number);
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!("Deleted snapshot[{}]", block_number);
        }
        Ok(())
    }

    fn list_blocks(&self) -> Result<Vec<u64>> {
        let mut blocks = Vec::new();

        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();

            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(number) = filename
                    .strip_prefix("block_")
                    .and_then(|s| s.strip_suffix(".bin"))
                && let Ok(number) = number.parse::<u64>()
            {
                blocks.push(number);
            }
        }

        blocks.sort_unstable();
        Ok(blocks)
    }
}
