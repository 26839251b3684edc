//! Repository contract for saving and loading ledger snapshots.

use super::Result;
use crate::ledger::LedgerSnapshot;

/// Repository for ledger snapshots indexed by block number.
///
/// Snapshots capture the battle state together with the collaborator
/// contracts, so a ledger restored from one resumes exactly where it stopped.
pub trait StateRepository: Send + Sync {
    /// Save a snapshot indexed by block number
    fn save(&self, block_number: u64, snapshot: &LedgerSnapshot) -> Result<()>;

    /// Load a snapshot by block number
    fn load(&self, block_number: u64) -> Result<Option<LedgerSnapshot>>;

    /// Check if a snapshot exists
    fn exists(&self, block_number: u64) -> bool;

    /// Delete a snapshot
    fn delete(&self, block_number: u64) -> Result<()>;

    /// List all stored block numbers in ascending order
    fn list_blocks(&self) -> Result<Vec<u64>>;

    /// Load the snapshot with the highest block number
    fn latest(&self) -> Result<Option<LedgerSnapshot>> {
        match self.list_blocks()?.last() {
            Some(&block_number) => self.load(block_number),
            None => Ok(None),
        }
    }

    /// Delete all snapshots in a range [start, end]
    fn delete_range(&self, start: u64, end: u64) -> Result<usize> {
        let mut deleted = 0;
        for block_number in start..=end {
            if self.exists(block_number) {
                self.delete(block_number)?;
                deleted += 1;
            }
        }
        Ok(deleted)
    }
}
