//! In-memory StateRepository implementation for tests and local runs.

use std::collections::BTreeMap;
use std::sync::RwLock;

use super::{RepositoryError, Result, StateRepository};
use crate::ledger::LedgerSnapshot;

/// In-memory implementation of StateRepository.
#[derive(Default)]
pub struct InMemoryStateRepo {
    snapshots: RwLock<BTreeMap<u64, LedgerSnapshot>>,
}

impl InMemoryStateRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateRepository for InMemoryStateRepo {
    fn save(&self, block_number: u64, snapshot: &LedgerSnapshot) -> Result<()> {
        let mut snapshots = self
            .snapshots
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        snapshots.insert(block_number, snapshot.clone());
        Ok(())
    }

    fn load(&self, block_number: u64) -> Result<Option<LedgerSnapshot>> {
        let snapshots = self
            .snapshots
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(snapshots.get(&block_number).cloned())
    }

    fn exists(&self, block_number: u64) -> bool {
        self.snapshots
            .read()
            .map(|snapshots| snapshots.contains_key(&block_number))
            .unwrap_or(false)
    }

    fn delete(&self, block_number: u64) -> Result<()> {
        let mut snapshots = self
            .snapshots
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        snapshots.remove(&block_number);
        Ok(())
    }

    fn list_blocks(&self) -> Result<Vec<u64>> {
        let snapshots = self
            .snapshots
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(snapshots.keys().copied().collect())
    }
}
