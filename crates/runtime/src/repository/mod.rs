//! Repository layer for ledger snapshots.
//!
//! Repositories persist data that changes as blocks are produced. Contract
//! logic never reads from them; the ledger saves after each committed
//! transaction and restores from them on startup.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileStateRepository;
pub use memory::InMemoryStateRepo;
pub use traits::StateRepository;
