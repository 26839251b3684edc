//! Public API surface: errors and the async ledger handle.

mod errors;
mod handle;

pub use errors::{RepositoryError, Result, RuntimeError};
pub use handle::LedgerHandle;
