use alloy_primitives::{Address, U256};

use crate::state::Timestamp;

/// Ambient block context.
///
/// Injected instead of read from globals so the fallback randomness path is
/// reproducible in tests.
pub trait ChainOracle: Send + Sync {
    /// Timestamp of the block executing the transaction.
    fn timestamp(&self) -> Timestamp;

    /// Chain-supplied entropy of the current block.
    fn prevrandao(&self) -> U256;
}

/// Read-only view of the energy token used to pay for revivals.
pub trait EnergyOracle: Send + Sync {
    fn balance_of(&self, owner: Address) -> u128;
}
