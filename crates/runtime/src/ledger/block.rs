use alloy_primitives::{U256, keccak256};
use serde::{Deserialize, Serialize};

use battle_core::{ChainOracle, Timestamp};

/// Context of the block the next transaction executes in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockContext {
    pub number: u64,
    pub timestamp: Timestamp,
    pub prevrandao: U256,
}

impl BlockContext {
    pub fn genesis(timestamp: Timestamp, seed: U256) -> Self {
        Self {
            number: 0,
            timestamp,
            prevrandao: seed,
        }
    }

    /// Seals this block. Time stays put; entropy is re-derived from the
    /// previous value.
    pub fn next(&self) -> Self {
        Self {
            number: self.number + 1,
            timestamp: self.timestamp,
            prevrandao: U256::from_be_bytes(keccak256(self.prevrandao.to_be_bytes::<32>()).0),
        }
    }
}

impl ChainOracle for BlockContext {
    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn prevrandao(&self) -> U256 {
        self.prevrandao
    }
}
