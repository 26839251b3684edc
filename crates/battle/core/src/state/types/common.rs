use std::fmt;

use alloy_primitives::U256;

/// Unix timestamp in seconds, as reported by the chain.
pub type Timestamp = u64;

/// Identifier of a Unimon token (the combatant).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenId(pub u64);

impl TokenId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unimon#{}", self.0)
    }
}

/// Identifier of an encounter.
///
/// Allocated from a monotonic counter starting at 1 and never reused. Zero is
/// the "no encounter" value of contract storage and is never allocated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterId(pub u64);

impl EncounterId {
    pub const FIRST: Self = Self(1);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The id as the `uint256` word hashed into the randomness derivations.
    pub fn as_word(self) -> U256 {
        U256::from(self.0)
    }
}

impl fmt::Display for EncounterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "battle#{}", self.0)
    }
}
