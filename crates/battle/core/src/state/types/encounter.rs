use alloy_primitives::U256;

use super::{EncounterId, Timestamp, TokenId};

/// A single battle between two combatants.
///
/// Records are append-only: once created they are never removed, only
/// fulfilled and resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Encounter {
    pub id: EncounterId,
    /// Cycle during which the encounter was created.
    pub cycle_number: u64,
    pub attacker: TokenId,
    pub defender: TokenId,
    pub resolved: bool,
    /// Set only once `resolved` is true.
    pub winner: Option<TokenId>,
    pub created_at: Timestamp,
    pub randomness_requested: bool,
    pub randomness_fulfilled: bool,
    /// Committed random value. Zero until fulfilled.
    pub random_number: U256,
}

impl Encounter {
    /// Creates a freshly requested encounter.
    pub fn new(
        id: EncounterId,
        cycle_number: u64,
        attacker: TokenId,
        defender: TokenId,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            cycle_number,
            attacker,
            defender,
            resolved: false,
            winner: None,
            created_at,
            randomness_requested: true,
            randomness_fulfilled: false,
            random_number: U256::ZERO,
        }
    }

    /// Returns true if the encounter lists `token` on either side.
    pub fn involves(&self, token: TokenId) -> bool {
        self.attacker == token || self.defender == token
    }

    /// Randomness was requested but no seed has arrived yet.
    pub fn is_pending(&self) -> bool {
        self.randomness_requested && !self.randomness_fulfilled
    }

    /// Fulfilled and waiting for anyone to resolve it.
    pub fn is_resolvable(&self) -> bool {
        self.randomness_fulfilled && !self.resolved
    }

    /// Returns the combatant on the other side of `token`.
    pub fn opponent_of(&self, token: TokenId) -> Option<TokenId> {
        if token == self.attacker {
            Some(self.defender)
        } else if token == self.defender {
            Some(self.attacker)
        } else {
            None
        }
    }
}
