//! Observable results of a transition: emitted events and collaborator writes.

use alloy_primitives::{Address, U256};

use crate::combat::Resolution;
use crate::state::{BattleStatus, EncounterId, TokenId};

/// Notifications emitted by committed transitions, in emission order.
///
/// Every encounter-scoped event carries the cycle number so indexers can
/// bucket history without reading state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleEvent {
    BattleStarted {
        encounter: EncounterId,
        attacker: TokenId,
        defender: TokenId,
        cycle: u64,
    },
    RandomnessRequested {
        encounter: EncounterId,
        cycle: u64,
    },
    RandomnessFulfilled {
        encounter: EncounterId,
        random_number: U256,
        /// True when the admin sweep substituted block-context randomness.
        fallback: bool,
    },
    BattleFinished {
        encounter: EncounterId,
        cycle: u64,
        resolution: Resolution,
    },
    EncounterForceResolved {
        encounter: EncounterId,
        cycle: u64,
    },
    StatusChanged {
        token: TokenId,
        from: BattleStatus,
        to: BattleStatus,
    },
    Revived {
        token: TokenId,
        cost: u128,
        revive_count: u32,
    },
    CycleCompleted {
        cycle: u64,
    },
    BattlesToggled {
        enabled: bool,
    },
    RandomnessRoleGranted {
        account: Address,
    },
    RandomnessRoleRevoked {
        account: Address,
    },
}

impl BattleEvent {
    /// Encounter this event belongs to, if any.
    pub fn encounter(&self) -> Option<EncounterId> {
        match self {
            Self::BattleStarted { encounter, .. }
            | Self::RandomnessRequested { encounter, .. }
            | Self::RandomnessFulfilled { encounter, .. }
            | Self::BattleFinished { encounter, .. }
            | Self::EncounterForceResolved { encounter, .. } => Some(*encounter),
            _ => None,
        }
    }
}

/// A write the transition needs another contract to perform.
///
/// The host applies effects in order within the same atomic transaction; a
/// failing effect reverts the whole transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExternalEffect {
    /// Burn the consumable equipped on `token` and clear its slot.
    BurnConsumable { token: TokenId },
    /// Take `amount` energy from `owner`.
    SpendEnergy { owner: Address, amount: u128 },
}

/// Accumulates what a transition produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransitionOutput {
    pub events: Vec<BattleEvent>,
    pub effects: Vec<ExternalEffect>,
    /// Batch entries that were skipped without error.
    pub skipped: Vec<u64>,
}

impl TransitionOutput {
    pub fn emit(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn request(&mut self, effect: ExternalEffect) {
        self.effects.push(effect);
    }

    pub fn skip(&mut self, id: u64) {
        self.skipped.push(id);
    }

    pub(crate) fn status_changed(&mut self, token: TokenId, from: BattleStatus, to: BattleStatus) {
        if from != to {
            self.emit(BattleEvent::StatusChanged { token, from, to });
        }
    }
}
