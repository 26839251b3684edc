//! Battle actions and their transitions.
//!
//! Each action is a plain data struct implementing [`BattleTransition`]. The
//! [`BattleAction`] enum is what travels inside a [`Transaction`]; the engine
//! authorizes it against [`Permission`] and dispatches to the concrete
//! transition.
mod admin;
mod encounter;
mod output;
mod randomness;
mod revive;
mod transition;

use alloy_primitives::Address;

pub use admin::{
    AdminError, AdvanceStatusesAction, CompleteCycleAction, ForceResolveAction,
    GrantRandomnessRoleAction, OverrideStatusesAction, RevokeRandomnessRoleAction,
    SetBattlesEnabledAction,
};
pub use encounter::{EncounterError, FinishThemAction, StartBattleAction};
pub use output::{BattleEvent, ExternalEffect, TransitionOutput};
pub use randomness::{FulfillRandomnessAction, RandomnessError};
pub use revive::{ReviveAction, ReviveError};
pub use transition::{BattleTransition, CallContext};

use crate::state::{EncounterId, Roles, TokenId};

/// Who may submit an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Permission {
    Anyone,
    /// The current owner of the token.
    TokenOwner(TokenId),
    /// Any account holding every listed role.
    Role(Roles),
}

/// Every operation the battle contract accepts.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleAction {
    StartBattle(StartBattleAction),
    FulfillRandomness(FulfillRandomnessAction),
    FinishThem(FinishThemAction),
    Revive(ReviveAction),
    AdvanceStatuses(AdvanceStatusesAction),
    ForceResolve(ForceResolveAction),
    CompleteCycle(CompleteCycleAction),
    SetBattlesEnabled(SetBattlesEnabledAction),
    GrantRandomnessRole(GrantRandomnessRoleAction),
    RevokeRandomnessRole(RevokeRandomnessRoleAction),
    OverrideStatuses(OverrideStatusesAction),
}

impl BattleAction {
    pub fn start_battle(attacker: TokenId, defender: TokenId) -> Self {
        Self::StartBattle(StartBattleAction::new(attacker, defender))
    }

    pub fn finish_them(encounter: EncounterId) -> Self {
        Self::FinishThem(FinishThemAction::new(encounter))
    }

    pub fn revive(token: TokenId) -> Self {
        Self::Revive(ReviveAction::new(token))
    }

    pub fn permission(&self) -> Permission {
        match self {
            Self::StartBattle(action) => action.permission(),
            Self::FulfillRandomness(action) => action.permission(),
            Self::FinishThem(action) => action.permission(),
            Self::Revive(action) => action.permission(),
            Self::AdvanceStatuses(action) => action.permission(),
            Self::ForceResolve(action) => action.permission(),
            Self::CompleteCycle(action) => action.permission(),
            Self::SetBattlesEnabled(action) => action.permission(),
            Self::GrantRandomnessRole(action) => action.permission(),
            Self::RevokeRandomnessRole(action) => action.permission(),
            Self::OverrideStatuses(action) => action.permission(),
        }
    }

    /// Stable name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::StartBattle(_) => "start_battle",
            Self::FulfillRandomness(_) => "fulfill_randomness",
            Self::FinishThem(_) => "finish_them",
            Self::Revive(_) => "revive",
            Self::AdvanceStatuses(_) => "advance_statuses",
            Self::ForceResolve(_) => "force_resolve",
            Self::CompleteCycle(_) => "complete_cycle",
            Self::SetBattlesEnabled(_) => "set_battles_enabled",
            Self::GrantRandomnessRole(_) => "grant_randomness_role",
            Self::RevokeRandomnessRole(_) => "revoke_randomness_role",
            Self::OverrideStatuses(_) => "override_statuses",
        }
    }
}

/// An action signed by `sender`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transaction {
    pub sender: Address,
    pub action: BattleAction,
}

impl Transaction {
    pub fn new(sender: Address, action: BattleAction) -> Self {
        Self { sender, action }
    }
}
