//! Error types for the transaction pipeline.

use alloy_primitives::Address;

use crate::action::{
    AdvanceStatusesAction, BattleTransition, CompleteCycleAction, FinishThemAction,
    ForceResolveAction, FulfillRandomnessAction, GrantRandomnessRoleAction,
    OverrideStatusesAction, ReviveAction, RevokeRandomnessRoleAction, SetBattlesEnabledAction,
    StartBattleAction,
};
use crate::env::OracleError;
use crate::error::{BattleError, ErrorKind};
use crate::state::{Roles, TokenId};

/// Identifies which stage of the transition pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::PreValidate => "pre_validate",
            TransitionPhase::Apply => "apply",
            TransitionPhase::PostValidate => "post_validate",
        }
    }
}

/// Associates a transition phase with the underlying error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionPhaseError<E> {
    pub phase: TransitionPhase,
    pub error: E,
}

impl<E> TransitionPhaseError<E> {
    pub fn new(phase: TransitionPhase, error: E) -> Self {
        Self { phase, error }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for TransitionPhaseError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.phase.as_str(), self.error)
    }
}

impl<E: std::fmt::Display + std::fmt::Debug> std::error::Error for TransitionPhaseError<E> {}

type PhaseError<T> = TransitionPhaseError<<T as BattleTransition>::Error>;

/// Errors surfaced while executing a transaction through the battle engine.
///
/// A returned error means the transaction reverted: no state was written.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExecuteError {
    #[error("start battle failed: {0}")]
    StartBattle(PhaseError<StartBattleAction>),

    #[error("fulfill randomness failed: {0}")]
    FulfillRandomness(PhaseError<FulfillRandomnessAction>),

    #[error("finish them failed: {0}")]
    FinishThem(PhaseError<FinishThemAction>),

    #[error("revive failed: {0}")]
    Revive(PhaseError<ReviveAction>),

    #[error("advance statuses failed: {0}")]
    AdvanceStatuses(PhaseError<AdvanceStatusesAction>),

    #[error("force resolve failed: {0}")]
    ForceResolve(PhaseError<ForceResolveAction>),

    #[error("complete cycle failed: {0}")]
    CompleteCycle(PhaseError<CompleteCycleAction>),

    #[error("set battles enabled failed: {0}")]
    SetBattlesEnabled(PhaseError<SetBattlesEnabledAction>),

    #[error("grant randomness role failed: {0}")]
    GrantRandomnessRole(PhaseError<GrantRandomnessRoleAction>),

    #[error("revoke randomness role failed: {0}")]
    RevokeRandomnessRole(PhaseError<RevokeRandomnessRoleAction>),

    #[error("override statuses failed: {0}")]
    OverrideStatuses(PhaseError<OverrideStatusesAction>),

    #[error("{sender} does not own {token}")]
    NotTokenOwner { token: TokenId, sender: Address },

    #[error("{sender} lacks role {required:?}")]
    MissingRole { sender: Address, required: Roles },

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl ExecuteError {
    /// Pipeline phase that failed, if the error came from a transition.
    pub fn phase(&self) -> Option<TransitionPhase> {
        use ExecuteError::*;
        match self {
            StartBattle(e) | FinishThem(e) => Some(e.phase),
            FulfillRandomness(e) => Some(e.phase),
            Revive(e) => Some(e.phase),
            AdvanceStatuses(e)
            | ForceResolve(e)
            | CompleteCycle(e)
            | SetBattlesEnabled(e)
            | GrantRandomnessRole(e)
            | RevokeRandomnessRole(e)
            | OverrideStatuses(e) => Some(e.phase),
            NotTokenOwner { .. } | MissingRole { .. } | Oracle(_) => None,
        }
    }

    fn inner(&self) -> Option<&dyn BattleError> {
        use ExecuteError::*;
        match self {
            StartBattle(e) | FinishThem(e) => Some(&e.error),
            FulfillRandomness(e) => Some(&e.error),
            Revive(e) => Some(&e.error),
            AdvanceStatuses(e)
            | ForceResolve(e)
            | CompleteCycle(e)
            | SetBattlesEnabled(e)
            | GrantRandomnessRole(e)
            | RevokeRandomnessRole(e)
            | OverrideStatuses(e) => Some(&e.error),
            Oracle(e) => Some(e),
            NotTokenOwner { .. } | MissingRole { .. } => None,
        }
    }
}

impl BattleError for ExecuteError {
    fn kind(&self) -> ErrorKind {
        match self.inner() {
            Some(error) => error.kind(),
            None => ErrorKind::Unauthorized,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotTokenOwner { .. } => "NOT_TOKEN_OWNER",
            Self::MissingRole { .. } => "MISSING_ROLE",
            other => other.inner().map_or("UNKNOWN", |error| error.error_code()),
        }
    }
}
