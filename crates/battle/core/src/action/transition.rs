use alloy_primitives::Address;

use super::{Permission, TransitionOutput};
use crate::env::BattleEnv;
use crate::state::{BattleState, Timestamp};

/// Transaction-scoped facts shared by every phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallContext {
    pub sender: Address,
    /// Block timestamp, read once per transaction.
    pub now: Timestamp,
}

/// Defines how a concrete action mutates battle state.
///
/// Implementors can override the validation hooks to surface pre- and
/// post-conditions that must hold around the state mutation. All hooks receive
/// read-only access to collaborators via `Env` and must stay side-effect free;
/// writes to other contracts are requested through [`TransitionOutput`].
pub trait BattleTransition {
    type Error;

    /// Who may submit this action.
    fn permission(&self) -> Permission;

    /// Validates pre-conditions using the state **before** mutation.
    fn pre_validate(
        &self,
        _ctx: &CallContext,
        _state: &BattleState,
        _env: &BattleEnv<'_>,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies the action. Implementations may assume `pre_validate` passed.
    fn apply(
        &self,
        ctx: &CallContext,
        state: &mut BattleState,
        env: &BattleEnv<'_>,
        out: &mut TransitionOutput,
    ) -> Result<(), Self::Error>;

    /// Validates post-conditions using the state **after** mutation.
    fn post_validate(
        &self,
        _ctx: &CallContext,
        _state: &BattleState,
        _env: &BattleEnv<'_>,
    ) -> Result<(), Self::Error> {
        Ok(())
    }
}
