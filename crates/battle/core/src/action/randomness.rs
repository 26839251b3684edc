//! Randomness fulfilment by the provider role.

use alloy_primitives::U256;

use crate::action::{BattleEvent, BattleTransition, CallContext, Permission, TransitionOutput};
use crate::env::BattleEnv;
use crate::error::{BattleError, ErrorKind};
use crate::randomness::derive_random_number;
use crate::state::{BattleState, EncounterId, Roles};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RandomnessError {
    #[error("{ids} encounter ids but {seeds} seeds")]
    LengthMismatch { ids: usize, seeds: usize },

    #[error("batch of {len} encounters exceeds the limit of {max}")]
    BatchTooLarge { len: usize, max: u64 },
}

impl BattleError for RandomnessError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Precondition
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::LengthMismatch { .. } => "LENGTH_MISMATCH",
            Self::BatchTooLarge { .. } => "BATCH_TOO_LARGE",
        }
    }
}

/// Commits provider seeds to pending encounters.
///
/// Entries for unknown, never-requested or already fulfilled encounters are
/// skipped so overlapping batches never revert each other.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FulfillRandomnessAction {
    pub encounter_ids: Vec<EncounterId>,
    pub seeds: Vec<U256>,
}

impl FulfillRandomnessAction {
    pub fn new(encounter_ids: Vec<EncounterId>, seeds: Vec<U256>) -> Self {
        Self {
            encounter_ids,
            seeds,
        }
    }

    pub fn single(encounter: EncounterId, seed: U256) -> Self {
        Self::new(vec![encounter], vec![seed])
    }
}

impl BattleTransition for FulfillRandomnessAction {
    type Error = RandomnessError;

    fn permission(&self) -> Permission {
        Permission::Role(Roles::RANDOMNESS_PROVIDER)
    }

    fn pre_validate(
        &self,
        _ctx: &CallContext,
        state: &BattleState,
        _env: &BattleEnv<'_>,
    ) -> Result<(), Self::Error> {
        let max = state.config.max_batch_size;
        if self.encounter_ids.len() as u64 > max {
            return Err(RandomnessError::BatchTooLarge {
                len: self.encounter_ids.len(),
                max,
            });
        }
        if self.encounter_ids.len() != self.seeds.len() {
            return Err(RandomnessError::LengthMismatch {
                ids: self.encounter_ids.len(),
                seeds: self.seeds.len(),
            });
        }
        Ok(())
    }

    fn apply(
        &self,
        _ctx: &CallContext,
        state: &mut BattleState,
        _env: &BattleEnv<'_>,
        out: &mut TransitionOutput,
    ) -> Result<(), Self::Error> {
        for (&id, &seed) in self.encounter_ids.iter().zip(&self.seeds) {
            let Some(encounter) = state.encounter_mut(id).filter(|e| e.is_pending()) else {
                out.skip(id.0);
                continue;
            };

            let random_number = derive_random_number(seed, id);
            encounter.random_number = random_number;
            encounter.randomness_fulfilled = true;
            out.emit(BattleEvent::RandomnessFulfilled {
                encounter: id,
                random_number,
                fallback: false,
            });
        }
        Ok(())
    }
}
