//! Deterministic battle rules for the Unimon collection.
//!
//! `battle-core` defines the canonical encounter state machine, the cycle
//! clock, the winner-selection formula and the randomness derivations. It
//! never performs I/O: collaborator contracts are reached through read-only
//! oracles bundled in [`env::Env`], and every mutation of [`BattleState`]
//! flows through [`engine::BattleEngine`]. Writes that belong to other
//! contracts (burning consumables, spending energy) are returned as
//! [`ExternalEffect`]s for the host ledger to apply inside the same
//! transaction.
pub mod action;
pub mod clock;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod randomness;
pub mod state;

pub use action::{
    AdminError, BattleAction, BattleEvent, EncounterError, ExternalEffect, Permission,
    RandomnessError, ReviveError, Transaction, TransitionOutput,
};
pub use clock::{CycleClock, CycleInfo, SpecialAttackRange};
pub use combat::{Resolution, Side, select_winner, win_chance_bps};
pub use config::BattleConfig;
pub use engine::{
    BattleEngine, ExecuteError, ExecutionOutcome, TransitionPhase, TransitionPhaseError,
};
pub use env::{
    BaseStats, BattleEnv, ChainOracle, EnergyOracle, Env, EquipmentOracle, ModifiedStats,
    OracleError, StatOracle,
};
pub use error::{BattleError, ErrorKind};
pub use randomness::{derive_random_number, fallback_random_number};
pub use state::{
    AccessControl, BattleState, BattleStatus, CombatantRecord, CycleRecord, Encounter,
    EncounterId, InitializationError, InvariantViolation, Roles, Timestamp, TokenId,
};

pub use alloy_primitives::{Address, U256};
