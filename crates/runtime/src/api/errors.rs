//! Unified error types surfaced by the runtime API.
//!
//! Wraps engine reverts, collaborator reverts, repository failures and worker
//! coordination so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use battle_core::{BattleError, ErrorKind, ExecuteError, InitializationError};

use crate::contracts::ContractError;
pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Execute(#[from] ExecuteError),

    #[error("collaborator reverted: {0}")]
    Contract(#[from] ContractError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("failed to deploy battle state")]
    InitialState(#[source] InitializationError),

    #[error("timestamp {requested} is before the current block time {current}")]
    TimeTravel { requested: u64, current: u64 },

    #[error("ledger worker command channel closed")]
    CommandChannelClosed,

    #[error("ledger worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("ledger worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}

impl RuntimeError {
    /// Stable code for reverted transactions, `None` for infrastructure errors.
    pub fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::Execute(error) => Some(error.error_code()),
            Self::Contract(_) => Some("COLLABORATOR_REVERTED"),
            _ => None,
        }
    }

    /// Category of a reverted transaction.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Execute(error) => error.kind(),
            Self::Contract(ContractError::InsufficientBalance { .. }) => ErrorKind::StateConflict,
            _ => ErrorKind::Internal,
        }
    }
}
