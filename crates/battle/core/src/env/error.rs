//! Oracle access errors.

use crate::error::{BattleError, ErrorKind};
use crate::state::TokenId;

/// Errors that occur when accessing collaborator data.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("StatOracle not available")]
    StatsNotAvailable,

    #[error("EquipmentOracle not available")]
    EquipmentNotAvailable,

    #[error("EnergyOracle not available")]
    EnergyNotAvailable,

    #[error("ChainOracle not available")]
    ChainNotAvailable,

    #[error("{0} does not exist")]
    TokenNotFound(TokenId),
}

impl BattleError for OracleError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::TokenNotFound(_) => ErrorKind::Precondition,
            _ => ErrorKind::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::StatsNotAvailable => "ORACLE_STATS_NOT_AVAILABLE",
            Self::EquipmentNotAvailable => "ORACLE_EQUIPMENT_NOT_AVAILABLE",
            Self::EnergyNotAvailable => "ORACLE_ENERGY_NOT_AVAILABLE",
            Self::ChainNotAvailable => "ORACLE_CHAIN_NOT_AVAILABLE",
            Self::TokenNotFound(_) => "TOKEN_NOT_FOUND",
        }
    }
}
