//! Traits describing the collaborators the battle rules read from.
//!
//! Oracles expose the NFT collection, the equipment contract, the energy
//! token and the ambient block context. The [`Env`] aggregate bundles them so
//! the engine can access everything it needs without hard coupling to
//! concrete implementations. Oracles are read-only: writes to collaborators
//! leave the core as [`crate::ExternalEffect`]s.
mod chain;
mod equipment;
mod error;
mod stats;

#[cfg(test)]
pub(crate) mod fixtures;

use alloy_primitives::{Address, U256};

pub use chain::{ChainOracle, EnergyOracle};
pub use equipment::{EquipmentOracle, ModifiedStats};
pub use error::OracleError;
pub use stats::{BaseStats, StatOracle};

use crate::state::{Timestamp, TokenId};

/// Aggregates read-only oracles required by the transitions.
#[derive(Clone, Copy, Debug)]
pub struct Env<'a, S, Q, E, C>
where
    S: StatOracle + ?Sized,
    Q: EquipmentOracle + ?Sized,
    E: EnergyOracle + ?Sized,
    C: ChainOracle + ?Sized,
{
    stats: Option<&'a S>,
    equipment: Option<&'a Q>,
    energy: Option<&'a E>,
    chain: Option<&'a C>,
}

pub type BattleEnv<'a> = Env<
    'a,
    dyn StatOracle + 'a,
    dyn EquipmentOracle + 'a,
    dyn EnergyOracle + 'a,
    dyn ChainOracle + 'a,
>;

impl<'a, S, Q, E, C> Env<'a, S, Q, E, C>
where
    S: StatOracle + ?Sized,
    Q: EquipmentOracle + ?Sized,
    E: EnergyOracle + ?Sized,
    C: ChainOracle + ?Sized,
{
    pub fn new(
        stats: Option<&'a S>,
        equipment: Option<&'a Q>,
        energy: Option<&'a E>,
        chain: Option<&'a C>,
    ) -> Self {
        Self {
            stats,
            equipment,
            energy,
            chain,
        }
    }

    pub fn with_all(stats: &'a S, equipment: &'a Q, energy: &'a E, chain: &'a C) -> Self {
        Self::new(Some(stats), Some(equipment), Some(energy), Some(chain))
    }

    pub fn empty() -> Self {
        Self {
            stats: None,
            equipment: None,
            energy: None,
            chain: None,
        }
    }

    /// Returns the StatOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::StatsNotAvailable` if no stat oracle was provided.
    pub fn stats(&self) -> Result<&'a S, OracleError> {
        self.stats.ok_or(OracleError::StatsNotAvailable)
    }

    /// Returns the EquipmentOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::EquipmentNotAvailable` if no equipment oracle was provided.
    pub fn equipment(&self) -> Result<&'a Q, OracleError> {
        self.equipment.ok_or(OracleError::EquipmentNotAvailable)
    }

    /// Returns the EnergyOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::EnergyNotAvailable` if no energy oracle was provided.
    pub fn energy(&self) -> Result<&'a E, OracleError> {
        self.energy.ok_or(OracleError::EnergyNotAvailable)
    }

    /// Returns the ChainOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::ChainNotAvailable` if no chain oracle was provided.
    pub fn chain(&self) -> Result<&'a C, OracleError> {
        self.chain.ok_or(OracleError::ChainNotAvailable)
    }

    /// Timestamp of the executing block.
    pub fn now(&self) -> Result<Timestamp, OracleError> {
        Ok(self.chain()?.timestamp())
    }

    pub fn prevrandao(&self) -> Result<U256, OracleError> {
        Ok(self.chain()?.prevrandao())
    }

    /// Owner of an existing token.
    pub fn owner_of(&self, token: TokenId) -> Result<Address, OracleError> {
        self.stats()?
            .owner_of(token)
            .ok_or(OracleError::TokenNotFound(token))
    }

    /// Base stats of an existing token.
    pub fn base_stats(&self, token: TokenId) -> Result<BaseStats, OracleError> {
        self.stats()?
            .base_stats(token)
            .ok_or(OracleError::TokenNotFound(token))
    }
}

impl<'a, S, Q, E, C> Env<'a, S, Q, E, C>
where
    S: StatOracle + 'a,
    Q: EquipmentOracle + 'a,
    E: EnergyOracle + 'a,
    C: ChainOracle + 'a,
{
    /// Converts this environment into a trait-object based `BattleEnv`.
    pub fn as_battle_env(&self) -> BattleEnv<'a> {
        let stats: Option<&'a dyn StatOracle> = self.stats.map(|stats| stats as _);
        let equipment: Option<&'a dyn EquipmentOracle> =
            self.equipment.map(|equipment| equipment as _);
        let energy: Option<&'a dyn EnergyOracle> = self.energy.map(|energy| energy as _);
        let chain: Option<&'a dyn ChainOracle> = self.chain.map(|chain| chain as _);
        Env::new(stats, equipment, energy, chain)
    }
}
