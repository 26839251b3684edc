//! In-process stand-ins for the contracts the battle rules collaborate with.
//!
//! Each contract keeps its own storage and authorization. The battle rules
//! read them through the `battle_core` oracle traits and write only through
//! the ports in [`ports`].
mod collection;
mod energy;
mod equipment;
mod error;
pub mod ports;

pub use collection::{Unimon, UnimonCollection};
pub use energy::EnergyToken;
pub use equipment::{EquipmentRegistry, EquipmentView, ItemConfig};
pub use error::ContractError;
pub use ports::{ConsumableBurner, EnergySpender};
