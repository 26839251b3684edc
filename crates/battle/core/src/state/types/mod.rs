mod combatant;
mod common;
mod cycle;
mod encounter;
mod roles;

pub use combatant::{BattleStatus, CombatantRecord};
pub use common::{EncounterId, Timestamp, TokenId};
pub use cycle::CycleRecord;
pub use encounter::Encounter;
pub use roles::{AccessControl, Roles};
