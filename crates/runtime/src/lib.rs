//! Ledger runtime for the Unimon battle contract.
//!
//! This crate hosts `battle-core` inside a single-writer ledger alongside
//! in-process collaborator contracts, routes the collaborator writes the
//! battle rules request, and exposes the result through an event bus, a
//! snapshot repository and an async handle.
//!
//! Modules are organized by responsibility:
//! - [`ledger`] executes transactions atomically and owns block time
//! - [`contracts`] provides the NFT collection, equipment and energy token
//! - [`api`] exposes the handle and error types downstream clients use
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`repository`] persists ledger snapshots
pub mod api;
pub mod config;
pub mod contracts;
pub mod events;
pub mod ledger;
pub mod repository;

mod worker;

pub use api::{LedgerHandle, Result, RuntimeError};
pub use config::RuntimeConfig;
pub use contracts::{
    ConsumableBurner, ContractError, EnergySpender, EnergyToken, EquipmentRegistry,
    EquipmentView, ItemConfig, Unimon, UnimonCollection,
};
pub use events::{CommittedEvent, Event, EventBus, RevertedTx, Topic};
pub use ledger::{BlockContext, ContractSet, Ledger, LedgerSnapshot, TxReceipt};
pub use repository::{
    FileStateRepository, InMemoryStateRepo, RepositoryError, StateRepository,
};
