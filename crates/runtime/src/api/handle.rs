//! Cloneable façade for issuing commands to a running ledger.
//!
//! [`LedgerHandle`] hides channel plumbing and offers async helpers for
//! submitting transactions, moving the clock and streaming events from
//! specific topics.
use std::collections::HashMap;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;

use battle_core::{Timestamp, Transaction};

use super::errors::{Result, RuntimeError};
use crate::config::RuntimeConfig;
use crate::events::{Event, EventBus, Topic};
use crate::ledger::{Ledger, LedgerSnapshot, TxReceipt};
use crate::worker::{Command, LedgerWorker};

/// Client-facing handle to a ledger running on its own task.
#[derive(Clone)]
pub struct LedgerHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl LedgerHandle {
    /// Moves `ledger` onto a background task.
    ///
    /// The task ends once every handle is dropped; awaiting the returned join
    /// handle yields the ledger back.
    pub fn spawn(ledger: Ledger, config: &RuntimeConfig) -> (Self, JoinHandle<Ledger>) {
        let (command_tx, command_rx) = mpsc::channel(config.command_buffer_size.max(1));
        let event_bus = ledger.event_bus().clone();
        let task = tokio::spawn(LedgerWorker::new(ledger, command_rx).run());
        (
            Self {
                command_tx,
                event_bus,
            },
            task,
        )
    }

    /// Submit a transaction and wait for its receipt.
    ///
    /// A reverted transaction surfaces as [`RuntimeError::Execute`] or
    /// [`RuntimeError::Contract`] and leaves the ledger untouched.
    pub async fn submit(&self, tx: Transaction) -> Result<TxReceipt> {
        let (reply, reply_rx) = oneshot::channel();
        self.send(Command::Submit { tx, reply }).await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Move block time forward, returning the new timestamp.
    pub async fn advance_time(&self, seconds: u64) -> Result<Timestamp> {
        let (reply, reply_rx) = oneshot::channel();
        self.send(Command::AdvanceTime { seconds, reply }).await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    pub async fn set_timestamp(&self, timestamp: Timestamp) -> Result<()> {
        let (reply, reply_rx) = oneshot::channel();
        self.send(Command::SetTimestamp { timestamp, reply }).await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Query a read-only copy of the ledger.
    pub async fn snapshot(&self) -> Result<LedgerSnapshot> {
        let (reply, reply_rx) = oneshot::channel();
        self.send(Command::Snapshot { reply }).await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use runtime::Topic;
    ///
    /// let mut encounters = handle.subscribe(Topic::Encounter).unwrap();
    /// while let Ok(event) = encounters.recv().await {
    ///     // Handle encounter events
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> Option<broadcast::Receiver<Event>> {
        self.event_bus.subscribe(topic)
    }

    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Drops this handle and waits for the worker to hand the ledger back.
    ///
    /// Only returns once every clone of the handle has been dropped.
    pub async fn shutdown(self, task: JoinHandle<Ledger>) -> Result<Ledger> {
        drop(self);
        task.await.map_err(RuntimeError::WorkerJoin)
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }
}
