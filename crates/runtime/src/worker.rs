//! Background task that owns the authoritative [`Ledger`].
//!
//! Receives commands from [`LedgerHandle`](crate::LedgerHandle), executes
//! them one at a time, and replies over oneshot channels. Serializing every
//! write through this loop is what makes the ledger single-writer.
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use battle_core::{Timestamp, Transaction};

use crate::api::Result;
use crate::ledger::{Ledger, LedgerSnapshot, TxReceipt};

/// Commands that can be sent to the ledger worker.
pub(crate) enum Command {
    /// Execute a transaction in the current block.
    Submit {
        tx: Transaction,
        reply: oneshot::Sender<Result<TxReceipt>>,
    },
    /// Move block time forward.
    AdvanceTime {
        seconds: u64,
        reply: oneshot::Sender<Result<Timestamp>>,
    },
    /// Move block time to an absolute timestamp.
    SetTimestamp {
        timestamp: Timestamp,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Read-only copy of everything the ledger holds.
    Snapshot {
        reply: oneshot::Sender<LedgerSnapshot>,
    },
}

pub(crate) struct LedgerWorker {
    ledger: Ledger,
    command_rx: mpsc::Receiver<Command>,
}

impl LedgerWorker {
    pub(crate) fn new(ledger: Ledger, command_rx: mpsc::Receiver<Command>) -> Self {
        Self { ledger, command_rx }
    }

    /// Runs until every handle is dropped, then hands the ledger back.
    pub(crate) async fn run(mut self) -> Ledger {
        while let Some(command) = self.command_rx.recv().await {
            self.handle_command(command);
        }
        debug!(target: "runtime::worker", "command channel closed, worker exiting");
        self.ledger
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Submit { tx, reply } => {
                let _ = reply.send(self.ledger.submit(tx));
            }
            Command::AdvanceTime { seconds, reply } => {
                let _ = reply.send(self.ledger.advance_time(seconds));
            }
            Command::SetTimestamp { timestamp, reply } => {
                let _ = reply.send(self.ledger.set_timestamp(timestamp));
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.ledger.snapshot());
            }
        }
    }
}
