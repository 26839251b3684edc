//! Topic-based event bus for committed and reverted transactions.
//!
//! Events are published to specific topics, and consumers can subscribe only
//! to the topics they need.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{CommittedEvent, RevertedTx};
