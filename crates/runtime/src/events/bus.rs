//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

use battle_core::BattleEvent;

use super::types::{CommittedEvent, RevertedTx};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Encounters opening and resolving
    Encounter,
    /// Randomness requests, fulfilments and provider role changes
    Randomness,
    /// Status changes, revivals, cycle bookkeeping and reverted transactions
    Lifecycle,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Encounter, Topic::Randomness, Topic::Lifecycle];
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    Committed(CommittedEvent),
    Reverted(RevertedTx),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Committed(committed) => match &committed.event {
                BattleEvent::BattleStarted { .. }
                | BattleEvent::BattleFinished { .. }
                | BattleEvent::EncounterForceResolved { .. } => Topic::Encounter,
                BattleEvent::RandomnessRequested { .. }
                | BattleEvent::RandomnessFulfilled { .. }
                | BattleEvent::RandomnessRoleGranted { .. }
                | BattleEvent::RandomnessRoleRevoked { .. } => Topic::Randomness,
                BattleEvent::StatusChanged { .. }
                | BattleEvent::Revived { .. }
                | BattleEvent::CycleCompleted { .. }
                | BattleEvent::BattlesToggled { .. } => Topic::Lifecycle,
            },
            Event::Reverted(_) => Topic::Lifecycle,
        }
    }

    /// The battle notification, if this event is one.
    pub fn battle_event(&self) -> Option<&BattleEvent> {
        match self {
            Event::Committed(committed) => Some(&committed.event),
            Event::Reverted(_) => None,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about.
pub struct EventBus {
    channels: Arc<RwLock<HashMap<Topic, broadcast::Sender<Event>>>>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let channels = Topic::ALL
            .into_iter()
            .map(|topic| (topic, broadcast::channel(capacity).0))
            .collect();

        Self {
            channels: Arc::new(RwLock::new(channels)),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();

        // Use try_read to avoid blocking in async context
        match self.channels.try_read() {
            Ok(channels) => {
                if let Some(tx) = channels.get(&topic)
                    && tx.send(event).is_err()
                {
                    tracing::trace!("No subscribers for topic {:?}", topic);
                }
            }
            Err(_) => {
                tracing::debug!("Failed to acquire event bus lock for topic {:?}", topic);
            }
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns `None` only if the channel table is being written concurrently.
    pub fn subscribe(&self, topic: Topic) -> Option<broadcast::Receiver<Event>> {
        let channels = self.channels.try_read().ok()?;
        channels.get(&topic).map(broadcast::Sender::subscribe)
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .filter_map(|&topic| self.subscribe(topic).map(|rx| (topic, rx)))
            .collect()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use battle_core::{EncounterId, TokenId};

    use super::*;

    fn committed(event: BattleEvent) -> Event {
        Event::Committed(CommittedEvent {
            block_number: 1,
            timestamp: 0,
            event,
        })
    }

    #[tokio::test]
    async fn routes_by_topic() {
        let bus = EventBus::with_capacity(8);
        let mut encounters = bus.subscribe(Topic::Encounter).unwrap();
        let mut randomness = bus.subscribe(Topic::Randomness).unwrap();

        bus.publish(committed(BattleEvent::RandomnessRequested {
            encounter: EncounterId(1),
            cycle: 1,
        }));
        bus.publish(committed(BattleEvent::BattleStarted {
            encounter: EncounterId(1),
            attacker: TokenId(1),
            defender: TokenId(2),
            cycle: 1,
        }));

        assert_eq!(encounters.recv().await.unwrap().topic(), Topic::Encounter);
        assert_eq!(randomness.recv().await.unwrap().topic(), Topic::Randomness);
        assert!(encounters.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::default();
        bus.publish(committed(BattleEvent::BattlesToggled { enabled: false }));
    }
}
