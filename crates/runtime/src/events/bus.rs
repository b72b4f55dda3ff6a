//! Broadcast bus with one channel per [`Topic`].

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{AnimationBatch, SyncEvent};

/// Routing key for session events.
#[derive(
    Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize, strum::EnumIter, strum::Display,
)]
pub enum Topic {
    /// Per-seat animation decisions
    Animation,
    /// Initialization, write acknowledgements and failures
    Sync,
}

/// Anything a session publishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Animation(AnimationBatch),
    Sync(SyncEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Animation(_) => Topic::Animation,
            Event::Sync(_) => Topic::Sync,
        }
    }
}

/// Fan-out of session events to renderers and loggers.
///
/// Channels are created once per topic at construction, so publishing and
/// subscribing never take a lock.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<HashMap<Topic, broadcast::Sender<Event>>>,
}

impl EventBus {
    /// 100 buffered events per topic.
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        use strum::IntoEnumIterator;

        let channels = Topic::iter()
            .map(|topic| (topic, broadcast::channel(capacity.max(1)).0))
            .collect();

        Self {
            channels: Arc::new(channels),
        }
    }

    /// Sends `event` on its topic. Dropped silently when nobody listens.
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if let Some(tx) = self.channels.get(&topic)
            && tx.send(event).is_err()
        {
            tracing::trace!(%topic, "event dropped, no subscribers");
        }
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        match self.channels.get(&topic) {
            Some(tx) => tx.subscribe(),
            // Every topic gets a channel in `with_capacity`.
            None => broadcast::channel(1).1,
        }
    }

    /// One receiver per requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
