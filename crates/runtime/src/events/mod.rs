//! Topic-based event bus for session events.
//!
//! Renderers subscribe to [`Topic::Animation`]; status displays and logs
//! subscribe to [`Topic::Sync`].

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{AnimationBatch, SyncEvent};
