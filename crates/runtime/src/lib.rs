//! Runtime orchestration for shared tabletop matches.
//!
//! This crate connects the pure `board-core` model to a shared store. A
//! [`MatchSession`] owns one participant's snapshots, applies mutations
//! locally, pushes them through a [`SyncGateway`], and turns every delivery
//! from the store into animation events on an [`EventBus`].
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the match lifecycle state machine
//! - [`gateway`] defines the store contract and the in-memory store
//! - [`events`] provides topic-based event bus for animation and sync events
//! - [`handles`] maps animation events onto renderer handles
//! - [`api`] exposes the error types downstream clients interact with
pub mod api;
pub mod config;
pub mod events;
pub mod gateway;
pub mod handles;
pub mod session;
pub mod types;

pub use api::{Result, RuntimeError};
pub use config::RuntimeConfig;
pub use events::{AnimationBatch, Event, EventBus, SyncEvent, Topic};
pub use gateway::{
    Delivery, GatewayError, InMemorySyncGateway, Subscription, SyncGateway,
};
pub use handles::{PieceHandles, Tween};
pub use session::{MatchSession, SessionPhase};
pub use types::{MatchId, MatchInfo};
