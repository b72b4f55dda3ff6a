//! Deterministic piece-state model shared by every participant of a match.
//!
//! `board-core` defines the canonical data types (game specs, match state,
//! participants), the [`engine::MutationEngine`] that rewrites a working
//! snapshot, and the change detector in [`state::delta`] that turns two
//! snapshots into per-piece animation decisions. Nothing in this crate
//! performs I/O; the runtime crate wires it to a sync gateway.
pub mod config;
pub mod engine;
pub mod error;
pub mod gesture;
pub mod participants;
pub mod rng;
pub mod spec;
pub mod state;

pub use config::BoardConfig;
pub use engine::{Mutation, MutationEngine, Seating};
pub use error::{BoardError, ErrorSeverity};
pub use gesture::{Gesture, GestureOutcome, TouchPoint};
pub use participants::{ParticipantError, Participants, UserId};
pub use rng::{PcgRng, RngOracle, compute_seed};
pub use spec::{Anchor, BoardSpec, GameSpec, GameSpecId, ImageRef, PieceKind, PieceSpec};
pub use state::{
    Animation, AnimationEvent, CardVisibility, MatchState, PieceChanges, PieceFields, PieceIndex,
    PieceState, PieceView, SeatIndex, StateError, detect,
};
