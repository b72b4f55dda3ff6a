//! Event types for different topics.

use serde::{Deserialize, Serialize};

use board_core::{AnimationEvent, PieceIndex, SeatIndex};

use crate::types::MatchId;

/// Animations one seat should play after a delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationBatch {
    pub match_id: MatchId,
    pub seat: SeatIndex,
    pub events: Vec<AnimationEvent>,
}

/// Lifecycle and write-path notifications of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SyncEvent {
    /// This session generated and pushed the initial state.
    Initialized { match_id: MatchId, pieces: usize },

    /// The store already held state; it was adopted without animations.
    Adopted { match_id: MatchId, pieces: usize },

    /// The store accepted a local mutation.
    WriteAcknowledged {
        match_id: MatchId,
        mutation: String,
        pieces: Vec<PieceIndex>,
    },

    /// The store rejected a local mutation; it stays applied locally.
    WriteFailed {
        match_id: MatchId,
        mutation: String,
        error: String,
    },

    /// The session released its subscription.
    Closed { match_id: MatchId },
}
