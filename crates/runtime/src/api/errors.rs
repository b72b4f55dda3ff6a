//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from the mutation engine, participant resolution and the
//! sync gateway so clients can bubble them up with consistent context.
use thiserror::Error;

use board_core::{BoardError, ErrorSeverity, ParticipantError, StateError};

pub use crate::gateway::GatewayError;
use crate::types::MatchId;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Participant(#[from] ParticipantError),

    /// The local mutation is applied but the store has not accepted it yet.
    #[error("failed to push {mutation} for match {match_id}")]
    SyncWriteFailure {
        match_id: MatchId,
        mutation: &'static str,
        #[source]
        source: GatewayError,
    },

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("subscription to match {match_id} closed")]
    SubscriptionClosed { match_id: MatchId },

    #[error("subscription to match {match_id} skipped {skipped} deliveries")]
    SubscriptionLagged { match_id: MatchId, skipped: u64 },

    #[error("match {match_id} does not exist")]
    MatchNotFound { match_id: MatchId },
}

impl BoardError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::State(err) => err.severity(),
            Self::Participant(err) => err.severity(),
            Self::Gateway(err) => err.severity(),
            Self::SyncWriteFailure { .. }
            | Self::SubscriptionClosed { .. }
            | Self::SubscriptionLagged { .. } => ErrorSeverity::Recoverable,
            Self::MatchNotFound { .. } => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::State(err) => err.error_code(),
            Self::Participant(err) => err.error_code(),
            Self::Gateway(err) => err.error_code(),
            Self::SyncWriteFailure { .. } => "RUNTIME_SYNC_WRITE_FAILURE",
            Self::SubscriptionClosed { .. } => "RUNTIME_SUBSCRIPTION_CLOSED",
            Self::SubscriptionLagged { .. } => "RUNTIME_SUBSCRIPTION_LAGGED",
            Self::MatchNotFound { .. } => "RUNTIME_MATCH_NOT_FOUND",
        }
    }
}
