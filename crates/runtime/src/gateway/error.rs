//! Error types raised by sync gateway implementations.

use thiserror::Error;

use board_core::{BoardError, ErrorSeverity};

use crate::types::MatchId;

/// Errors surfaced by gateway implementations.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("match {0} does not exist")]
    MatchNotFound(MatchId),

    #[error("write to match {match_id} rejected: {reason}")]
    WriteRejected { match_id: MatchId, reason: String },

    #[error("document store lock was poisoned")]
    LockPoisoned,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted document at {path}: {reason}")]
    CorruptedDocument { path: String, reason: String },
}

impl BoardError for GatewayError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::WriteRejected { .. } => ErrorSeverity::Recoverable,
            Self::MatchNotFound(_) => ErrorSeverity::Fatal,
            Self::LockPoisoned | Self::Json(_) | Self::CorruptedDocument { .. } => {
                ErrorSeverity::Internal
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MatchNotFound(_) => "GATEWAY_MATCH_NOT_FOUND",
            Self::WriteRejected { .. } => "GATEWAY_WRITE_REJECTED",
            Self::LockPoisoned => "GATEWAY_LOCK_POISONED",
            Self::Json(_) => "GATEWAY_JSON",
            Self::CorruptedDocument { .. } => "GATEWAY_CORRUPTED_DOCUMENT",
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
