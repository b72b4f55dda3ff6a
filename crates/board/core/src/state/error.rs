//! State mutation errors.
//!
//! Raised synchronously by the mutation engine before anything is written, so
//! a failing operation leaves the working snapshot untouched.

use crate::error::{BoardError, ErrorSeverity};
use crate::spec::PieceKind;
use crate::state::PieceIndex;

/// Errors that occur while validating or applying a mutation.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum StateError {
    /// Operation targets an index outside the spec's piece list.
    #[error("piece index {index} is out of range (piece count: {piece_count})")]
    InvalidPieceIndex {
        index: PieceIndex,
        piece_count: usize,
    },

    /// Operation is not meaningful for the piece's kind.
    ///
    /// Only raised when kind validation is enabled in `BoardConfig`.
    #[error("{operation} is not supported on {kind} piece {index}")]
    UnsupportedOperationForKind {
        index: PieceIndex,
        kind: PieceKind,
        operation: &'static str,
    },

    /// Move or drag to a NaN or infinite coordinate. The store cannot
    /// represent such values.
    #[error("piece {index} cannot move to non-finite coordinates ({x}, {y})")]
    NonFiniteCoordinate { index: PieceIndex, x: f64, y: f64 },

    /// Shuffle requested for a deck with no member cards.
    #[error("deck {deck} has no member pieces")]
    EmptyDeck { deck: PieceIndex },

    /// Spec lists a piece the working snapshot has no state for.
    #[error("piece {index} has no state; the match is not initialized")]
    MissingPieceState { index: PieceIndex },
}

impl BoardError for StateError {
    fn severity(&self) -> ErrorSeverity {
        use StateError::*;
        match self {
            InvalidPieceIndex { .. }
            | UnsupportedOperationForKind { .. }
            | NonFiniteCoordinate { .. }
            | EmptyDeck { .. } => ErrorSeverity::Validation,
            MissingPieceState { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use StateError::*;
        match self {
            InvalidPieceIndex { .. } => "STATE_INVALID_PIECE_INDEX",
            UnsupportedOperationForKind { .. } => "STATE_UNSUPPORTED_OPERATION_FOR_KIND",
            NonFiniteCoordinate { .. } => "STATE_NON_FINITE_COORDINATE",
            EmptyDeck { .. } => "STATE_EMPTY_DECK",
            MissingPieceState { .. } => "STATE_MISSING_PIECE_STATE",
        }
    }
}
