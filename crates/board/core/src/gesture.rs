//! Touch gestures mapped onto mutations.
//!
//! A gesture is classified from where a touch started and where it ended.
//! What it does then depends on the kind of piece that was touched.
use crate::engine::Mutation;
use crate::spec::{GameSpec, PieceKind};
use crate::state::{PieceIndex, StateError};

/// Touch location in board percentage coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct TouchPoint {
    pub x: f64,
    pub y: f64,
}

impl TouchPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Classified touch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    Tap,
    /// Released at the given position.
    Drag { x: f64, y: f64 },
}

impl Gesture {
    /// Touches that end closer than this to where they began are taps.
    pub const TAP_THRESHOLD: f64 = 0.00001;

    pub fn classify(start: TouchPoint, end: TouchPoint) -> Self {
        if start.distance(&end) < Self::TAP_THRESHOLD {
            Self::Tap
        } else {
            Self::Drag { x: end.x, y: end.y }
        }
    }
}

/// What the client should do with a gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureOutcome {
    Mutate(Mutation),
    /// Open the reveal/hide/shuffle menu for a card. Nothing is written.
    CardOptions(PieceIndex),
    Ignored,
}

impl GestureOutcome {
    pub fn for_piece(
        spec: &GameSpec,
        index: PieceIndex,
        gesture: Gesture,
    ) -> Result<Self, StateError> {
        let piece = spec.piece(index)?;

        let outcome = match gesture {
            Gesture::Drag { x, y } if piece.can_drag() => {
                Self::Mutate(Mutation::DragTo { index, x, y })
            }
            Gesture::Drag { .. } => Self::Ignored,
            Gesture::Tap => match piece.kind {
                PieceKind::Toggable => Self::Mutate(Mutation::ToggleImage { index }),
                PieceKind::Dice => Self::Mutate(Mutation::RollDice { index }),
                PieceKind::Card => Self::CardOptions(index),
                PieceKind::Standard => Self::Ignored,
            },
        };
        Ok(outcome)
    }
}
