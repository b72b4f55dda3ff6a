use crate::spec::GameSpec;
use crate::state::PieceIndex;

/// A single user-initiated change to the match state.
///
/// Mutations are plain data so they can be logged, queued, or sent over a
/// wire before being applied with [`MutationEngine::apply`](super::MutationEngine::apply).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "op", rename_all = "snake_case"))]
pub enum Mutation {
    MoveTo { index: PieceIndex, x: f64, y: f64 },
    DragTo { index: PieceIndex, x: f64, y: f64 },
    ToggleImage { index: PieceIndex },
    RollDice { index: PieceIndex },
    ShowMe { index: PieceIndex },
    ShowEveryone { index: PieceIndex },
    HideFromEveryone { index: PieceIndex },
    ShuffleDeck { deck: PieceIndex },
}

impl Mutation {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::MoveTo { .. } => "move_to",
            Self::DragTo { .. } => "drag_to",
            Self::ToggleImage { .. } => "toggle_image",
            Self::RollDice { .. } => "roll_dice",
            Self::ShowMe { .. } => "show_me",
            Self::ShowEveryone { .. } => "show_everyone",
            Self::HideFromEveryone { .. } => "hide_from_everyone",
            Self::ShuffleDeck { .. } => "shuffle_deck",
        }
    }

    /// Pieces whose records this mutation rewrites.
    ///
    /// A shuffle touches every member of the deck; everything else touches
    /// exactly one piece.
    pub fn affected(&self, spec: &GameSpec) -> Vec<PieceIndex> {
        match *self {
            Self::ShuffleDeck { deck } => spec.deck_members(deck),
            Self::MoveTo { index, .. }
            | Self::DragTo { index, .. }
            | Self::ToggleImage { index }
            | Self::RollDice { index }
            | Self::ShowMe { index }
            | Self::ShowEveryone { index }
            | Self::HideFromEveryone { index } => vec![index],
        }
    }
}
