//! What one seat should draw for a piece.

use super::{MatchState, PieceIndex, SeatIndex, StateError};
use crate::config::BoardConfig;
use crate::spec::{GameSpec, PieceKind};

/// Render-facing projection of a piece for a single seat.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PieceView {
    pub index: PieceIndex,
    pub x: f64,
    pub y: f64,
    /// Index into the piece's image list.
    pub image_index: u32,
    /// Stacking layer; visible cards are lifted above everything else.
    pub layer: u32,
    pub draggable: bool,
}

impl PieceView {
    /// Cards show their face (image 0) only to seats that can see them and
    /// their back (image 1) otherwise; every other kind shows its current image.
    pub fn resolve(
        spec: &GameSpec,
        state: &MatchState,
        index: PieceIndex,
        seat: SeatIndex,
    ) -> Result<Self, StateError> {
        let piece = spec.piece(index)?;
        let current = state
            .get(index)
            .ok_or(StateError::MissingPieceState { index })?;

        let visible = current.is_visible_to(seat);
        let image_index = match piece.kind {
            PieceKind::Card if visible => 0,
            PieceKind::Card => 1,
            _ => current.current_image_index,
        };
        let layer = if piece.kind == PieceKind::Card && visible {
            BoardConfig::VISIBLE_CARD_LAYER
        } else {
            BoardConfig::DEFAULT_LAYER
        };

        Ok(Self {
            index,
            x: current.x,
            y: current.y,
            image_index,
            layer,
            draggable: piece.can_drag(),
        })
    }

    /// Views for every piece of an initialized state, in index order.
    pub fn resolve_all(
        spec: &GameSpec,
        state: &MatchState,
        seat: SeatIndex,
    ) -> Result<Vec<Self>, StateError> {
        spec.indices()
            .map(|index| Self::resolve(spec, state, index, seat))
            .collect()
    }

    /// Pixel position on a board scaled so its width fills `viewport_width`.
    pub fn to_pixels(&self, spec: &GameSpec, viewport_width: f64) -> (f64, f64) {
        let board_width = f64::from(spec.board.width.max(1));
        let ratio = viewport_width / board_width;
        (
            self.x / 100.0 * board_width * ratio,
            self.y / 100.0 * f64::from(spec.board.height) * ratio,
        )
    }
}
