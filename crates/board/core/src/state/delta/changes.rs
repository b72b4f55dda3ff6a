use crate::state::{PieceIndex, PieceState, SeatIndex};

use super::bitmask::PieceFields;

/// Metadata describing which fields of one piece changed.
///
/// Stores only the index and a bitmask; values are read back from the
/// before/after snapshots when an animation needs them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PieceChanges {
    pub index: PieceIndex,
    pub fields: PieceFields,
}

impl PieceChanges {
    /// Compares two records of the same piece from `seat`'s point of view.
    ///
    /// Returns `None` if nothing observable changed.
    pub fn from_states(
        index: PieceIndex,
        before: &PieceState,
        after: &PieceState,
        seat: SeatIndex,
    ) -> Option<Self> {
        let mut fields = PieceFields::empty();

        if !before.same_position(after) {
            fields |= PieceFields::POSITION;
        }
        if before.is_visible_to(seat) != after.is_visible_to(seat) {
            fields |= PieceFields::SELF_VISIBILITY;
        }
        if before.current_image_index != after.current_image_index {
            fields |= PieceFields::IMAGE;
        }
        if before.z_depth != after.z_depth {
            fields |= PieceFields::Z_DEPTH;
        }

        if fields.is_empty() {
            None
        } else {
            Some(Self { index, fields })
        }
    }
}
