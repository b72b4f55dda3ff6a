//! Authoritative match state representation.
//!
//! This module owns the per-piece records, the initial-state generator and
//! the change detector. The runtime clones or diffs [`MatchState`] snapshots
//! but only ever rewrites them through the mutation engine.
pub mod delta;

mod error;
mod init;
mod types;
mod view;

use std::collections::BTreeMap;

pub use delta::{Animation, AnimationEvent, PieceChanges, PieceFields, detect};
pub use error::StateError;
pub use types::{CardVisibility, PieceIndex, PieceState, SeatIndex};
pub use view::PieceView;

use crate::spec::GameSpec;

/// Snapshot of every piece's state in one match, keyed by piece index.
///
/// Empty until the first participant initializes the match; afterwards its
/// domain equals the spec's piece indices.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct MatchState {
    pieces: BTreeMap<PieceIndex, PieceState>,
}

impl MatchState {
    /// Uninitialized state with no pieces.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn get(&self, index: PieceIndex) -> Option<&PieceState> {
        self.pieces.get(&index)
    }

    pub(crate) fn get_mut(&mut self, index: PieceIndex) -> Option<&mut PieceState> {
        self.pieces.get_mut(&index)
    }

    pub fn contains(&self, index: PieceIndex) -> bool {
        self.pieces.contains_key(&index)
    }

    /// Replaces one piece's record wholesale.
    pub fn insert(&mut self, index: PieceIndex, piece: PieceState) -> Option<PieceState> {
        self.pieces.insert(index, piece)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PieceIndex, &PieceState)> + '_ {
        self.pieces.iter().map(|(index, piece)| (*index, piece))
    }

    pub fn indices(&self) -> impl Iterator<Item = PieceIndex> + '_ {
        self.pieces.keys().copied()
    }

    /// A `z_depth` above every value currently in the state.
    ///
    /// Equivalent to `stack_base(1)`.
    pub fn next_z_depth(&self) -> i64 {
        self.stack_base(1)
    }

    /// First depth of a run of `height` consecutive depths placed above
    /// every piece. When the run does not fit below `i64::MAX` it goes below
    /// the lowest piece instead; when neither fits it wraps past the top.
    pub fn stack_base(&self, height: usize) -> i64 {
        let Some((min, max)) = self.depth_range() else {
            return 0;
        };
        let span = i64::try_from(height.saturating_sub(1)).unwrap_or(i64::MAX);

        max.checked_add(1)
            .filter(|base| base.checked_add(span).is_some())
            .or_else(|| min.checked_sub(1).and_then(|top| top.checked_sub(span)))
            .unwrap_or_else(|| max.wrapping_add(1))
    }

    fn depth_range(&self) -> Option<(i64, i64)> {
        let mut depths = self.pieces.values().map(|piece| piece.z_depth);
        let first = depths.next()?;
        Some(depths.fold((first, first), |(min, max), z| (min.min(z), max.max(z))))
    }

    /// True when the domain is exactly the spec's piece indices.
    pub fn is_initialized_for(&self, spec: &GameSpec) -> bool {
        self.pieces.len() == spec.piece_count()
            && spec.indices().all(|index| self.pieces.contains_key(&index))
    }

    /// Copies the listed pieces (when present) into a new, partial snapshot.
    pub fn subset(&self, indices: &[PieceIndex]) -> Self {
        Self {
            pieces: indices
                .iter()
                .filter_map(|index| self.pieces.get(index).map(|piece| (*index, piece.clone())))
                .collect(),
        }
    }
}

impl FromIterator<(PieceIndex, PieceState)> for MatchState {
    fn from_iter<I: IntoIterator<Item = (PieceIndex, PieceState)>>(iter: I) -> Self {
        Self {
            pieces: iter.into_iter().collect(),
        }
    }
}
