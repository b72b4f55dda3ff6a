//! Mutation pipeline for match state.
//!
//! The [`MutationEngine`] is the only writer of [`MatchState`]. It borrows a
//! *working* snapshot, never the previous snapshot a caller keeps for change
//! detection, and rewrites it in place. Every operation validates before it
//! writes, so a failed call leaves the snapshot exactly as it was.

mod mutation;

pub use mutation::Mutation;

use crate::config::BoardConfig;
use crate::rng::{PcgRng, RngOracle, compute_seed};
use crate::spec::{GameSpec, PieceKind, PieceSpec};
use crate::state::{CardVisibility, MatchState, PieceIndex, PieceState, SeatIndex, StateError};

/// Who is acting and how many seats the match has.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Seating {
    pub self_seat: SeatIndex,
    pub seat_count: usize,
}

impl Seating {
    pub fn new(self_seat: SeatIndex, seat_count: usize) -> Self {
        Self {
            self_seat,
            seat_count,
        }
    }

    pub fn seats(&self) -> impl Iterator<Item = SeatIndex> {
        (0..self.seat_count).map(|seat| SeatIndex(seat as u32))
    }
}

/// Applies mutations to a working snapshot.
pub struct MutationEngine<'a> {
    state: &'a mut MatchState,
    spec: &'a GameSpec,
    seating: Seating,
    config: BoardConfig,
    entropy: u64,
    rng: PcgRng,
}

impl<'a> MutationEngine<'a> {
    /// Creates an engine over `state` with default configuration and zero entropy.
    pub fn new(state: &'a mut MatchState, spec: &'a GameSpec, seating: Seating) -> Self {
        Self {
            state,
            spec,
            seating,
            config: BoardConfig::default(),
            entropy: 0,
            rng: PcgRng,
        }
    }

    pub fn with_config(mut self, config: &BoardConfig) -> Self {
        self.config = config.clone();
        self
    }

    /// Randomness consumed by shuffles. Same entropy, same permutation.
    pub fn with_entropy(mut self, entropy: u64) -> Self {
        self.entropy = entropy;
        self
    }

    /// Routes a [`Mutation`] to the matching operation.
    pub fn apply(&mut self, mutation: &Mutation) -> Result<(), StateError> {
        match *mutation {
            Mutation::MoveTo { index, x, y } => self.move_to(index, x, y),
            Mutation::DragTo { index, x, y } => self.drag_to(index, x, y),
            Mutation::ToggleImage { index } => self.toggle_image(index),
            Mutation::RollDice { index } => self.roll_dice(index),
            Mutation::ShowMe { index } => self.show_me(index),
            Mutation::ShowEveryone { index } => self.show_everyone(index),
            Mutation::HideFromEveryone { index } => self.hide_from_everyone(index),
            Mutation::ShuffleDeck { deck } => self.shuffle_deck(deck),
        }
    }

    /// Places a piece programmatically. Coordinates are only clamped when the
    /// configuration asks for it; NaN and infinities are always rejected.
    pub fn move_to(&mut self, index: PieceIndex, x: f64, y: f64) -> Result<(), StateError> {
        self.target(index)?;
        if !(x.is_finite() && y.is_finite()) {
            return Err(StateError::NonFiniteCoordinate { index, x, y });
        }
        let (x, y) = (self.config.coordinate(x), self.config.coordinate(y));
        let piece = self.piece_mut(index)?;
        piece.x = x;
        piece.y = y;
        Ok(())
    }

    /// Completes a drag. Same effect as [`move_to`](Self::move_to).
    pub fn drag_to(&mut self, index: PieceIndex, x: f64, y: f64) -> Result<(), StateError> {
        self.move_to(index, x, y)
    }

    /// Advances to the next image, wrapping around.
    pub fn toggle_image(&mut self, index: PieceIndex) -> Result<(), StateError> {
        let piece_spec = self.target(index)?;
        self.require_kind(index, piece_spec, PieceKind::Toggable, "toggle_image")?;
        let image_count = piece_spec.image_count() as u32;

        let piece = self.piece_mut(index)?;
        piece.current_image_index = piece
            .current_image_index
            .checked_rem(image_count)
            .map_or(0, |current| (current + 1) % image_count);
        Ok(())
    }

    /// Signals a roll by moving `z_depth` above every other piece. The new
    /// depth always differs from the old one.
    pub fn roll_dice(&mut self, index: PieceIndex) -> Result<(), StateError> {
        let piece_spec = self.target(index)?;
        self.require_kind(index, piece_spec, PieceKind::Dice, "roll_dice")?;

        let next = self.state.next_z_depth();
        let piece = self.piece_mut(index)?;
        piece.z_depth = if next == piece.z_depth {
            next.wrapping_add(1)
        } else {
            next
        };
        Ok(())
    }

    pub fn show_me(&mut self, index: PieceIndex) -> Result<(), StateError> {
        self.target(index)?;
        let seat = self.seating.self_seat;
        self.piece_mut(index)?.card_visibility.set(seat, true);
        Ok(())
    }

    pub fn show_everyone(&mut self, index: PieceIndex) -> Result<(), StateError> {
        self.set_visibility_for_all(index, true)
    }

    pub fn hide_from_everyone(&mut self, index: PieceIndex) -> Result<(), StateError> {
        self.set_visibility_for_all(index, false)
    }

    /// Collapses every card of `deck` onto the deck anchor, restacks them in a
    /// uniformly random order and hides them from every seat.
    ///
    /// The anchor is the deck piece's current position, or its spec anchor
    /// when the deck piece has no state.
    pub fn shuffle_deck(&mut self, deck: PieceIndex) -> Result<(), StateError> {
        let members = self.spec.deck_members(deck);
        if members.is_empty() {
            return Err(StateError::EmptyDeck { deck });
        }
        if let Some(&index) = members.iter().find(|index| !self.state.contains(**index)) {
            return Err(StateError::MissingPieceState { index });
        }

        let (x, y) = match self.state.get(deck) {
            Some(deck_state) => (deck_state.x, deck_state.y),
            None => {
                let anchor = self.spec.deck_anchor(deck);
                (anchor.x, anchor.y)
            }
        };
        let base_depth = self.state.stack_base(members.len());
        let order = self.permutation(deck, members);
        let hidden = CardVisibility::hidden_from(self.seating.seat_count);

        for (rank, index) in order.into_iter().enumerate() {
            let piece = self.piece_mut(index)?;
            piece.x = x;
            piece.y = y;
            piece.z_depth = base_depth.wrapping_add(rank as i64);
            piece.card_visibility = hidden.clone();
        }

        self.entropy = compute_seed(self.entropy, deck.0, u32::MAX);
        Ok(())
    }

    /// Fisher–Yates over the deterministic oracle.
    fn permutation(&self, deck: PieceIndex, mut members: Vec<PieceIndex>) -> Vec<PieceIndex> {
        for i in (1..members.len()).rev() {
            let seed = compute_seed(self.entropy, deck.0, i as u32);
            let j = self.rng.below(seed, (i + 1) as u32) as usize;
            members.swap(i, j);
        }
        members
    }

    fn set_visibility_for_all(&mut self, index: PieceIndex, visible: bool) -> Result<(), StateError> {
        self.target(index)?;
        let visibility = CardVisibility::uniform(self.seating.seat_count, visible);
        self.piece_mut(index)?.card_visibility = visibility;
        Ok(())
    }

    /// Validates the index against the spec and the working snapshot.
    fn target(&self, index: PieceIndex) -> Result<&'a PieceSpec, StateError> {
        let spec: &'a GameSpec = self.spec;
        let piece = spec.piece(index)?;
        if !self.state.contains(index) {
            return Err(StateError::MissingPieceState { index });
        }
        Ok(piece)
    }

    fn require_kind(
        &self,
        index: PieceIndex,
        piece: &PieceSpec,
        expected: PieceKind,
        operation: &'static str,
    ) -> Result<(), StateError> {
        if self.config.validate_kinds && piece.kind != expected {
            return Err(StateError::UnsupportedOperationForKind {
                index,
                kind: piece.kind,
                operation,
            });
        }
        Ok(())
    }

    fn piece_mut(&mut self, index: PieceIndex) -> Result<&mut PieceState, StateError> {
        self.state
            .get_mut(index)
            .ok_or(StateError::MissingPieceState { index })
    }
}
