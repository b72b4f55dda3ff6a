//! Change detection between two match snapshots.
//!
//! Detection runs in two steps: field-level metadata is gathered per piece as
//! a [`PieceFields`] bitmask, then a single [`Animation`] is chosen from the
//! bitmask and the piece kind. Only indices present in both snapshots are
//! compared, so a freshly initialized state produces no events.
mod bitmask;
mod changes;

pub use bitmask::PieceFields;
pub use changes::PieceChanges;

use crate::spec::{GameSpec, PieceKind};
use crate::state::{MatchState, PieceIndex, PieceState, SeatIndex};

/// Visual transition a piece should play.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Animation {
    /// Slide to the new percentage coordinates.
    Position { x: f64, y: f64 },
    /// Card turned over for the observing seat, or toggable switched image.
    Flip,
    /// Dice rolled.
    Roll,
}

/// Animation decision for a single piece.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationEvent {
    pub index: PieceIndex,
    pub animation: Animation,
}

impl AnimationEvent {
    pub fn new(index: PieceIndex, animation: Animation) -> Self {
        Self { index, animation }
    }
}

/// Field-level changes for every piece present in both snapshots.
pub fn changes(previous: &MatchState, next: &MatchState, seat: SeatIndex) -> Vec<PieceChanges> {
    next.iter()
        .filter_map(|(index, after)| {
            let before = previous.get(index)?;
            PieceChanges::from_states(index, before, after, seat)
        })
        .collect()
}

/// Compares two snapshots and returns at most one animation per piece.
///
/// Priority, first match wins:
/// 1. position changed → [`Animation::Position`]
/// 2. card whose visibility to `seat` changed → [`Animation::Flip`]
/// 3. toggable whose image changed → [`Animation::Flip`]
/// 4. dice whose `z_depth` changed → [`Animation::Roll`]
///
/// Must be called once per received transition; calling it again on the same
/// pair repeats the animations.
pub fn detect(
    previous: &MatchState,
    next: &MatchState,
    spec: &GameSpec,
    seat: SeatIndex,
) -> Vec<AnimationEvent> {
    changes(previous, next, seat)
        .into_iter()
        .filter_map(|change| {
            let after = next.get(change.index)?;
            decide(spec.kind_of(change.index), change.fields, after)
                .map(|animation| AnimationEvent::new(change.index, animation))
        })
        .collect()
}

fn decide(kind: Option<PieceKind>, fields: PieceFields, after: &PieceState) -> Option<Animation> {
    if fields.contains(PieceFields::POSITION) {
        return Some(Animation::Position {
            x: after.x,
            y: after.y,
        });
    }

    match kind? {
        PieceKind::Card if fields.contains(PieceFields::SELF_VISIBILITY) => Some(Animation::Flip),
        PieceKind::Toggable if fields.contains(PieceFields::IMAGE) => Some(Animation::Flip),
        PieceKind::Dice if fields.contains(PieceFields::Z_DEPTH) => Some(Animation::Roll),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{BoardSpec, GameSpecId, ImageRef, PieceSpec};

    fn spec() -> GameSpec {
        let images = || vec![ImageRef::new("a", "a.png"), ImageRef::new("b", "b.png")];
        GameSpec::new(
            GameSpecId::new("delta"),
            BoardSpec::default(),
            vec![
                PieceSpec::new(PieceKind::Card, images()),
                PieceSpec::new(PieceKind::Dice, images()),
                PieceSpec::new(PieceKind::Toggable, images()),
                PieceSpec::new(PieceKind::Standard, images()),
            ],
        )
    }

    fn edit(state: &MatchState, index: u32, f: impl FnOnce(&mut PieceState)) -> MatchState {
        let mut next = state.clone();
        let mut piece = next.get(PieceIndex(index)).unwrap().clone();
        f(&mut piece);
        next.insert(PieceIndex(index), piece);
        next
    }

    #[test]
    fn identical_states_produce_nothing() {
        let state = MatchState::initial(&spec());
        assert!(detect(&state, &state, &spec(), SeatIndex(0)).is_empty());
    }

    #[test]
    fn empty_previous_is_skipped() {
        let state = MatchState::initial(&spec());
        assert!(detect(&MatchState::empty(), &state, &spec(), SeatIndex(0)).is_empty());
    }

    #[test]
    fn extreme_values_are_compared_exactly() {
        let spec = spec();
        let mut before = MatchState::initial(&spec);
        before = edit(&before, 1, |dice| dice.z_depth = i64::MAX);
        before = edit(&before, 2, |lamp| lamp.current_image_index = u32::MAX);
        assert!(detect(&before, &before, &spec, SeatIndex(0)).is_empty());

        let after = edit(&before, 1, |dice| dice.z_depth = i64::MIN);
        let after = edit(&after, 2, |lamp| lamp.current_image_index = 0);
        assert_eq!(
            detect(&before, &after, &spec, SeatIndex(0)),
            vec![
                AnimationEvent::new(PieceIndex(1), Animation::Roll),
                AnimationEvent::new(PieceIndex(2), Animation::Flip),
            ]
        );
    }

    #[test]
    fn position_wins_over_kind_specific_changes() {
        let before = MatchState::initial(&spec());
        let after = edit(&before, 1, |dice| {
            dice.x = 30.0;
            dice.z_depth += 10;
        });

        assert_eq!(
            detect(&before, &after, &spec(), SeatIndex(0)),
            vec![AnimationEvent::new(
                PieceIndex(1),
                Animation::Position { x: 30.0, y: 0.0 }
            )]
        );
    }

    #[test]
    fn card_flip_only_for_observing_seat() {
        let before = MatchState::initial(&spec());
        let after = edit(&before, 0, |card| card.card_visibility.set(SeatIndex(1), true));

        assert!(detect(&before, &after, &spec(), SeatIndex(0)).is_empty());
        assert_eq!(
            detect(&before, &after, &spec(), SeatIndex(1)),
            vec![AnimationEvent::new(PieceIndex(0), Animation::Flip)]
        );
    }

    #[test]
    fn explicit_false_equals_absent_entry() {
        let before = MatchState::initial(&spec());
        let after = edit(&before, 0, |card| card.card_visibility.set(SeatIndex(0), false));
        assert!(detect(&before, &after, &spec(), SeatIndex(0)).is_empty());
    }

    #[test]
    fn kind_specific_rules() {
        let before = MatchState::initial(&spec());
        let toggled = edit(&before, 2, |piece| piece.current_image_index = 1);
        let rolled = edit(&before, 1, |dice| dice.z_depth += 1);
        // Image changes on a card and depth changes on a token are ignored.
        let ignored = edit(&edit(&before, 0, |card| card.current_image_index = 1), 3, |token| {
            token.z_depth += 1
        });

        assert_eq!(
            detect(&before, &toggled, &spec(), SeatIndex(0)),
            vec![AnimationEvent::new(PieceIndex(2), Animation::Flip)]
        );
        assert_eq!(
            detect(&before, &rolled, &spec(), SeatIndex(0)),
            vec![AnimationEvent::new(PieceIndex(1), Animation::Roll)]
        );
        assert!(detect(&before, &ignored, &spec(), SeatIndex(0)).is_empty());
    }

    #[test]
    fn pieces_outside_spec_only_animate_position() {
        let mut before = MatchState::initial(&spec());
        before.insert(PieceIndex(9), PieceState::at(0.0, 0.0, 0));
        let rolled = edit(&before, 9, |piece| piece.z_depth = 5);
        let moved = edit(&before, 9, |piece| piece.y = 12.0);

        assert!(detect(&before, &rolled, &spec(), SeatIndex(0)).is_empty());
        assert_eq!(detect(&before, &moved, &spec(), SeatIndex(0)).len(), 1);
    }

    #[test]
    fn events_follow_index_order() {
        let before = MatchState::initial(&spec());
        let after = edit(&edit(&before, 3, |token| token.x = 1.0), 1, |dice| dice.z_depth += 1);
        let indices: Vec<_> = detect(&before, &after, &spec(), SeatIndex(0))
            .into_iter()
            .map(|event| event.index)
            .collect();
        assert_eq!(indices, vec![PieceIndex(1), PieceIndex(3)]);
    }

    #[test]
    fn changes_record_every_field() {
        let before = MatchState::initial(&spec());
        let after = edit(&before, 0, |card| {
            card.x = 2.0;
            card.card_visibility.set(SeatIndex(0), true);
            card.current_image_index = 1;
            card.z_depth += 3;
        });

        let recorded = changes(&before, &after, SeatIndex(0));
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].fields, PieceFields::all());
    }
}
