//! Deterministic initial-state generation.

use std::collections::BTreeMap;

use super::{CardVisibility, MatchState, PieceIndex, PieceState};
use crate::spec::GameSpec;

impl MatchState {
    /// Derives the first snapshot of a match from its spec.
    ///
    /// - Standalone pieces start at their own anchor with `z_depth` equal to
    ///   their index.
    /// - Deck members collapse onto the anchor of their deck piece, stacked in
    ///   index order above every standalone piece, hidden from everyone.
    ///
    /// The result only depends on the spec, so every participant that races
    /// to initialize an empty match writes the same values.
    pub fn initial(spec: &GameSpec) -> Self {
        let base_depth = spec.piece_count() as i64;
        let mut stack_heights: BTreeMap<PieceIndex, i64> = BTreeMap::new();

        spec.indices()
            .zip(&spec.pieces)
            .map(|(index, piece)| {
                let state = match piece.deck_piece_index {
                    Some(deck) => {
                        let anchor = spec.deck_anchor(deck);
                        let height = stack_heights.entry(deck).or_insert(0);
                        let z_depth = base_depth + *height;
                        *height += 1;
                        PieceState {
                            x: anchor.x,
                            y: anchor.y,
                            z_depth,
                            current_image_index: 0,
                            card_visibility: CardVisibility::hidden(),
                        }
                    }
                    None => PieceState::at(piece.anchor.x, piece.anchor.y, index.0 as i64),
                };
                (index, state)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{Anchor, BoardSpec, GameSpecId, PieceKind, PieceSpec};

    fn spec() -> GameSpec {
        GameSpec::new(
            GameSpecId::new("init"),
            BoardSpec::default(),
            vec![
                PieceSpec::new(PieceKind::Standard, vec![]).with_anchor(Anchor::new(50.0, 50.0)),
                PieceSpec::new(PieceKind::Card, vec![]).in_deck(PieceIndex(0)),
                PieceSpec::new(PieceKind::Card, vec![]).in_deck(PieceIndex(0)),
                PieceSpec::new(PieceKind::Dice, vec![]).with_anchor(Anchor::new(5.0, 95.0)),
            ],
        )
    }

    #[test]
    fn domain_matches_piece_list() {
        let spec = spec();
        let state = MatchState::initial(&spec);

        assert!(state.is_initialized_for(&spec));
        assert_eq!(
            state.indices().collect::<Vec<_>>(),
            (0..4).map(PieceIndex).collect::<Vec<_>>()
        );
    }

    #[test]
    fn empty_spec_yields_empty_state() {
        let state = MatchState::initial(&GameSpec::default());
        assert!(state.is_empty());
    }

    #[test]
    fn deck_members_collapse_hidden_onto_deck_anchor() {
        let state = MatchState::initial(&spec());

        for index in [PieceIndex(1), PieceIndex(2)] {
            let card = state.get(index).unwrap();
            assert_eq!((card.x, card.y), (50.0, 50.0));
            assert!(card.card_visibility.is_hidden_from_all());
        }
        let lower = state.get(PieceIndex(1)).unwrap().z_depth;
        let upper = state.get(PieceIndex(2)).unwrap().z_depth;
        assert!(upper > lower);
        assert!(lower > state.get(PieceIndex(3)).unwrap().z_depth);
    }

    #[test]
    fn generation_is_deterministic() {
        assert_eq!(MatchState::initial(&spec()), MatchState::initial(&spec()));
    }
}
