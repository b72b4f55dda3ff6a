//! Static description of a game: board geometry and the ordered piece list.
//!
//! A [`GameSpec`] is supplied from outside (see the `board-content` loaders),
//! never changes during a match, and is shared read-only between the engine,
//! the change detector and the runtime.
use std::collections::BTreeSet;
use std::fmt;

use crate::state::{PieceIndex, StateError};

/// Identifier of a game spec in the catalogue.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct GameSpecId(pub String);

impl GameSpecId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameSpecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Behavioural category of a piece.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::IntoStaticStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PieceKind {
    /// Plain token; always draggable.
    Standard,
    /// Cycles through its images when tapped.
    Toggable,
    /// Two-faced card with per-seat visibility.
    Card,
    /// Rolled by tapping; the roll is signalled through `z_depth`.
    Dice,
}

/// Reference to an image asset. The engine never loads it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageRef {
    pub id: String,
    pub download_url: String,
}

impl ImageRef {
    pub fn new(id: impl Into<String>, download_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            download_url: download_url.into(),
        }
    }
}

/// Starting position of a piece, in board percentage coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
}

impl Anchor {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Board geometry. Width and height are in image pixels; piece coordinates
/// are percentages of them.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoardSpec {
    pub width: u32,
    pub height: u32,
    pub image: ImageRef,
}

/// Static description of one piece.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PieceSpec {
    pub kind: PieceKind,
    pub images: Vec<ImageRef>,
    pub width: u32,
    pub height: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_draggable: bool,
    /// Index of the deck piece this card belongs to, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub deck_piece_index: Option<PieceIndex>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub anchor: Anchor,
}

impl PieceSpec {
    pub fn new(kind: PieceKind, images: Vec<ImageRef>) -> Self {
        Self {
            kind,
            images,
            width: 0,
            height: 0,
            is_draggable: false,
            deck_piece_index: None,
            anchor: Anchor::ORIGIN,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn draggable(mut self, is_draggable: bool) -> Self {
        self.is_draggable = is_draggable;
        self
    }

    pub fn in_deck(mut self, deck: PieceIndex) -> Self {
        self.deck_piece_index = Some(deck);
        self
    }

    /// Standard pieces can always be dragged, regardless of the flag.
    pub fn can_drag(&self) -> bool {
        self.is_draggable || self.kind == PieceKind::Standard
    }

    pub fn is_deck_member(&self) -> bool {
        self.deck_piece_index.is_some()
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }
}

/// Complete static description of a game.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameSpec {
    pub id: GameSpecId,
    pub board: BoardSpec,
    pub pieces: Vec<PieceSpec>,
}

impl GameSpec {
    pub fn new(id: GameSpecId, board: BoardSpec, pieces: Vec<PieceSpec>) -> Self {
        Self { id, board, pieces }
    }

    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    /// Every valid piece index, in order.
    pub fn indices(&self) -> impl Iterator<Item = PieceIndex> + '_ {
        (0..self.pieces.len()).map(PieceIndex::from_usize)
    }

    /// Looks up a piece, failing with `InvalidPieceIndex` outside the domain.
    pub fn piece(&self, index: PieceIndex) -> Result<&PieceSpec, StateError> {
        self.pieces
            .get(index.as_usize())
            .ok_or(StateError::InvalidPieceIndex {
                index,
                piece_count: self.pieces.len(),
            })
    }

    pub fn kind_of(&self, index: PieceIndex) -> Option<PieceKind> {
        self.pieces.get(index.as_usize()).map(|piece| piece.kind)
    }

    /// Pieces whose `deck_piece_index` points at `deck`, in index order.
    pub fn deck_members(&self, deck: PieceIndex) -> Vec<PieceIndex> {
        self.pieces
            .iter()
            .enumerate()
            .filter(|(_, piece)| piece.deck_piece_index == Some(deck))
            .map(|(index, _)| PieceIndex::from_usize(index))
            .collect()
    }

    /// Every deck referenced by at least one piece.
    pub fn decks(&self) -> BTreeSet<PieceIndex> {
        self.pieces
            .iter()
            .filter_map(|piece| piece.deck_piece_index)
            .collect()
    }

    /// Anchor a deck collapses onto when nothing better is known.
    pub fn deck_anchor(&self, deck: PieceIndex) -> Anchor {
        self.pieces
            .get(deck.as_usize())
            .map(|piece| piece.anchor)
            .unwrap_or(Anchor::ORIGIN)
    }
}
