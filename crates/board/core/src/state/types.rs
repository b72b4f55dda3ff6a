use std::collections::BTreeMap;
use std::fmt;

/// Position of a piece in the spec's piece list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PieceIndex(pub u32);

impl PieceIndex {
    #[inline]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn from_usize(index: usize) -> Self {
        Self(index as u32)
    }
}

impl fmt::Display for PieceIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable position of a participant in the match's participant list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SeatIndex(pub u32);

impl SeatIndex {
    pub const FIRST: Self = Self(0);

    #[inline]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SeatIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seat {}", self.0)
    }
}

/// Per-seat card visibility. A seat without an entry cannot see the card.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CardVisibility(BTreeMap<SeatIndex, bool>);

impl CardVisibility {
    /// Visibility with no entries: hidden from everyone.
    pub fn hidden() -> Self {
        Self(BTreeMap::new())
    }

    /// Explicit `false` for every seat in `0..seat_count`.
    pub fn hidden_from(seat_count: usize) -> Self {
        Self::uniform(seat_count, false)
    }

    /// Same flag for every seat in `0..seat_count`.
    pub fn uniform(seat_count: usize, visible: bool) -> Self {
        Self(
            (0..seat_count)
                .map(|seat| (SeatIndex(seat as u32), visible))
                .collect(),
        )
    }

    #[inline]
    pub fn is_visible_to(&self, seat: SeatIndex) -> bool {
        self.0.get(&seat).copied().unwrap_or(false)
    }

    pub fn set(&mut self, seat: SeatIndex, visible: bool) {
        self.0.insert(seat, visible);
    }

    /// Raw entry for a seat; `None` when the seat was never written.
    pub fn entry(&self, seat: SeatIndex) -> Option<bool> {
        self.0.get(&seat).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SeatIndex, bool)> + '_ {
        self.0.iter().map(|(seat, visible)| (*seat, *visible))
    }

    /// True when no seat can see the card.
    pub fn is_hidden_from_all(&self) -> bool {
        self.0.values().all(|visible| !visible)
    }
}

impl FromIterator<(SeatIndex, bool)> for CardVisibility {
    fn from_iter<I: IntoIterator<Item = (SeatIndex, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Mutable per-piece record mirrored through the sync gateway.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PieceState {
    /// Horizontal position in percent of the board width.
    pub x: f64,
    /// Vertical position in percent of the board height.
    pub y: f64,
    /// Change signal only; see the `roll_dice` and `shuffle_deck` mutations.
    pub z_depth: i64,
    pub current_image_index: u32,
    pub card_visibility: CardVisibility,
}

impl PieceState {
    pub fn at(x: f64, y: f64, z_depth: i64) -> Self {
        Self {
            x,
            y,
            z_depth,
            current_image_index: 0,
            card_visibility: CardVisibility::hidden(),
        }
    }

    #[inline]
    pub fn is_visible_to(&self, seat: SeatIndex) -> bool {
        self.card_visibility.is_visible_to(seat)
    }

    #[inline]
    pub fn same_position(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_seat_reads_as_hidden() {
        let mut visibility = CardVisibility::hidden();
        visibility.set(SeatIndex(0), true);

        assert!(visibility.is_visible_to(SeatIndex(0)));
        assert!(!visibility.is_visible_to(SeatIndex(1)));
        assert_eq!(visibility.entry(SeatIndex(1)), None);
    }

    #[test]
    fn uniform_visibility_covers_every_seat() {
        let visibility = CardVisibility::uniform(3, true);
        assert_eq!(visibility.iter().count(), 3);
        assert!(visibility.iter().all(|(_, visible)| visible));
        assert!(CardVisibility::hidden_from(3).is_hidden_from_all());
    }
}
