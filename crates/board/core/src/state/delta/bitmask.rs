use bitflags::bitflags;

bitflags! {
    /// Tracks which fields of a [`PieceState`](crate::state::PieceState)
    /// changed between two snapshots, as seen from one seat.
    ///
    /// `SELF_VISIBILITY` only reflects the observing seat's entry; visibility
    /// changes for other seats are not recorded.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct PieceFields: u8 {
        const POSITION        = 1 << 0;
        const SELF_VISIBILITY = 1 << 1;
        const IMAGE           = 1 << 2;
        const Z_DEPTH         = 1 << 3;
    }
}
