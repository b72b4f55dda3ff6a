//! Seat assignment for match participants.
//!
//! The participant list is append-only: a user's seat is its position in the
//! list at join time and never changes afterwards.
use std::fmt;

use crate::error::{BoardError, ErrorSeverity};
use crate::state::{PieceState, SeatIndex};

/// Identity of a user, as issued by the authentication layer.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors raised while resolving seats.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParticipantError {
    #[error("user {user} is not a participant of this match")]
    NotAParticipant { user: UserId },
}

impl BoardError for ParticipantError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotAParticipant { .. } => "PARTICIPANT_NOT_A_PARTICIPANT",
        }
    }
}

/// Ordered participant list of a match.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Participants {
    users: Vec<UserId>,
}

impl Participants {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from users already ordered by seat.
    pub fn from_ordered(users: impl IntoIterator<Item = UserId>) -> Self {
        let mut participants = Self::new();
        for user in users {
            participants.join(user);
        }
        participants
    }

    /// Seat of `user`, failing with `NotAParticipant` when absent.
    pub fn seat_of(&self, user: &UserId) -> Result<SeatIndex, ParticipantError> {
        self.users
            .iter()
            .position(|candidate| candidate == user)
            .map(|seat| SeatIndex(seat as u32))
            .ok_or_else(|| ParticipantError::NotAParticipant { user: user.clone() })
    }

    /// Appends `user` and returns its seat. Joining twice returns the
    /// existing seat.
    pub fn join(&mut self, user: UserId) -> SeatIndex {
        if let Ok(seat) = self.seat_of(&user) {
            return seat;
        }
        self.users.push(user);
        SeatIndex((self.users.len() - 1) as u32)
    }

    pub fn user_at(&self, seat: SeatIndex) -> Option<&UserId> {
        self.users.get(seat.as_usize())
    }

    pub fn seats(&self) -> impl Iterator<Item = SeatIndex> + '_ {
        (0..self.users.len()).map(|seat| SeatIndex(seat as u32))
    }

    pub fn users(&self) -> &[UserId] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Whether `user` may see `piece`'s face.
    pub fn can_see(&self, user: &UserId, piece: &PieceState) -> Result<bool, ParticipantError> {
        Ok(piece.is_visible_to(self.seat_of(user)?))
    }
}
