//! Document layout of the shared store.
//!
//! ```text
//! matches/{matchId}                                  MatchDocument
//! matches/{matchId}/participants/{userId}            ParticipantDocument
//! matches/{matchId}/pieces/{pieceIndex}/currentState PieceDocument
//! ```
//!
//! Field names are camelCase on the wire. Timestamps are milliseconds since
//! the Unix epoch.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use board_core::{CardVisibility, GameSpecId, PieceIndex, PieceState, SeatIndex, UserId};

use super::error::{GatewayError, Result};
use crate::types::MatchId;

/// Rotation written with every piece record. Readers ignore it.
pub const ROTATION_DEGREES: f64 = 360.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDocument {
    pub game_spec_id: GameSpecId,
    pub created_on: i64,
    pub last_updated_on: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDocument {
    pub seat_index: SeatIndex,
    pub join_timestamp: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PieceDocument {
    pub x: f64,
    pub y: f64,
    pub z_depth: i64,
    pub current_image_index: u32,
    /// The store drops empty maps, so an absent field means hidden from all.
    #[serde(default)]
    pub card_visibility: CardVisibility,
    #[serde(default = "default_rotation")]
    pub rotation_degrees: f64,
}

fn default_rotation() -> f64 {
    ROTATION_DEGREES
}

impl From<&PieceState> for PieceDocument {
    fn from(piece: &PieceState) -> Self {
        Self {
            x: piece.x,
            y: piece.y,
            z_depth: piece.z_depth,
            current_image_index: piece.current_image_index,
            card_visibility: piece.card_visibility.clone(),
            rotation_degrees: ROTATION_DEGREES,
        }
    }
}

impl PieceDocument {
    /// JSON has no NaN or infinity; such coordinates would be stored as null
    /// and make the whole match unreadable.
    pub fn is_representable(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.rotation_degrees.is_finite()
    }
}

impl From<PieceDocument> for PieceState {
    fn from(doc: PieceDocument) -> Self {
        Self {
            x: doc.x,
            y: doc.y,
            z_depth: doc.z_depth,
            current_image_index: doc.current_image_index,
            card_visibility: doc.card_visibility,
        }
    }
}

pub fn match_path(match_id: &MatchId) -> String {
    format!("matches/{}", match_id)
}

pub fn participants_prefix(match_id: &MatchId) -> String {
    format!("matches/{}/participants/", match_id)
}

pub fn participant_path(match_id: &MatchId, user: &UserId) -> String {
    format!("{}{}", participants_prefix(match_id), user)
}

pub fn pieces_prefix(match_id: &MatchId) -> String {
    format!("matches/{}/pieces/", match_id)
}

pub fn piece_path(match_id: &MatchId, index: PieceIndex) -> String {
    format!("{}{}/currentState", pieces_prefix(match_id), index)
}

/// Extracts the piece index from a path under [`pieces_prefix`].
pub fn parse_piece_path(prefix: &str, path: &str) -> Option<PieceIndex> {
    path.strip_prefix(prefix)?
        .strip_suffix("/currentState")?
        .parse()
        .ok()
        .map(PieceIndex)
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

pub fn to_datetime(millis: i64, path: &str) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| GatewayError::CorruptedDocument {
        path: path.to_string(),
        reason: format!("timestamp {} out of range", millis),
    })
}
