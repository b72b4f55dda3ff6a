//! Match identity and metadata shared across the runtime.
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use board_core::{GameSpecId, MatchState, Participants};

/// Store-issued identifier of a match.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(pub String);

impl MatchId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything the store knows about a match at one point in time.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchInfo {
    pub id: MatchId,
    pub game_spec_id: GameSpecId,
    pub participants: Participants,
    pub state: MatchState,
    pub created_on: DateTime<Utc>,
    pub last_updated_on: DateTime<Utc>,
}
