//! Contract between a match session and the shared store.

use async_trait::async_trait;

use board_core::{GameSpecId, MatchState, PieceIndex, SeatIndex, UserId};

use super::error::Result;
use super::subscription::Subscription;
use crate::types::{MatchId, MatchInfo};

/// Access to the remote store holding match state.
///
/// Implementations are injected as `Arc<dyn SyncGateway>` and owned by the
/// caller. Writes merge per piece: pushing one piece never touches another.
/// Every write that lands is delivered to every subscriber of the match,
/// including the writer.
#[async_trait]
pub trait SyncGateway: Send + Sync {
    /// Creates a match with `creator` in seat 0 and an empty state.
    async fn create_match(&self, game_spec_id: &GameSpecId, creator: &UserId) -> Result<MatchInfo>;

    /// Appends `user` to the participant list and returns its seat.
    /// Adding an existing participant returns its current seat.
    async fn add_participant(&self, match_id: &MatchId, user: &UserId) -> Result<SeatIndex>;

    async fn load_match(&self, match_id: &MatchId) -> Result<Option<MatchInfo>>;

    /// Writes every piece of `state`.
    async fn push(&self, match_id: &MatchId, state: &MatchState) -> Result<()> {
        let pieces: Vec<PieceIndex> = state.indices().collect();
        self.push_pieces(match_id, state, &pieces).await
    }

    /// Writes only the listed pieces of `state`.
    async fn push_pieces(
        &self,
        match_id: &MatchId,
        state: &MatchState,
        pieces: &[PieceIndex],
    ) -> Result<()>;

    async fn subscribe(&self, match_id: &MatchId) -> Result<Subscription>;
}
