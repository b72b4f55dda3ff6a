//! Scoped listener on a match's authoritative state.

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

use board_core::MatchState;

use crate::api::{Result, RuntimeError};
use crate::types::MatchId;

/// Full authoritative snapshot delivered after every write.
pub type Delivery = Arc<MatchState>;

/// Live listener on a match.
///
/// The first call to [`next`](Self::next) yields the state as it was when
/// the subscription was opened; later calls yield one snapshot per write,
/// including the subscriber's own. Dropping the subscription unregisters it.
#[derive(Debug)]
pub struct Subscription {
    match_id: MatchId,
    initial: Option<Delivery>,
    receiver: broadcast::Receiver<Delivery>,
}

impl Subscription {
    pub fn new(match_id: MatchId, initial: Delivery, receiver: broadcast::Receiver<Delivery>) -> Self {
        Self {
            match_id,
            initial: Some(initial),
            receiver,
        }
    }

    pub fn match_id(&self) -> &MatchId {
        &self.match_id
    }

    /// Waits for the next delivery.
    pub async fn next(&mut self) -> Result<Delivery> {
        if let Some(initial) = self.initial.take() {
            return Ok(initial);
        }
        self.receiver.recv().await.map_err(|err| match err {
            RecvError::Closed => RuntimeError::SubscriptionClosed {
                match_id: self.match_id.clone(),
            },
            RecvError::Lagged(skipped) => RuntimeError::SubscriptionLagged {
                match_id: self.match_id.clone(),
                skipped,
            },
        })
    }

    /// Returns a pending delivery without waiting, or `None` when caught up.
    pub fn try_next(&mut self) -> Result<Option<Delivery>> {
        if let Some(initial) = self.initial.take() {
            return Ok(Some(initial));
        }
        match self.receiver.try_recv() {
            Ok(delivery) => Ok(Some(delivery)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Closed) => Err(RuntimeError::SubscriptionClosed {
                match_id: self.match_id.clone(),
            }),
            Err(TryRecvError::Lagged(skipped)) => Err(RuntimeError::SubscriptionLagged {
                match_id: self.match_id.clone(),
                skipped,
            }),
        }
    }

    /// Unregisters the listener.
    pub fn release(self) {
        tracing::debug!(match_id = %self.match_id, "subscription released");
    }
}
