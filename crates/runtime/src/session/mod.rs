//! Match lifecycle for one participant.
//!
//! A [`MatchSession`] keeps two snapshots. `previous` is the last delivery and
//! is never written; `working` is what the participant sees and mutates.
//! Mutations are applied to a clone of `working` and swapped in whole. Each
//! delivery from the store is diffed against `previous` exactly once, its
//! animations are published, and both snapshots are replaced by it.

mod phase;

pub use phase::SessionPhase;

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use board_core::{
    AnimationEvent, BoardConfig, GameSpec, Gesture, GestureOutcome, MatchState, Mutation,
    MutationEngine, PieceIndex, PieceView, SeatIndex, Seating, TouchPoint, UserId, detect,
};

use crate::api::{Result, RuntimeError};
use crate::config::RuntimeConfig;
use crate::events::{AnimationBatch, Event, EventBus, SyncEvent, Topic};
use crate::gateway::{Delivery, GatewayError, Subscription, SyncGateway};
use crate::types::MatchId;

/// One participant's live view of a match.
pub struct MatchSession {
    match_id: MatchId,
    user: UserId,
    seating: Seating,
    spec: Arc<GameSpec>,
    gateway: Arc<dyn SyncGateway>,
    subscription: Option<Subscription>,
    events: EventBus,
    board: BoardConfig,
    previous: Arc<MatchState>,
    working: Arc<MatchState>,
    phase: SessionPhase,
}

impl MatchSession {
    /// Resolves the user's seat and subscribes to the match.
    ///
    /// Fails with a participant error when `user` has not joined the match.
    pub async fn open(
        gateway: Arc<dyn SyncGateway>,
        spec: Arc<GameSpec>,
        match_id: MatchId,
        user: UserId,
        config: &RuntimeConfig,
    ) -> Result<Self> {
        let info = gateway
            .load_match(&match_id)
            .await?
            .ok_or_else(|| RuntimeError::MatchNotFound {
                match_id: match_id.clone(),
            })?;
        if info.game_spec_id != spec.id {
            warn!(
                %match_id,
                expected = %info.game_spec_id,
                provided = %spec.id,
                "session opened with a different game spec"
            );
        }

        let seat = info.participants.seat_of(&user)?;
        let subscription = gateway.subscribe(&match_id).await?;
        info!(%match_id, user = %user, %seat, "session opened");

        let empty = Arc::new(MatchState::empty());
        Ok(Self {
            seating: Seating::new(seat, info.participants.len()),
            match_id,
            user,
            spec,
            gateway,
            subscription: Some(subscription),
            events: EventBus::with_capacity(config.event_buffer_size),
            board: config.board.clone(),
            previous: Arc::clone(&empty),
            working: empty,
            phase: SessionPhase::Uninitialized,
        })
    }

    /// Publishes on `bus` instead of a private bus.
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.events = bus;
        self
    }

    pub fn match_id(&self) -> &MatchId {
        &self.match_id
    }

    pub fn user(&self) -> &UserId {
        &self.user
    }

    pub fn seat(&self) -> SeatIndex {
        self.seating.self_seat
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn spec(&self) -> &GameSpec {
        &self.spec
    }

    /// Last delivered snapshot.
    pub fn previous(&self) -> &MatchState {
        &self.previous
    }

    /// Snapshot including local mutations not yet delivered back.
    pub fn working(&self) -> &MatchState {
        &self.working
    }

    pub fn is_open(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.events.subscribe(topic)
    }

    /// What this seat should draw for every piece.
    pub fn views(&self) -> Result<Vec<PieceView>> {
        Ok(PieceView::resolve_all(
            &self.spec,
            &self.working,
            self.seating.self_seat,
        )?)
    }

    /// Waits for the next delivery and processes it.
    pub async fn sync(&mut self) -> Result<Vec<AnimationEvent>> {
        let delivery = self.next_delivery().await?;
        self.receive(delivery).await
    }

    /// Processes every delivery already queued without waiting for more.
    pub async fn drain(&mut self) -> Result<Vec<AnimationEvent>> {
        let mut animations = Vec::new();
        loop {
            let delivery = match self.subscription_mut()?.try_next() {
                Ok(Some(delivery)) => delivery,
                Ok(None) => break,
                Err(RuntimeError::SubscriptionLagged { skipped, .. }) => {
                    warn!(match_id = %self.match_id, skipped, "subscription lagged");
                    continue;
                }
                Err(err) => return Err(err),
            };
            animations.extend(self.receive(delivery).await?);
        }
        Ok(animations)
    }

    /// Handles one authoritative snapshot from the store.
    ///
    /// The first delivery initializes the session: an empty store is seeded
    /// with the initial state, anything else is adopted silently. Later
    /// deliveries replace both snapshots, including a working snapshot with
    /// an unacknowledged local mutation.
    pub async fn receive(&mut self, delivered: Delivery) -> Result<Vec<AnimationEvent>> {
        if self.phase == SessionPhase::Uninitialized {
            self.initialize(delivered).await?;
            return Ok(Vec::new());
        }

        let animations = detect(
            &self.previous,
            &delivered,
            &self.spec,
            self.seating.self_seat,
        );
        debug!(
            match_id = %self.match_id,
            pieces = delivered.len(),
            animations = animations.len(),
            "delivery received"
        );

        if !animations.is_empty() {
            self.events.publish(Event::Animation(AnimationBatch {
                match_id: self.match_id.clone(),
                seat: self.seating.self_seat,
                events: animations.clone(),
            }));
        }

        self.previous = Arc::clone(&delivered);
        self.working = delivered;
        self.phase = SessionPhase::Synced;
        Ok(animations)
    }

    /// Applies `mutation` locally and pushes the pieces it touched.
    ///
    /// A validation error leaves the session untouched. A push failure keeps
    /// the local change and leaves the session in
    /// [`SessionPhase::PendingLocalWrite`].
    pub async fn mutate(&mut self, mutation: Mutation) -> Result<()> {
        self.refresh_seating().await?;

        let mut next = MatchState::clone(&self.working);
        MutationEngine::new(&mut next, &self.spec, self.seating)
            .with_config(&self.board)
            .with_entropy(rand::random())
            .apply(&mutation)?;
        debug!(match_id = %self.match_id, mutation = mutation.name(), "applied locally");

        self.working = Arc::new(next);
        self.phase = SessionPhase::PendingLocalWrite;

        let pieces = mutation.affected(&self.spec);
        self.push_working(mutation.name(), pieces).await
    }

    /// Turns a touch into a mutation when the touched piece supports one.
    pub async fn handle_gesture(
        &mut self,
        index: PieceIndex,
        start: TouchPoint,
        end: TouchPoint,
    ) -> Result<GestureOutcome> {
        let outcome = GestureOutcome::for_piece(&self.spec, index, Gesture::classify(start, end))?;
        if let GestureOutcome::Mutate(mutation) = outcome {
            self.mutate(mutation).await?;
        }
        Ok(outcome)
    }

    /// Pushes the whole working snapshot again after a failed write.
    pub async fn retry_pending(&mut self) -> Result<()> {
        if self.phase != SessionPhase::PendingLocalWrite {
            return Ok(());
        }
        let pieces = self.working.indices().collect();
        self.push_working("retry", pieces).await
    }

    /// Releases the subscription. Later syncs fail with `SubscriptionClosed`.
    pub fn close(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.release();
            self.events.publish(Event::Sync(SyncEvent::Closed {
                match_id: self.match_id.clone(),
            }));
            info!(match_id = %self.match_id, "session closed");
        }
    }

    async fn initialize(&mut self, delivered: Delivery) -> Result<()> {
        if !delivered.is_empty() {
            info!(match_id = %self.match_id, pieces = delivered.len(), "adopting stored state");
            self.events.publish(Event::Sync(SyncEvent::Adopted {
                match_id: self.match_id.clone(),
                pieces: delivered.len(),
            }));
            self.previous = Arc::clone(&delivered);
            self.working = delivered;
            self.phase = SessionPhase::Synced;
            return Ok(());
        }

        // Every participant generates the same initial state, so a racing
        // initializer only rewrites identical values.
        warn!(
            match_id = %self.match_id,
            "store has no state; initializing it (concurrent initializers race, last write wins)"
        );
        let initial = Arc::new(MatchState::initial(&self.spec));
        self.previous = Arc::clone(&initial);
        self.working = initial;
        self.phase = SessionPhase::PendingLocalWrite;

        match self.gateway.push(&self.match_id, &self.working).await {
            Ok(()) => {
                self.phase = SessionPhase::Synced;
                self.events.publish(Event::Sync(SyncEvent::Initialized {
                    match_id: self.match_id.clone(),
                    pieces: self.working.len(),
                }));
                info!(match_id = %self.match_id, pieces = self.working.len(), "match initialized");
                Ok(())
            }
            Err(source) => Err(self.write_failed("initialize", source)),
        }
    }

    async fn push_working(&mut self, mutation: &'static str, pieces: Vec<PieceIndex>) -> Result<()> {
        match self
            .gateway
            .push_pieces(&self.match_id, &self.working, &pieces)
            .await
        {
            Ok(()) => {
                self.phase = SessionPhase::Synced;
                self.events.publish(Event::Sync(SyncEvent::WriteAcknowledged {
                    match_id: self.match_id.clone(),
                    mutation: mutation.to_string(),
                    pieces,
                }));
                Ok(())
            }
            Err(source) => Err(self.write_failed(mutation, source)),
        }
    }

    fn write_failed(&self, mutation: &'static str, source: GatewayError) -> RuntimeError {
        warn!(
            match_id = %self.match_id,
            mutation,
            error = %source,
            "write failed; local state kept"
        );
        self.events.publish(Event::Sync(SyncEvent::WriteFailed {
            match_id: self.match_id.clone(),
            mutation: mutation.to_string(),
            error: source.to_string(),
        }));
        RuntimeError::SyncWriteFailure {
            match_id: self.match_id.clone(),
            mutation,
            source,
        }
    }

    /// Picks up participants who joined after the session opened. Store
    /// errors keep the current seating.
    async fn refresh_seating(&mut self) -> Result<()> {
        match self.gateway.load_match(&self.match_id).await {
            Ok(Some(info)) => {
                let seat = info.participants.seat_of(&self.user)?;
                self.seating = Seating::new(seat, info.participants.len());
            }
            Ok(None) => {
                return Err(RuntimeError::MatchNotFound {
                    match_id: self.match_id.clone(),
                });
            }
            Err(err) => {
                warn!(match_id = %self.match_id, error = %err, "could not refresh participants");
            }
        }
        Ok(())
    }

    async fn next_delivery(&mut self) -> Result<Delivery> {
        loop {
            match self.subscription_mut()?.next().await {
                Err(RuntimeError::SubscriptionLagged { skipped, .. }) => {
                    warn!(match_id = %self.match_id, skipped, "subscription lagged");
                }
                other => return other,
            }
        }
    }

    fn subscription_mut(&mut self) -> Result<&mut Subscription> {
        let match_id = &self.match_id;
        self.subscription
            .as_mut()
            .ok_or_else(|| RuntimeError::SubscriptionClosed {
                match_id: match_id.clone(),
            })
    }
}
