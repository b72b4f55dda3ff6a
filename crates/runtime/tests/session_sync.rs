use std::sync::Arc;

use board_core::{
    Anchor, Animation, AnimationEvent, BoardError, BoardSpec, ErrorSeverity, GameSpec, GameSpecId,
    GestureOutcome, ImageRef, MatchState, Mutation, PieceIndex, PieceKind, PieceSpec, SeatIndex,
    StateError, TouchPoint, UserId,
};
use match_runtime::{
    Event, InMemorySyncGateway, MatchId, MatchSession, RuntimeConfig, RuntimeError, SessionPhase,
    SyncEvent, SyncGateway, Topic,
};

fn images(count: usize) -> Vec<ImageRef> {
    (0..count)
        .map(|i| ImageRef::new(format!("face{i}"), format!("face{i}.png")))
        .collect()
}

/// 0 card, 1 dice, 2 token.
fn spec() -> Arc<GameSpec> {
    Arc::new(GameSpec::new(
        GameSpecId::new("table"),
        BoardSpec::default(),
        vec![
            PieceSpec::new(PieceKind::Card, images(2)).with_anchor(Anchor::new(20.0, 20.0)),
            PieceSpec::new(PieceKind::Dice, images(6)).with_anchor(Anchor::new(50.0, 50.0)),
            PieceSpec::new(PieceKind::Standard, images(1)).with_anchor(Anchor::new(80.0, 80.0)),
        ],
    ))
}

struct Table {
    gateway: Arc<InMemorySyncGateway>,
    match_id: MatchId,
}

impl Table {
    async fn new() -> Self {
        let gateway = Arc::new(InMemorySyncGateway::new());
        let info = gateway
            .create_match(&GameSpecId::new("table"), &UserId::new("alice"))
            .await
            .expect("match should be created");
        gateway
            .add_participant(&info.id, &UserId::new("bob"))
            .await
            .expect("bob should join");
        Self {
            gateway,
            match_id: info.id,
        }
    }

    async fn open(&self, user: &str) -> Result<MatchSession, RuntimeError> {
        let gateway: Arc<dyn SyncGateway> = self.gateway.clone();
        MatchSession::open(
            gateway,
            spec(),
            self.match_id.clone(),
            UserId::new(user),
            &RuntimeConfig::default(),
        )
        .await
    }

    /// Opens a session and processes its first delivery and the echo.
    async fn synced(&self, user: &str) -> MatchSession {
        let mut session = self.open(user).await.expect("session should open");
        session.sync().await.expect("first delivery");
        session.drain().await.expect("echo");
        assert_eq!(session.phase(), SessionPhase::Synced);
        session
    }
}

#[tokio::test]
async fn first_session_initializes_the_store() {
    let table = Table::new().await;
    let mut alice = table.open("alice").await.unwrap();
    assert_eq!(alice.phase(), SessionPhase::Uninitialized);
    let mut sync_events = alice.subscribe(Topic::Sync);

    assert!(alice.sync().await.unwrap().is_empty());
    assert_eq!(alice.phase(), SessionPhase::Synced);
    assert_eq!(alice.working(), &MatchState::initial(&spec()));
    assert_eq!(table.gateway.snapshot(&table.match_id).unwrap(), MatchState::initial(&spec()));
    assert!(matches!(
        sync_events.recv().await.unwrap(),
        Event::Sync(SyncEvent::Initialized { pieces: 3, .. })
    ));

    // The initial push echoes back without animations.
    assert!(alice.drain().await.unwrap().is_empty());
}

#[tokio::test]
async fn later_session_adopts_stored_state() {
    let table = Table::new().await;
    let alice = table.synced("alice").await;

    let mut bob = table.open("bob").await.unwrap();
    assert!(bob.sync().await.unwrap().is_empty());
    assert_eq!(bob.seat(), SeatIndex(1));
    assert_eq!(bob.working(), alice.working());
}

#[tokio::test]
async fn own_writes_echo_back_as_animations() {
    let table = Table::new().await;
    let mut alice = table.synced("alice").await;
    let mut animations = alice.subscribe(Topic::Animation);

    alice.mutate(Mutation::RollDice { index: PieceIndex(1) }).await.unwrap();
    assert_eq!(alice.phase(), SessionPhase::Synced);
    // Not yet delivered: previous still holds the old depth.
    assert_ne!(
        alice.previous().get(PieceIndex(1)),
        alice.working().get(PieceIndex(1))
    );

    let events = alice.drain().await.unwrap();
    assert_eq!(events, vec![AnimationEvent::new(PieceIndex(1), Animation::Roll)]);
    assert_eq!(alice.previous(), alice.working());

    match animations.recv().await.unwrap() {
        Event::Animation(batch) => {
            assert_eq!(batch.seat, SeatIndex(0));
            assert_eq!(batch.events, events);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn flips_depend_on_the_observing_seat() {
    let table = Table::new().await;
    let mut alice = table.synced("alice").await;
    let mut bob = table.synced("bob").await;

    alice.mutate(Mutation::ShowMe { index: PieceIndex(0) }).await.unwrap();
    assert_eq!(
        alice.drain().await.unwrap(),
        vec![AnimationEvent::new(PieceIndex(0), Animation::Flip)]
    );
    assert!(bob.drain().await.unwrap().is_empty());
    assert_eq!(bob.views().unwrap()[0].image_index, 1);

    alice
        .mutate(Mutation::ShowEveryone { index: PieceIndex(0) })
        .await
        .unwrap();
    assert!(alice.drain().await.unwrap().is_empty());
    assert_eq!(
        bob.drain().await.unwrap(),
        vec![AnimationEvent::new(PieceIndex(0), Animation::Flip)]
    );
    assert_eq!(bob.views().unwrap()[0].image_index, 0);
}

#[tokio::test]
async fn failed_push_keeps_the_local_mutation() {
    let table = Table::new().await;
    let mut alice = table.synced("alice").await;
    table.gateway.fail_next_writes(1);

    let err = alice
        .mutate(Mutation::MoveTo { index: PieceIndex(2), x: 5.0, y: 6.0 })
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::SyncWriteFailure { mutation: "move_to", .. }));
    assert_eq!(err.severity(), ErrorSeverity::Recoverable);

    assert_eq!(alice.phase(), SessionPhase::PendingLocalWrite);
    let moved = alice.working().get(PieceIndex(2)).unwrap();
    assert_eq!((moved.x, moved.y), (5.0, 6.0));
    let stored = table.gateway.snapshot(&table.match_id).unwrap();
    assert_eq!(stored.get(PieceIndex(2)).unwrap().x, 80.0);

    alice.retry_pending().await.unwrap();
    assert_eq!(alice.phase(), SessionPhase::Synced);
    let stored = table.gateway.snapshot(&table.match_id).unwrap();
    assert_eq!(stored.get(PieceIndex(2)).unwrap().x, 5.0);
}

#[tokio::test]
async fn invalid_mutation_changes_nothing() {
    let table = Table::new().await;
    let mut alice = table.synced("alice").await;
    let before = alice.working().clone();

    let err = alice
        .mutate(Mutation::ToggleImage { index: PieceIndex(9) })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::State(StateError::InvalidPieceIndex { piece_count: 3, .. })
    ));
    assert_eq!(alice.phase(), SessionPhase::Synced);
    assert_eq!(alice.working(), &before);
    assert!(alice.drain().await.unwrap().is_empty());
}

#[tokio::test]
async fn closing_releases_the_listener() {
    let table = Table::new().await;
    let mut alice = table.open("alice").await.unwrap();
    let bob = table.open("bob").await.unwrap();
    assert_eq!(table.gateway.listener_count(&table.match_id), 2);

    alice.close();
    assert!(!alice.is_open());
    assert_eq!(table.gateway.listener_count(&table.match_id), 1);
    assert!(matches!(
        alice.sync().await,
        Err(RuntimeError::SubscriptionClosed { .. })
    ));

    drop(bob);
    assert_eq!(table.gateway.listener_count(&table.match_id), 0);
}

#[tokio::test]
async fn concurrent_writes_to_different_pieces_merge() {
    let table = Table::new().await;
    let mut alice = table.synced("alice").await;
    let mut bob = table.synced("bob").await;

    alice
        .mutate(Mutation::MoveTo { index: PieceIndex(0), x: 1.0, y: 1.0 })
        .await
        .unwrap();
    // Bob has not seen alice's move and pushes from a stale snapshot.
    bob.mutate(Mutation::MoveTo { index: PieceIndex(2), x: 9.0, y: 9.0 })
        .await
        .unwrap();

    alice.drain().await.unwrap();
    bob.drain().await.unwrap();

    let stored = table.gateway.snapshot(&table.match_id).unwrap();
    assert_eq!(stored.get(PieceIndex(0)).unwrap().x, 1.0);
    assert_eq!(stored.get(PieceIndex(2)).unwrap().x, 9.0);
    assert_eq!(alice.working(), &stored);
    assert_eq!(bob.working(), &stored);
}

#[tokio::test]
async fn strangers_cannot_open_a_session() {
    let table = Table::new().await;
    let err = table.open("mallory").await.err().unwrap();
    assert!(matches!(err, RuntimeError::Participant(_)));
    assert_eq!(err.severity(), ErrorSeverity::Fatal);

    let gateway: Arc<dyn SyncGateway> = table.gateway.clone();
    let missing = MatchSession::open(
        gateway,
        spec(),
        MatchId::new("missing"),
        UserId::new("alice"),
        &RuntimeConfig::default(),
    )
    .await
    .err()
    .unwrap();
    assert!(matches!(missing, RuntimeError::MatchNotFound { .. }));
}

#[tokio::test]
async fn late_joiners_are_covered_by_show_everyone() {
    let table = Table::new().await;
    let mut alice = table.synced("alice").await;
    table
        .gateway
        .add_participant(&table.match_id, &UserId::new("carol"))
        .await
        .unwrap();

    alice
        .mutate(Mutation::ShowEveryone { index: PieceIndex(0) })
        .await
        .unwrap();
    let card = alice.working().get(PieceIndex(0)).unwrap();
    assert!(card.is_visible_to(SeatIndex(2)));
}

#[tokio::test]
async fn taps_become_mutations() {
    let table = Table::new().await;
    let mut alice = table.synced("alice").await;
    let here = TouchPoint::new(50.0, 50.0);

    let outcome = alice.handle_gesture(PieceIndex(1), here, here).await.unwrap();
    assert_eq!(
        outcome,
        GestureOutcome::Mutate(Mutation::RollDice { index: PieceIndex(1) })
    );
    assert_eq!(
        alice.drain().await.unwrap(),
        vec![AnimationEvent::new(PieceIndex(1), Animation::Roll)]
    );

    let outcome = alice.handle_gesture(PieceIndex(0), here, here).await.unwrap();
    assert_eq!(outcome, GestureOutcome::CardOptions(PieceIndex(0)));
    assert!(alice.drain().await.unwrap().is_empty());
}

#[tokio::test]
async fn non_finite_moves_keep_the_match_readable() {
    let table = Table::new().await;
    let mut alice = table.synced("alice").await;
    let before = alice.working().clone();

    let err = alice
        .mutate(Mutation::MoveTo { index: PieceIndex(2), x: f64::NAN, y: 1.0 })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::State(StateError::NonFiniteCoordinate { .. })
    ));
    assert_eq!(err.severity(), ErrorSeverity::Validation);
    assert_eq!(alice.phase(), SessionPhase::Synced);
    assert_eq!(alice.working(), &before);

    alice.mutate(Mutation::RollDice { index: PieceIndex(1) }).await.unwrap();
    assert_eq!(table.gateway.snapshot(&table.match_id).unwrap(), *alice.working());

    let mut bob = table.open("bob").await.unwrap();
    bob.sync().await.unwrap();
    assert_eq!(bob.working(), alice.working());
}
