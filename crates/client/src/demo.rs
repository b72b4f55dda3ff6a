//! Scripted two-seat match over the in-memory gateway.
//!
//! Both seats run in one process and share a store. Each step is played by
//! one seat, then every seat drains its deliveries and plays the resulting
//! animations on its handle table.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use board_core::{
    BoardConfig, GameSpec, GestureOutcome, MatchState, Mutation, PieceIndex, TouchPoint, UserId,
};
use match_runtime::{
    InMemorySyncGateway, MatchId, MatchSession, PieceHandles, RuntimeConfig, SyncGateway, Tween,
};

/// One action of the script.
#[derive(Clone, Copy, Debug)]
pub enum Step {
    Touch {
        index: PieceIndex,
        start: TouchPoint,
        end: TouchPoint,
    },
    Mutate(Mutation),
}

/// Seat that plays each step, by position in the participant list.
pub fn script() -> Vec<(usize, Step)> {
    let tap = |index: u32, x: f64, y: f64| Step::Touch {
        index: PieceIndex(index),
        start: TouchPoint::new(x, y),
        end: TouchPoint::new(x, y),
    };

    vec![
        (0, tap(5, 80.0, 80.0)),
        (
            0,
            Step::Touch {
                index: PieceIndex(7),
                start: TouchPoint::new(50.0, 50.0),
                end: TouchPoint::new(30.0, 60.0),
            },
        ),
        (1, Step::Mutate(Mutation::ShowMe { index: PieceIndex(1) })),
        (0, tap(6, 50.0, 10.0)),
        (1, Step::Mutate(Mutation::ShuffleDeck { deck: PieceIndex(0) })),
        (0, Step::Mutate(Mutation::ShowEveryone { index: PieceIndex(2) })),
        (0, tap(2, 10.0, 40.0)),
    ]
}

/// What each seat ended up with.
#[derive(Debug)]
pub struct DemoReport {
    pub match_id: MatchId,
    pub seats: Vec<SeatReport>,
}

#[derive(Debug)]
pub struct SeatReport {
    pub user: UserId,
    pub animations: usize,
    pub state: MatchState,
}

struct Seat {
    session: MatchSession,
    handles: PieceHandles<Vec<Tween>>,
    board: BoardConfig,
    animations: usize,
}

impl Seat {
    fn new(session: MatchSession, board: BoardConfig) -> Self {
        let handles = PieceHandles::for_spec(session.spec(), |_, _| Vec::new());
        Self {
            session,
            handles,
            board,
            animations: 0,
        }
    }

    async fn settle(&mut self) -> Result<()> {
        let events = self.session.drain().await?;
        for event in &events {
            info!(
                user = %self.session.user(),
                piece = %event.index,
                animation = ?event.animation,
                "animate"
            );
        }
        let board = &self.board;
        self.animations += self.handles.dispatch(&events, |played, animation| {
            played.push(Tween::for_animation(animation, board))
        });
        Ok(())
    }

    async fn play(&mut self, step: Step) -> Result<()> {
        match step {
            Step::Touch { index, start, end } => {
                let outcome = self.session.handle_gesture(index, start, end).await?;
                if let GestureOutcome::CardOptions(card) = outcome {
                    info!(user = %self.session.user(), %card, "card options opened");
                }
            }
            Step::Mutate(mutation) => self.session.mutate(mutation).await?,
        }
        Ok(())
    }
}

/// Creates a match for `users`, runs [`script`] and reports every seat's
/// final state.
pub async fn run_demo(
    spec: Arc<GameSpec>,
    users: &[UserId],
    runtime: &RuntimeConfig,
) -> Result<DemoReport> {
    let Some((creator, guests)) = users.split_first() else {
        anyhow::bail!("demo needs at least one user");
    };

    let gateway = Arc::new(InMemorySyncGateway::with_buffer(
        runtime.subscription_buffer_size,
    ));
    let info = gateway.create_match(&spec.id, creator).await?;
    for guest in guests {
        gateway.add_participant(&info.id, guest).await?;
    }

    let mut seats = Vec::with_capacity(users.len());
    for user in users {
        let store: Arc<dyn SyncGateway> = gateway.clone();
        let mut session =
            MatchSession::open(store, Arc::clone(&spec), info.id.clone(), user.clone(), runtime)
                .await?;
        session.sync().await?;
        seats.push(Seat::new(session, runtime.board.clone()));
    }
    settle(&mut seats).await?;

    for (seat, step) in script() {
        let Some(player) = seats.get_mut(seat) else {
            continue;
        };
        info!(user = %player.session.user(), ?step, "play");
        player.play(step).await?;
        settle(&mut seats).await?;
    }

    let mut report = DemoReport {
        match_id: info.id,
        seats: Vec::with_capacity(seats.len()),
    };
    for mut seat in seats {
        seat.session.close();
        report.seats.push(SeatReport {
            user: seat.session.user().clone(),
            animations: seat.animations,
            state: seat.session.working().clone(),
        });
    }
    Ok(report)
}

async fn settle(seats: &mut [Seat]) -> Result<()> {
    for seat in seats.iter_mut() {
        seat.settle().await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_content::ContentFactory;
    use board_core::{GameSpecId, SeatIndex};

    fn demo_spec() -> Arc<GameSpec> {
        let data_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data");
        let spec = ContentFactory::new(data_dir)
            .load_spec(&GameSpecId::new("demo"))
            .expect("bundled demo spec should load");
        Arc::new(spec)
    }

    #[tokio::test]
    async fn both_seats_converge() {
        let users = [UserId::new("alice"), UserId::new("bob")];
        let report = run_demo(demo_spec(), &users, &RuntimeConfig::default())
            .await
            .unwrap();

        let [alice, bob] = &report.seats[..] else {
            panic!("expected two seats");
        };
        assert_eq!(alice.state, bob.state);

        let pawn = alice.state.get(PieceIndex(7)).unwrap();
        assert_eq!((pawn.x, pawn.y), (30.0, 60.0));
        assert_eq!(alice.state.get(PieceIndex(6)).unwrap().current_image_index, 1);

        // Card 1 was shown to bob, then hidden again by the shuffle.
        let card = alice.state.get(PieceIndex(1)).unwrap();
        assert!(!card.is_visible_to(SeatIndex(1)));
        let card = alice.state.get(PieceIndex(2)).unwrap();
        assert!(card.is_visible_to(SeatIndex(0)) && card.is_visible_to(SeatIndex(1)));

        // Roll, slide, lamp flip, reveal of card 2.
        assert_eq!(alice.animations, 4);
        // Bob also flips card 1 when he peeks and when the shuffle hides it.
        assert_eq!(bob.animations, 6);
    }

    #[tokio::test]
    async fn empty_user_list_is_rejected() {
        assert!(run_demo(demo_spec(), &[], &RuntimeConfig::default()).await.is_err());
    }
}
