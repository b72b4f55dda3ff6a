//! In-memory SyncGateway for tests and local matches.
//!
//! Documents are JSON values addressed by path, laid out as described in
//! [`documents`](super::documents). Each path is last-write-wins, so pushes
//! touching different pieces merge cleanly.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::broadcast;

use board_core::{GameSpecId, MatchState, PieceIndex, Participants, SeatIndex, UserId};

use super::documents::{
    self, MatchDocument, ParticipantDocument, PieceDocument, match_path, participant_path,
    participants_prefix, piece_path, pieces_prefix,
};
use super::error::{GatewayError, Result};
use super::subscription::{Delivery, Subscription};
use super::traits::SyncGateway;
use crate::types::{MatchId, MatchInfo};

const MATCH_ID_LEN: usize = 20;

#[derive(Default)]
struct Store {
    documents: BTreeMap<String, Value>,
    channels: HashMap<MatchId, broadcast::Sender<Delivery>>,
}

impl Store {
    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        self.documents
            .get(path)
            .map(|value| decode(path, value.clone()))
            .transpose()
    }

    fn put<T: Serialize>(&mut self, path: String, document: &T) -> Result<()> {
        let value = serde_json::to_value(document)?;
        self.documents.insert(path, value);
        Ok(())
    }

    fn under<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a String, &'a Value)> + 'a {
        self.documents
            .range(prefix.to_string()..)
            .take_while(move |(path, _)| path.starts_with(prefix))
    }

    fn match_document(&self, match_id: &MatchId) -> Result<MatchDocument> {
        self.get(&match_path(match_id))?
            .ok_or_else(|| GatewayError::MatchNotFound(match_id.clone()))
    }

    fn participants(&self, match_id: &MatchId) -> Result<Participants> {
        let prefix = participants_prefix(match_id);
        let mut seated = Vec::new();
        for (path, value) in self.under(&prefix) {
            let user = UserId::new(&path[prefix.len()..]);
            let doc: ParticipantDocument = decode(path, value.clone())?;
            seated.push((doc.seat_index, user));
        }
        seated.sort();
        Ok(Participants::from_ordered(seated.into_iter().map(|(_, user)| user)))
    }

    fn state(&self, match_id: &MatchId) -> Result<MatchState> {
        let prefix = pieces_prefix(match_id);
        let mut state = MatchState::empty();
        for (path, value) in self.under(&prefix) {
            let index = documents::parse_piece_path(&prefix, path).ok_or_else(|| {
                GatewayError::CorruptedDocument {
                    path: path.clone(),
                    reason: "not a piece state path".to_string(),
                }
            })?;
            let doc: PieceDocument = decode(path, value.clone())?;
            state.insert(index, doc.into());
        }
        Ok(state)
    }

    fn info(&self, match_id: &MatchId) -> Result<Option<MatchInfo>> {
        let path = match_path(match_id);
        let Some(doc) = self.get::<MatchDocument>(&path)? else {
            return Ok(None);
        };
        Ok(Some(MatchInfo {
            id: match_id.clone(),
            game_spec_id: doc.game_spec_id,
            participants: self.participants(match_id)?,
            state: self.state(match_id)?,
            created_on: documents::to_datetime(doc.created_on, &path)?,
            last_updated_on: documents::to_datetime(doc.last_updated_on, &path)?,
        }))
    }

    /// Sends `delivery` to every subscriber of the match. A channel whose
    /// listeners are all gone is dropped.
    fn broadcast(&mut self, match_id: &MatchId, delivery: Delivery) {
        let Some(sender) = self.channels.get(match_id) else {
            return;
        };
        if sender.send(delivery).is_err() {
            tracing::trace!(%match_id, "no subscribers for delivery");
            self.channels.remove(match_id);
        }
    }

    fn prune_channels(&mut self) {
        self.channels.retain(|_, sender| sender.receiver_count() > 0);
    }
}

fn decode<T: DeserializeOwned>(path: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| GatewayError::CorruptedDocument {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

fn generate_match_id() -> MatchId {
    let id: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(MATCH_ID_LEN)
        .map(char::from)
        .collect();
    MatchId(id)
}

/// Path-addressable JSON store shared by every session in the process.
pub struct InMemorySyncGateway {
    store: RwLock<Store>,
    pending_failures: AtomicUsize,
    subscription_buffer: usize,
}

impl InMemorySyncGateway {
    pub const DEFAULT_SUBSCRIPTION_BUFFER: usize = 64;

    pub fn new() -> Self {
        Self::with_buffer(Self::DEFAULT_SUBSCRIPTION_BUFFER)
    }

    /// Each subscriber can fall `buffer` deliveries behind before it lags.
    pub fn with_buffer(buffer: usize) -> Self {
        Self {
            store: RwLock::new(Store::default()),
            pending_failures: AtomicUsize::new(0),
            subscription_buffer: buffer.max(1),
        }
    }

    /// Rejects the next `count` piece writes without touching the store.
    pub fn fail_next_writes(&self, count: usize) {
        self.pending_failures.store(count, Ordering::SeqCst);
    }

    /// Number of live subscriptions on a match.
    pub fn listener_count(&self, match_id: &MatchId) -> usize {
        self.store
            .read()
            .map(|store| {
                store
                    .channels
                    .get(match_id)
                    .map_or(0, broadcast::Sender::receiver_count)
            })
            .unwrap_or(0)
    }

    /// Raw document at `path`, if any.
    pub fn document(&self, path: &str) -> Result<Option<Value>> {
        Ok(self.read()?.documents.get(path).cloned())
    }

    /// Authoritative state of a match.
    pub fn snapshot(&self, match_id: &MatchId) -> Result<MatchState> {
        let store = self.read()?;
        store.match_document(match_id)?;
        store.state(match_id)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Store>> {
        self.store.read().map_err(|_| GatewayError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Store>> {
        self.store.write().map_err(|_| GatewayError::LockPoisoned)
    }

    fn take_injected_failure(&self) -> bool {
        self.pending_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl Default for InMemorySyncGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SyncGateway for InMemorySyncGateway {
    async fn create_match(&self, game_spec_id: &GameSpecId, creator: &UserId) -> Result<MatchInfo> {
        let match_id = generate_match_id();
        let now = documents::now_millis();
        {
            let mut store = self.write()?;
            store.put(
                match_path(&match_id),
                &MatchDocument {
                    game_spec_id: game_spec_id.clone(),
                    created_on: now,
                    last_updated_on: now,
                },
            )?;
            store.put(
                participant_path(&match_id, creator),
                &ParticipantDocument {
                    seat_index: SeatIndex::FIRST,
                    join_timestamp: now,
                },
            )?;
        }
        tracing::info!(%match_id, game_spec = %game_spec_id, creator = %creator, "match created");

        self.load_match(&match_id)
            .await?
            .ok_or(GatewayError::MatchNotFound(match_id))
    }

    async fn add_participant(&self, match_id: &MatchId, user: &UserId) -> Result<SeatIndex> {
        let mut store = self.write()?;
        store.match_document(match_id)?;

        let participants = store.participants(match_id)?;
        if let Ok(seat) = participants.seat_of(user) {
            return Ok(seat);
        }

        let seat = SeatIndex(participants.len() as u32);
        store.put(
            participant_path(match_id, user),
            &ParticipantDocument {
                seat_index: seat,
                join_timestamp: documents::now_millis(),
            },
        )?;
        tracing::info!(%match_id, user = %user, %seat, "participant joined");
        Ok(seat)
    }

    async fn load_match(&self, match_id: &MatchId) -> Result<Option<MatchInfo>> {
        self.read()?.info(match_id)
    }

    async fn push_pieces(
        &self,
        match_id: &MatchId,
        state: &MatchState,
        pieces: &[PieceIndex],
    ) -> Result<()> {
        let mut store = self.write()?;
        let mut match_doc = store.match_document(match_id)?;

        if self.take_injected_failure() {
            return Err(GatewayError::WriteRejected {
                match_id: match_id.clone(),
                reason: "injected failure".to_string(),
            });
        }

        // Everything fallible happens before the first document is replaced,
        // so a rejected push leaves the store as it was.
        let mut merged = store.state(match_id)?;
        let mut writes = Vec::with_capacity(pieces.len() + 1);
        for &index in pieces {
            let piece = state.get(index).ok_or_else(|| GatewayError::WriteRejected {
                match_id: match_id.clone(),
                reason: format!("piece {} missing from pushed state", index),
            })?;
            let record = PieceDocument::from(piece);
            if !record.is_representable() {
                return Err(GatewayError::WriteRejected {
                    match_id: match_id.clone(),
                    reason: format!("piece {} has non-finite coordinates", index),
                });
            }
            writes.push((piece_path(match_id, index), serde_json::to_value(&record)?));
            merged.insert(index, piece.clone());
        }
        match_doc.last_updated_on = documents::now_millis();
        writes.push((match_path(match_id), serde_json::to_value(&match_doc)?));

        let written = pieces.len();
        store.documents.extend(writes);
        tracing::debug!(%match_id, pieces = written, "pieces written");
        store.broadcast(match_id, Arc::new(merged));
        Ok(())
    }

    async fn subscribe(&self, match_id: &MatchId) -> Result<Subscription> {
        let mut store = self.write()?;
        store.match_document(match_id)?;

        store.prune_channels();
        let buffer = self.subscription_buffer;
        let receiver = store
            .channels
            .entry(match_id.clone())
            .or_insert_with(|| broadcast::channel(buffer).0)
            .subscribe();
        let initial = Arc::new(store.state(match_id)?);

        Ok(Subscription::new(match_id.clone(), initial, receiver))
    }
}
