//! Collaborator traits for player lookup and match history.
//!
//! The engine never touches storage itself. A match resolves its players
//! through a [`PlayerDirectory`] once, at creation, and reports every
//! finished turn and the match result to a [`MatchRecorder`].

use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use super::{
    entities::{MatchId, PlayerId, PlayerTurnRecord},
    errors::SnapshotError,
    snapshot::MatchSnapshot,
};

/// What the engine needs to know about a player.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct PlayerProfile {
    pub id: PlayerId,
    pub name: String,
}

/// Trait for player lookup
pub trait PlayerDirectory {
    /// Find player by ID
    fn get_player(&self, id: PlayerId) -> Option<PlayerProfile>;
}

/// Trait for persisting match history
pub trait MatchRecorder {
    /// Called once per completed turn, busts and overshoots included
    fn record_turn(&mut self, player_id: PlayerId, record: &PlayerTurnRecord);

    /// Called once when a player lands exactly on the target
    fn record_match_result(&mut self, match_id: MatchId, winner_id: PlayerId);
}

/// Recorder that drops everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullRecorder;

impl MatchRecorder for NullRecorder {
    fn record_turn(&mut self, _player_id: PlayerId, _record: &PlayerTurnRecord) {}

    fn record_match_result(&mut self, _match_id: MatchId, _winner_id: PlayerId) {}
}

#[derive(Debug, Default)]
struct StoreData {
    players: HashMap<PlayerId, PlayerProfile>,
    turns: Vec<(PlayerId, PlayerTurnRecord)>,
    results: Vec<(MatchId, PlayerId)>,
    snapshots: HashMap<MatchId, Vec<u8>>,
}

/// In-memory player directory and match recorder.
///
/// Clones share the same data, so one handle can be given to a match as its
/// recorder while another is kept for reading the history back.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    data: Arc<Mutex<StoreData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoreData> {
        // The data stays usable even if a writer panicked mid-update.
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn with_player(self, id: PlayerId, name: impl Into<String>) -> Self {
        self.add_player(id, name);
        self
    }

    pub fn add_player(&self, id: PlayerId, name: impl Into<String>) {
        let name = name.into();
        self.lock().players.insert(id, PlayerProfile { id, name });
    }

    /// Recorded turns for one player, oldest first.
    pub fn turns_for(&self, player_id: PlayerId) -> Vec<PlayerTurnRecord> {
        self.lock()
            .turns
            .iter()
            .filter(|(id, _)| *id == player_id)
            .map(|(_, record)| record.clone())
            .collect()
    }

    pub fn turn_count(&self) -> usize {
        self.lock().turns.len()
    }

    pub fn match_results(&self) -> Vec<(MatchId, PlayerId)> {
        self.lock().results.clone()
    }

    pub fn wins_for(&self, player_id: PlayerId) -> usize {
        self.lock()
            .results
            .iter()
            .filter(|(_, winner)| *winner == player_id)
            .count()
    }

    /// Store the binary encoding of a snapshot, replacing any earlier one.
    pub fn save_snapshot(&self, snapshot: &MatchSnapshot) -> Result<(), SnapshotError> {
        let bytes = snapshot.to_bytes()?;
        self.lock().snapshots.insert(snapshot.state.match_id, bytes);
        Ok(())
    }

    pub fn load_snapshot(&self, match_id: MatchId) -> Result<Option<MatchSnapshot>, SnapshotError> {
        let bytes = self.lock().snapshots.get(&match_id).cloned();
        bytes.map(|b| MatchSnapshot::from_bytes(&b)).transpose()
    }
}

impl PlayerDirectory for MemoryStore {
    fn get_player(&self, id: PlayerId) -> Option<PlayerProfile> {
        self.lock().players.get(&id).cloned()
    }
}

impl MatchRecorder for MemoryStore {
    fn record_turn(&mut self, player_id: PlayerId, record: &PlayerTurnRecord) {
        self.lock().turns.push((player_id, record.clone()));
    }

    fn record_match_result(&mut self, match_id: MatchId, winner_id: PlayerId) {
        self.lock().results.push((match_id, winner_id));
    }
}
