//! Resumable match snapshots.
//!
//! A snapshot carries everything needed to continue a match exactly where
//! it stopped, including the dice and phase of an unfinished turn. It has a
//! JSON encoding for inspection and a compact binary one for storage.

use serde::{Deserialize, Serialize};

use super::{
    config::MatchConfig,
    constants::{MAX_FACE, MIN_FACE},
    entities::PlayerTurnRecord,
    errors::SnapshotError,
    ports::PlayerProfile,
    state_machine::{MatchPhase, MatchState},
    turn::TurnState,
};

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct MatchSnapshot {
    pub config: MatchConfig,
    pub players: Vec<PlayerProfile>,
    pub state: MatchState,
    pub phase: MatchPhase,
    /// Banked totals, indexed like `state.player_ids`.
    pub scores: Vec<u32>,
    pub turn: Option<TurnState>,
    pub history: Vec<PlayerTurnRecord>,
}

fn inconsistent(msg: impl Into<String>) -> SnapshotError {
    SnapshotError::Inconsistent(msg.into())
}

impl MatchSnapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.check_consistency()?;
        Ok(snapshot)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serde::encode_to_vec(
            self,
            bincode::config::standard(),
        )?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let (snapshot, _): (Self, usize) =
            bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;
        snapshot.check_consistency()?;
        Ok(snapshot)
    }

    /// Reject snapshots no match could have produced.
    pub fn check_consistency(&self) -> Result<(), SnapshotError> {
        self.config.validate()?;

        let ids = self.config.player_ids();
        if self.state.player_ids != ids {
            return Err(inconsistent("seat order differs from the configuration"));
        }
        if self.players.iter().map(|p| p.id).ne(ids.iter().copied()) {
            return Err(inconsistent("player profiles don't match the seats"));
        }
        if self.scores.len() != ids.len() {
            return Err(inconsistent(format!(
                "{} scores for {} players",
                self.scores.len(),
                ids.len()
            )));
        }
        if self.state.target_score != self.config.target_score {
            return Err(inconsistent("target score differs from the configuration"));
        }
        if self.state.current_player_index >= ids.len() {
            return Err(inconsistent(format!(
                "player index {} out of bounds",
                self.state.current_player_index
            )));
        }
        if self.state.current_round == 0 {
            return Err(inconsistent("rounds start at 1"));
        }
        if let Some(score) = self.scores.iter().find(|&&s| s > self.state.target_score) {
            return Err(inconsistent(format!("score {score} is past the target")));
        }

        let winner_score = self
            .state
            .winner_id
            .and_then(|id| ids.iter().position(|&p| p == id))
            .map(|i| self.scores[i]);
        match self.phase {
            MatchPhase::NotStarted => {
                if self.turn.is_some() || !self.history.is_empty() {
                    return Err(inconsistent("match not started but has turns"));
                }
            }
            MatchPhase::InProgress => {
                if self.turn.as_ref().is_none_or(|t| t.phase.is_finished()) {
                    return Err(inconsistent("match in progress without an open turn"));
                }
            }
            MatchPhase::Completed => {
                if winner_score != Some(self.state.target_score) {
                    return Err(inconsistent("completed match without an exact winner"));
                }
            }
        }
        if self.state.is_completed != (self.phase == MatchPhase::Completed)
            || self.state.winner_id.is_some() != self.state.is_completed
        {
            return Err(inconsistent("completion flags disagree"));
        }
        if let Some(turn) = &self.turn {
            self.check_turn(turn)?;
        }

        Ok(())
    }

    fn check_turn(&self, turn: &TurnState) -> Result<(), SnapshotError> {
        for (pos, die) in turn.dice.dice().iter().enumerate() {
            if die.id != pos {
                return Err(inconsistent(format!("die {} sits at position {pos}", die.id)));
            }
            if !(MIN_FACE..=MAX_FACE).contains(&die.face) {
                return Err(inconsistent(format!("die {pos} shows face {}", die.face)));
            }
        }

        // Closed turns may have had their score cleared by a bust.
        if !turn.phase.is_finished() {
            let entered = self.scores[self.state.current_player_index] > 0
                || turn.current_turn_score >= self.config.entry_threshold;
            if turn.has_entered_scoring != entered {
                return Err(inconsistent("entry flag disagrees with the scores"));
            }
        }
        Ok(())
    }
}
