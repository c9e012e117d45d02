//! Match configuration models.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{
    constants::{DEFAULT_ENTRY_THRESHOLD, DEFAULT_TARGET_SCORE, MAX_PLAYERS, SINGLE_FIVE_SCORE},
    entities::PlayerId,
    errors::ConfigError,
};
use crate::bot::BotDifficulty;

/// Who controls a seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatKind {
    Human,
    Bot(BotDifficulty),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub player_id: PlayerId,
    pub kind: SeatKind,
}

impl Seat {
    pub fn human(player_id: PlayerId) -> Self {
        Self {
            player_id,
            kind: SeatKind::Human,
        }
    }

    pub fn bot(player_id: PlayerId, difficulty: BotDifficulty) -> Self {
        Self {
            player_id,
            kind: SeatKind::Bot(difficulty),
        }
    }
}

/// Match configuration, fixed once the match is created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Cumulative score a player must land on exactly (default: 10000)
    pub target_score: u32,

    /// Turn score needed before a player's first bank counts (default: 500)
    pub entry_threshold: u32,

    /// Seats in turn order
    pub seats: Vec<Seat>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            target_score: DEFAULT_TARGET_SCORE,
            entry_threshold: DEFAULT_ENTRY_THRESHOLD,
            seats: Vec::new(),
        }
    }
}

impl MatchConfig {
    pub fn new(seats: Vec<Seat>) -> Self {
        Self {
            seats,
            ..Default::default()
        }
    }

    pub fn with_target_score(mut self, target_score: u32) -> Self {
        self.target_score = target_score;
        self
    }

    pub fn with_entry_threshold(mut self, entry_threshold: u32) -> Self {
        self.entry_threshold = entry_threshold;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.seats.is_empty() {
            return Err(ConfigError::NoPlayers);
        }

        if self.seats.len() > MAX_PLAYERS {
            return Err(ConfigError::TooManyPlayers {
                max: MAX_PLAYERS,
                got: self.seats.len(),
            });
        }

        let mut seen = HashSet::with_capacity(self.seats.len());
        for seat in &self.seats {
            if !seen.insert(seat.player_id) {
                return Err(ConfigError::DuplicatePlayer(seat.player_id));
            }
        }

        // Every score is a multiple of the smallest scoring die.
        if self.target_score == 0 || self.target_score % SINGLE_FIVE_SCORE != 0 {
            return Err(ConfigError::InvalidTarget);
        }

        if self.entry_threshold > self.target_score {
            return Err(ConfigError::InvalidEntryThreshold {
                threshold: self.entry_threshold,
                target: self.target_score,
            });
        }

        Ok(())
    }

    /// Player ids in turn order
    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.seats.iter().map(|s| s.player_id).collect()
    }

    pub fn seat(&self, player_id: PlayerId) -> Option<&Seat> {
        self.seats.iter().find(|s| s.player_id == player_id)
    }
}
