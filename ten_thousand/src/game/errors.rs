//! Engine error types.
//!
//! Every error is recoverable: the rejected command leaves the match exactly
//! as it was. Busting is a normal transition, never an error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    entities::{DieId, PlayerId},
    turn::{TurnAction, TurnPhase},
};

/// Why a dice selection can't be committed.
#[derive(Clone, Debug, Deserialize, Eq, Error, Hash, PartialEq, Serialize)]
pub enum SelectionError {
    #[error("no dice selected")]
    NoDiceSelected,
    #[error("selection doesn't score")]
    NoScore,
    #[error("die {0} does not exist")]
    UnknownDie(DieId),
    #[error("die {0} is already locked")]
    DieLocked(DieId),
}

/// Commands issued in a phase that doesn't accept them.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum TransitionError {
    #[error("can't {action} while the turn is {phase}")]
    WrongPhase { action: TurnAction, phase: TurnPhase },
    #[error("commit a scoring selection first")]
    NothingCommitted,
    #[error("need {threshold} points this turn to get on the board (have {turn_score})")]
    BelowEntryThreshold { turn_score: u32, threshold: u32 },
    #[error("player {0} is not a bot")]
    NotABot(PlayerId),
}

/// Invalid match configuration.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum ConfigError {
    #[error("need at least one player")]
    NoPlayers,
    #[error("at most {max} players allowed, got {got}")]
    TooManyPlayers { max: usize, got: usize },
    #[error("player {0} is seated twice")]
    DuplicatePlayer(PlayerId),
    #[error("target score must be a positive multiple of 50")]
    InvalidTarget,
    #[error("entry threshold {threshold} exceeds target score {target}")]
    InvalidEntryThreshold { threshold: u32, target: u32 },
}

/// Errors surfaced by the turn and match state machines.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum GameError {
    #[error("invalid selection: {0}")]
    InvalidSelection(#[from] SelectionError),
    #[error("illegal transition: {0}")]
    IllegalTransition(#[from] TransitionError),
    #[error("match already completed")]
    MatchAlreadyCompleted,
    #[error("match not started")]
    MatchNotStarted,
    #[error("match already started")]
    MatchAlreadyStarted,
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
}

/// Errors from encoding, decoding or restoring a match snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("encode error: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("decode error: {0}")]
    Decode(#[from] bincode::error::DecodeError),
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
    #[error("inconsistent snapshot: {0}")]
    Inconsistent(String),
}

/// Result type for engine operations.
pub type GameResult<T> = Result<T, GameError>;
