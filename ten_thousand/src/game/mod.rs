//! Ten Thousand game engine - scoring, turn and match state machines.
//!
//! This module provides the rules of the game:
//! - Combination scoring for any set of dice faces
//! - Selection validation, bust detection and exact-win checks
//! - The per-turn state machine (roll, select, commit, bank, bust)
//! - The match state machine with seat rotation, history and events

// Submodules
pub mod config;
pub mod constants;
pub mod entities;
pub mod errors;
pub mod ports;
pub mod scoring;
pub mod snapshot;
pub mod state_machine;
pub mod turn;
pub mod validation;

pub use config::{MatchConfig, Seat, SeatKind};
pub use errors::{ConfigError, GameError, GameResult, SelectionError, SnapshotError, TransitionError};
pub use ports::{MatchRecorder, MemoryStore, NullRecorder, PlayerDirectory, PlayerProfile};
pub use snapshot::MatchSnapshot;
pub use state_machine::{BustReason, GameEvent, Match, MatchPhase, MatchState};
pub use turn::{RollOutcome, Turn, TurnAction, TurnPhase, TurnState};
