//! # Ten Thousand
//!
//! A rules engine for the dice game Ten Thousand (also known as Farkle),
//! built around two small finite state machines.
//!
//! Players take turns rolling six dice. After each roll they must keep at
//! least one scoring combination, then either roll the remaining dice again
//! or bank the turn's points. A roll with nothing scoring busts the turn and
//! loses its points. The first player to land exactly on the target score
//! (10000 by default) wins; a bank that would pass it is forfeited.
//!
//! ## Architecture
//!
//! - **Turn**: `AwaitingRoll -> Rolled -> {Banked | Busted}`, with hot dice
//!   freeing all six dice once every die has been kept
//! - **Match**: `NotStarted -> InProgress -> Completed`, rotating seats and
//!   recording each finished turn
//!
//! All randomness is injected through [`rng::RandomSource`], and storage is
//! reached only through the traits in [`game::ports`].
//!
//! ## Core Modules
//!
//! - [`game`]: Scoring, validation, turn and match state machines
//! - [`bot`]: Computer opponents with difficulty presets
//! - [`rng`]: Injectable randomness
//!
//! ## Example
//!
//! ```
//! use ten_thousand::{Match, MatchConfig, MemoryStore, NullRecorder, Seat};
//! use ten_thousand::rng::ScriptedSource;
//!
//! let store = MemoryStore::new().with_player(1, "alice").with_player(2, "bob");
//! let config = MatchConfig::new(vec![Seat::human(1), Seat::human(2)]);
//! let rng = ScriptedSource::new([1, 1, 1, 5, 2, 3]);
//!
//! let mut game = Match::new(config, &store, rng, NullRecorder).unwrap();
//! game.start().unwrap();
//! game.roll().unwrap();
//! game.select(&[0, 1, 2, 3]).unwrap();
//! let score = game.commit_selection().unwrap();
//! assert_eq!(score.points, 1050);
//! game.bank().unwrap();
//! assert_eq!(game.score_of(1), Some(1050));
//! ```

/// Computer opponents.
pub mod bot;

/// Core game logic, entities, and state machines.
pub mod game;
pub use game::{
    GameError, GameEvent, GameResult, Match, MatchConfig, MatchPhase, MatchSnapshot, MemoryStore,
    NullRecorder, Seat, SeatKind,
    constants::{self, DEFAULT_ENTRY_THRESHOLD, DEFAULT_TARGET_SCORE, NUM_DICE},
    entities::{self, DiceSet, Die, PlayerId, ScoreResult, TurnOutcome},
    scoring,
};

/// Injectable randomness.
pub mod rng;
