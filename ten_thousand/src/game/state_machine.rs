//! Match state machine.
//!
//! A match moves `NotStarted -> InProgress -> Completed`. While in progress
//! exactly one [`Turn`] is active; every command is delegated to it, and
//! when it ends the turn is recorded, the seat rotates and a fresh turn
//! opens. A bank that lands exactly on the target completes the match; a
//! bank that would pass it forfeits the turn.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::{
    collections::{HashMap, VecDeque},
    fmt,
};

use super::{
    config::{MatchConfig, SeatKind},
    entities::{DieId, Face, MatchId, PlayerId, PlayerTurnRecord, ScoreResult, TurnOutcome},
    errors::{GameError, GameResult, SelectionError, SnapshotError, TransitionError},
    ports::{MatchRecorder, PlayerDirectory, PlayerProfile},
    snapshot::MatchSnapshot,
    turn::{RollOutcome, Turn},
    validation::{has_won, scoring_subsets},
};
use crate::{
    bot::{BotPolicy, ContinueContext},
    rng::RandomSource,
};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum MatchPhase {
    NotStarted,
    InProgress,
    Completed,
}

impl fmt::Display for MatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::NotStarted => "not started",
            Self::InProgress => "in progress",
            Self::Completed => "completed",
        };
        write!(f, "{repr}")
    }
}

/// Match bookkeeping shared with storage collaborators.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct MatchState {
    pub match_id: MatchId,
    /// Turn order.
    pub player_ids: Vec<PlayerId>,
    pub target_score: u32,
    pub current_player_index: usize,
    /// Starts at 1 and increments each time play wraps to the first seat.
    pub current_round: u32,
    pub is_completed: bool,
    pub winner_id: Option<PlayerId>,
}

/// Why a turn ended without points.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum BustReason {
    NoScoringDice,
    Overshot,
}

impl fmt::Display for BustReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::NoScoringDice => "no scoring dice",
            Self::Overshot => "overshot the target",
        };
        write!(f, "{repr}")
    }
}

/// Events that occur during gameplay
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum GameEvent {
    MatchStarted {
        match_id: MatchId,
        player_ids: Vec<PlayerId>,
    },
    TurnStarted {
        player_id: PlayerId,
        round: u32,
    },
    DiceRolled {
        player_id: PlayerId,
        faces: Vec<Face>,
    },
    /// Every die was locked, so all six were freed for this roll.
    HotDice {
        player_id: PlayerId,
    },
    SelectionCommitted {
        player_id: PlayerId,
        score: ScoreResult,
        turn_score: u32,
    },
    SelectionInvalid {
        player_id: PlayerId,
        reason: SelectionError,
    },
    TurnBusted {
        player_id: PlayerId,
        reason: BustReason,
        forfeited: u32,
    },
    TurnBanked {
        player_id: PlayerId,
        points: u32,
        total: u32,
    },
    MatchWon {
        player_id: PlayerId,
        total: u32,
    },
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::MatchStarted {
                match_id,
                player_ids,
            } => format!("match {match_id} started with {} players", player_ids.len()),
            Self::TurnStarted { player_id, round } => {
                format!("round {round}: player {player_id}'s turn")
            }
            Self::DiceRolled { player_id, faces } => {
                format!("player {player_id} rolled {faces:?}")
            }
            Self::HotDice { player_id } => format!("hot dice! player {player_id} rolls all six"),
            Self::SelectionCommitted {
                player_id,
                score,
                turn_score,
            } => format!("player {player_id} kept {score}, turn at {turn_score}"),
            Self::SelectionInvalid { player_id, reason } => {
                format!("player {player_id} made an invalid selection: {reason}")
            }
            Self::TurnBusted {
                player_id,
                reason,
                forfeited,
            } => format!("player {player_id} busted ({reason}), lost {forfeited}"),
            Self::TurnBanked {
                player_id,
                points,
                total,
            } => format!("player {player_id} banked {points} for {total}"),
            Self::MatchWon { player_id, total } => {
                format!("player {player_id} won with {total}")
            }
        };
        write!(f, "{repr}")
    }
}

/// A single game of Ten Thousand.
pub struct Match {
    config: MatchConfig,
    players: Vec<PlayerProfile>,
    state: MatchState,
    phase: MatchPhase,
    /// Banked totals, indexed like `state.player_ids`.
    scores: Vec<u32>,
    turn: Option<Turn>,
    history: Vec<PlayerTurnRecord>,
    policies: HashMap<PlayerId, BotPolicy>,
    events: VecDeque<GameEvent>,
    rng: Box<dyn RandomSource + Send>,
    recorder: Box<dyn MatchRecorder + Send>,
}

impl fmt::Debug for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Match")
            .field("state", &self.state)
            .field("phase", &self.phase)
            .field("scores", &self.scores)
            .field("turn", &self.turn)
            .finish_non_exhaustive()
    }
}

fn bot_policies(config: &MatchConfig) -> HashMap<PlayerId, BotPolicy> {
    config
        .seats
        .iter()
        .filter_map(|seat| match seat.kind {
            SeatKind::Bot(difficulty) => Some((
                seat.player_id,
                BotPolicy::new(difficulty, config.target_score, config.entry_threshold),
            )),
            SeatKind::Human => None,
        })
        .collect()
}

impl Match {
    /// Create a match. Every seat must resolve through `directory`.
    pub fn new(
        config: MatchConfig,
        directory: &dyn PlayerDirectory,
        rng: impl RandomSource + Send + 'static,
        recorder: impl MatchRecorder + Send + 'static,
    ) -> GameResult<Self> {
        config.validate()?;
        let players = config
            .player_ids()
            .into_iter()
            .map(|id| directory.get_player(id).ok_or(GameError::UnknownPlayer(id)))
            .collect::<GameResult<Vec<_>>>()?;

        let state = MatchState {
            match_id: uuid::Uuid::new_v4(),
            player_ids: config.player_ids(),
            target_score: config.target_score,
            current_player_index: 0,
            current_round: 1,
            is_completed: false,
            winner_id: None,
        };
        debug!("created match {} for {:?}", state.match_id, state.player_ids);

        Ok(Self {
            scores: vec![0; players.len()],
            policies: bot_policies(&config),
            config,
            players,
            state,
            phase: MatchPhase::NotStarted,
            turn: None,
            history: Vec::new(),
            events: VecDeque::new(),
            rng: Box::new(rng),
            recorder: Box::new(recorder),
        })
    }

    /// Resume a match from a snapshot.
    pub fn restore(
        snapshot: MatchSnapshot,
        rng: impl RandomSource + Send + 'static,
        recorder: impl MatchRecorder + Send + 'static,
    ) -> Result<Self, SnapshotError> {
        snapshot.check_consistency()?;
        let MatchSnapshot {
            config,
            players,
            state,
            phase,
            scores,
            turn,
            history,
        } = snapshot;
        let turn = turn.map(|t| Turn::from_state(t, config.entry_threshold));
        info!("restored match {} ({phase})", state.match_id);

        Ok(Self {
            policies: bot_policies(&config),
            config,
            players,
            state,
            phase,
            scores,
            turn,
            history,
            events: VecDeque::new(),
            rng: Box::new(rng),
            recorder: Box::new(recorder),
        })
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            config: self.config.clone(),
            players: self.players.clone(),
            state: self.state.clone(),
            phase: self.phase,
            scores: self.scores.clone(),
            turn: self.turn.as_ref().map(|t| t.state().clone()),
            history: self.history.clone(),
        }
    }

    // === Getters ===

    pub fn id(&self) -> MatchId {
        self.state.match_id
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn players(&self) -> &[PlayerProfile] {
        &self.players
    }

    pub fn current_player_id(&self) -> PlayerId {
        self.state.player_ids[self.state.current_player_index]
    }

    /// Banked total for a player.
    pub fn score_of(&self, player_id: PlayerId) -> Option<u32> {
        self.seat_index(player_id).map(|i| self.scores[i])
    }

    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    /// The active turn, if the match is in progress.
    pub fn turn(&self) -> Option<&Turn> {
        self.turn.as_ref()
    }

    pub fn history(&self) -> &[PlayerTurnRecord] {
        &self.history
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.state.winner_id
    }

    pub fn is_bot(&self, player_id: PlayerId) -> bool {
        self.policies.contains_key(&player_id)
    }

    pub fn current_is_bot(&self) -> bool {
        self.is_bot(self.current_player_id())
    }

    pub fn drain_events(&mut self) -> VecDeque<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn seat_index(&self, player_id: PlayerId) -> Option<usize> {
        self.state.player_ids.iter().position(|&id| id == player_id)
    }

    // === Commands ===

    pub fn start(&mut self) -> GameResult<()> {
        match self.phase {
            MatchPhase::NotStarted => {}
            MatchPhase::InProgress => return Err(GameError::MatchAlreadyStarted),
            MatchPhase::Completed => return Err(GameError::MatchAlreadyCompleted),
        }
        self.phase = MatchPhase::InProgress;
        info!(
            "match {} started: {} players, target {}",
            self.state.match_id,
            self.players.len(),
            self.state.target_score
        );
        self.events.push_back(GameEvent::MatchStarted {
            match_id: self.state.match_id,
            player_ids: self.state.player_ids.clone(),
        });
        self.open_turn();
        Ok(())
    }

    fn ensure_in_progress(&self) -> GameResult<()> {
        match self.phase {
            MatchPhase::InProgress => Ok(()),
            MatchPhase::NotStarted => Err(GameError::MatchNotStarted),
            MatchPhase::Completed => Err(GameError::MatchAlreadyCompleted),
        }
    }

    fn active_turn(&mut self) -> GameResult<&mut Turn> {
        self.ensure_in_progress()?;
        self.turn.as_mut().ok_or(GameError::MatchNotStarted)
    }

    fn rejected<T>(&self, result: GameResult<T>) -> GameResult<T> {
        if let Err(error) = &result {
            warn!("player {}: {error}", self.current_player_id());
        }
        result
    }

    /// Roll the active player's unlocked dice.
    pub fn roll(&mut self) -> GameResult<RollOutcome> {
        self.ensure_in_progress()?;
        let player_id = self.current_player_id();
        let result = match self.turn.as_mut() {
            Some(turn) => turn.roll(self.rng.as_mut()),
            None => Err(GameError::MatchNotStarted),
        };
        let outcome = self.rejected(result)?;

        if matches!(outcome, RollOutcome::HotDice { .. }) {
            self.events.push_back(GameEvent::HotDice { player_id });
        }
        self.events.push_back(GameEvent::DiceRolled {
            player_id,
            faces: outcome.faces().to_vec(),
        });

        if let RollOutcome::Busted { forfeited, .. } = outcome {
            debug!("player {player_id} busted, {forfeited} forfeited");
            self.events.push_back(GameEvent::TurnBusted {
                player_id,
                reason: BustReason::NoScoringDice,
                forfeited,
            });
            self.finish_turn(TurnOutcome::Busted, 0);
        }
        Ok(outcome)
    }

    pub fn select(&mut self, ids: &[DieId]) -> GameResult<()> {
        let result = self.active_turn()?.select(ids);
        self.rejected(result)
    }

    pub fn deselect(&mut self, ids: &[DieId]) -> GameResult<()> {
        let result = self.active_turn()?.deselect(ids);
        self.rejected(result)
    }

    /// Score the selected dice and lock them.
    pub fn commit_selection(&mut self) -> GameResult<ScoreResult> {
        let player_id = self.current_player_id();
        let turn = self.active_turn()?;
        let result = turn.commit_selection();
        let turn_score = turn.current_turn_score();

        match &result {
            Ok(score) => self.events.push_back(GameEvent::SelectionCommitted {
                player_id,
                score: score.clone(),
                turn_score,
            }),
            Err(GameError::InvalidSelection(reason)) => {
                self.events.push_back(GameEvent::SelectionInvalid {
                    player_id,
                    reason: reason.clone(),
                })
            }
            Err(_) => {}
        }
        self.rejected(result)
    }

    /// End the turn keeping its points, unless they pass the target.
    pub fn bank(&mut self) -> GameResult<TurnOutcome> {
        let result = self.active_turn()?.bank();
        let points = self.rejected(result)?;

        let index = self.state.current_player_index;
        let player_id = self.current_player_id();
        let target = self.state.target_score;
        let total = self.scores[index].saturating_add(points);

        if total > target {
            debug!("player {player_id} overshot: {total} > {target}");
            self.events.push_back(GameEvent::TurnBusted {
                player_id,
                reason: BustReason::Overshot,
                forfeited: points,
            });
            self.finish_turn(TurnOutcome::Overshot, 0);
            return Ok(TurnOutcome::Overshot);
        }

        self.scores[index] = total;
        self.events.push_back(GameEvent::TurnBanked {
            player_id,
            points,
            total,
        });

        if has_won(total, target) {
            self.finish_turn(TurnOutcome::Won, points);
            self.complete(player_id);
            Ok(TurnOutcome::Won)
        } else {
            self.finish_turn(TurnOutcome::Banked, points);
            Ok(TurnOutcome::Banked)
        }
    }

    /// Play the active seat's whole turn with its bot policy.
    pub fn play_bot_turn(&mut self) -> GameResult<TurnOutcome> {
        self.ensure_in_progress()?;
        let player_id = self.current_player_id();
        let policy = self
            .policies
            .get(&player_id)
            .cloned()
            .ok_or(TransitionError::NotABot(player_id))?;
        let index = self.state.current_player_index;

        loop {
            if self.roll()?.is_bust() {
                return Ok(TurnOutcome::Busted);
            }

            let available = self.active_turn()?.dice().rollable();
            let subsets = scoring_subsets(&available);
            let keep = policy.select_dice(&available, &subsets);
            self.select(&keep)?;
            self.commit_selection()?;

            let turn = self.active_turn()?;
            let (current_turn_score, available_dice_count) =
                (turn.current_turn_score(), turn.dice_to_roll());
            let ctx = ContinueContext {
                current_turn_score,
                available_dice_count,
                total_score: self.scores[index],
                opponent_max_score: self
                    .scores
                    .iter()
                    .enumerate()
                    .filter(|&(i, _)| i != index)
                    .map(|(_, &s)| s)
                    .max()
                    .unwrap_or(0),
            };
            if !policy.should_continue_rolling(&ctx, self.rng.as_mut()) {
                return self.bank();
            }
        }
    }

    // === Transitions ===

    fn open_turn(&mut self) {
        let index = self.state.current_player_index;
        self.turn = Some(Turn::new(self.scores[index], self.config.entry_threshold));
        self.events.push_back(GameEvent::TurnStarted {
            player_id: self.state.player_ids[index],
            round: self.state.current_round,
        });
    }

    /// Record the ended turn and, unless the match is over, hand the dice on.
    fn finish_turn(&mut self, outcome: TurnOutcome, turn_score: u32) {
        let index = self.state.current_player_index;
        let player_id = self.state.player_ids[index];
        let record = PlayerTurnRecord {
            player_id,
            round: self.state.current_round,
            turn_score,
            total_score_after: self.scores[index],
            dice_rolls_used: self.turn.as_ref().map_or(0, Turn::rolls_this_turn),
            outcome,
            recorded_at: chrono::Utc::now(),
        };
        debug!(
            "player {player_id} turn {outcome}: {turn_score} ({} total)",
            record.total_score_after
        );
        self.recorder.record_turn(player_id, &record);
        self.history.push(record);

        if outcome != TurnOutcome::Won {
            self.state.current_player_index = (index + 1) % self.state.player_ids.len();
            if self.state.current_player_index == 0 {
                self.state.current_round += 1;
            }
            self.open_turn();
        }
    }

    fn complete(&mut self, winner_id: PlayerId) {
        let total = self.state.target_score;
        self.phase = MatchPhase::Completed;
        self.state.is_completed = true;
        self.state.winner_id = Some(winner_id);
        self.turn = None;
        self.recorder.record_match_result(self.state.match_id, winner_id);
        self.events.push_back(GameEvent::MatchWon {
            player_id: winner_id,
            total,
        });
        info!(
            "match {} won by player {winner_id} in round {}",
            self.state.match_id, self.state.current_round
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::BotDifficulty;
    use crate::game::{
        config::Seat,
        errors::ConfigError,
        ports::{MemoryStore, NullRecorder},
        turn::TurnPhase,
    };
    use crate::rng::{RngSource, ScriptedSource};

    fn store() -> MemoryStore {
        MemoryStore::new()
            .with_player(1, "alice")
            .with_player(2, "bob")
            .with_player(3, "carol")
    }

    fn two_humans(rng: ScriptedSource) -> Match {
        let config = MatchConfig::new(vec![Seat::human(1), Seat::human(2)]);
        let mut game = Match::new(config, &store(), rng, NullRecorder).unwrap();
        game.start().unwrap();
        game
    }

    // === Lifecycle ===

    #[test]
    fn test_new_match_validates_config() {
        let config = MatchConfig::new(vec![]);
        let err = Match::new(config, &store(), ScriptedSource::new([]), NullRecorder).unwrap_err();
        assert_eq!(err, GameError::Config(ConfigError::NoPlayers));
    }

    #[test]
    fn test_new_match_resolves_players() {
        let config = MatchConfig::new(vec![Seat::human(1), Seat::human(9)]);
        let err = Match::new(config, &store(), ScriptedSource::new([]), NullRecorder).unwrap_err();
        assert_eq!(err, GameError::UnknownPlayer(9));
    }

    #[test]
    fn test_commands_before_start() {
        let config = MatchConfig::new(vec![Seat::human(1)]);
        let mut game = Match::new(config, &store(), ScriptedSource::new([]), NullRecorder).unwrap();
        assert_eq!(game.phase(), MatchPhase::NotStarted);
        assert_eq!(game.roll().unwrap_err(), GameError::MatchNotStarted);
        assert_eq!(game.bank().unwrap_err(), GameError::MatchNotStarted);
    }

    #[test]
    fn test_start_opens_first_turn() {
        let mut game = two_humans(ScriptedSource::new([]));
        assert_eq!(game.phase(), MatchPhase::InProgress);
        assert_eq!(game.current_player_id(), 1);
        assert_eq!(game.state().current_round, 1);
        assert_eq!(game.start().unwrap_err(), GameError::MatchAlreadyStarted);

        let events = game.drain_events();
        assert!(matches!(events[0], GameEvent::MatchStarted { .. }));
        assert_eq!(
            events[1],
            GameEvent::TurnStarted {
                player_id: 1,
                round: 1
            }
        );
        assert!(game.drain_events().is_empty());
    }

    // === Turns ===

    #[test]
    fn test_bust_rotates_and_records() {
        let store = store();
        let config = MatchConfig::new(vec![Seat::human(1), Seat::human(2)]);
        let rng = ScriptedSource::new([2, 3, 4, 6, 6, 2]);
        let mut game = Match::new(config, &store, rng, store.clone()).unwrap();
        game.start().unwrap();
        game.drain_events();

        let outcome = game.roll().unwrap();
        assert!(outcome.is_bust());
        assert_eq!(game.current_player_id(), 2);
        assert_eq!(game.turn().map(Turn::phase), Some(TurnPhase::AwaitingRoll));

        let records = store.turns_for(1);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].outcome, TurnOutcome::Busted);
        assert_eq!(records[0].turn_score, 0);
        assert_eq!(records[0].dice_rolls_used, 1);

        let events = game.drain_events();
        assert!(events.contains(&GameEvent::TurnBusted {
            player_id: 1,
            reason: BustReason::NoScoringDice,
            forfeited: 0
        }));
    }

    #[test]
    fn test_round_increments_on_wrap() {
        let mut game = two_humans(ScriptedSource::new([2, 3, 4, 6, 6, 2]));
        game.roll().unwrap();
        assert_eq!(game.state().current_round, 1);
        game.roll().unwrap();
        assert_eq!(game.current_player_id(), 1);
        assert_eq!(game.state().current_round, 2);
    }

    #[test]
    fn test_bank_adds_to_total() {
        let mut game = two_humans(ScriptedSource::new([1, 1, 1, 5, 2, 3]));
        game.roll().unwrap();
        game.select(&[0, 1, 2]).unwrap();
        game.commit_selection().unwrap();
        assert_eq!(game.bank().unwrap(), TurnOutcome::Banked);
        assert_eq!(game.score_of(1), Some(1000));
        assert_eq!(game.current_player_id(), 2);
    }

    #[test]
    fn test_invalid_selection_emits_event() {
        let mut game = two_humans(ScriptedSource::new([1, 2, 3, 4, 6, 6]));
        game.roll().unwrap();
        game.drain_events();
        game.select(&[1]).unwrap();

        let err = game.commit_selection().unwrap_err();
        assert_eq!(err, GameError::InvalidSelection(SelectionError::NoScore));
        assert_eq!(
            game.drain_events().back(),
            Some(&GameEvent::SelectionInvalid {
                player_id: 1,
                reason: SelectionError::NoScore
            })
        );
    }

    #[test]
    fn test_bank_below_entry_threshold_is_rejected() {
        let mut game = two_humans(ScriptedSource::new([5, 2, 3, 4, 6, 6]));
        game.roll().unwrap();
        game.select(&[0]).unwrap();
        game.commit_selection().unwrap();
        assert_eq!(
            game.bank().unwrap_err(),
            GameError::IllegalTransition(TransitionError::BelowEntryThreshold {
                turn_score: 50,
                threshold: 500
            })
        );
        assert_eq!(game.current_player_id(), 1);
    }

    // === Bots ===

    #[test]
    fn test_play_bot_turn_requires_bot_seat() {
        let mut game = two_humans(ScriptedSource::new([]));
        assert_eq!(
            game.play_bot_turn().unwrap_err(),
            GameError::IllegalTransition(TransitionError::NotABot(1))
        );
    }

    #[test]
    fn test_bot_match_runs_to_completion() {
        let store = store();
        let config = MatchConfig::new(vec![
            Seat::bot(1, BotDifficulty::Beginner),
            Seat::bot(2, BotDifficulty::Intermediate),
            Seat::bot(3, BotDifficulty::Expert),
        ])
        .with_target_score(2000);
        let mut game = Match::new(config, &store, RngSource::seeded(42), store.clone()).unwrap();
        game.start().unwrap();

        let mut turns = 0;
        while game.phase() == MatchPhase::InProgress {
            assert!(game.current_is_bot());
            game.play_bot_turn().unwrap();
            turns += 1;
            assert!(turns < 10_000, "match did not finish");
        }

        let winner = game.winner().unwrap();
        assert_eq!(game.score_of(winner), Some(2000));
        assert_eq!(store.match_results(), vec![(game.id(), winner)]);
        assert_eq!(store.turn_count(), game.history().len());
        assert_eq!(game.roll().unwrap_err(), GameError::MatchAlreadyCompleted);
    }
}
