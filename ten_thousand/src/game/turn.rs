//! Turn state machine.
//!
//! A turn moves `AwaitingRoll -> Rolled -> {Banked | Busted}`. Selecting
//! dice is a mutation while `Rolled` and never changes the phase. Rolling
//! again requires a commit since the previous roll; when every die has been
//! locked the next roll frees all six ("hot dice") and the turn score
//! carries forward.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{
    entities::{DiceSet, DieId, Face, ScoreResult},
    errors::{GameError, GameResult, TransitionError},
    validation::{has_any_scoring_option, validate_selection},
};
use crate::rng::RandomSource;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum TurnPhase {
    AwaitingRoll,
    Rolled,
    Banked,
    Busted,
}

impl TurnPhase {
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(self, Self::Banked | Self::Busted)
    }
}

impl fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::AwaitingRoll => "awaiting a roll",
            Self::Rolled => "rolled",
            Self::Banked => "banked",
            Self::Busted => "busted",
        };
        write!(f, "{repr}")
    }
}

/// Commands a turn accepts.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum TurnAction {
    Roll,
    Select,
    Deselect,
    Commit,
    Bank,
    Bust,
}

impl fmt::Display for TurnAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Roll => "roll",
            Self::Select => "select",
            Self::Deselect => "deselect",
            Self::Commit => "commit",
            Self::Bank => "bank",
            Self::Bust => "bust",
        };
        write!(f, "{repr}")
    }
}

/// Everything needed to resume a turn exactly.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TurnState {
    pub dice: DiceSet,
    pub current_turn_score: u32,
    pub rolls_this_turn: u32,
    /// Whether the player is on the board: either a prior bank or this
    /// turn reaching the entry threshold.
    pub has_entered_scoring: bool,
    pub phase: TurnPhase,
    pub commits_this_turn: u32,
    pub committed_since_roll: bool,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RollOutcome {
    /// Faces of the dice that were rolled, in die id order.
    Rolled { faces: Vec<Face> },
    /// All six dice were freed and rolled.
    HotDice { faces: Vec<Face> },
    Busted { faces: Vec<Face>, forfeited: u32 },
}

impl RollOutcome {
    #[must_use]
    pub fn faces(&self) -> &[Face] {
        match self {
            Self::Rolled { faces } | Self::HotDice { faces } | Self::Busted { faces, .. } => faces,
        }
    }

    #[must_use]
    pub const fn is_bust(&self) -> bool {
        matches!(self, Self::Busted { .. })
    }
}

/// One player's turn.
#[derive(Clone, Debug)]
pub struct Turn {
    state: TurnState,
    entry_threshold: u32,
}

impl Turn {
    /// Fresh turn for a player with `prior_total` points banked.
    #[must_use]
    pub fn new(prior_total: u32, entry_threshold: u32) -> Self {
        Self {
            state: TurnState {
                dice: DiceSet::default(),
                current_turn_score: 0,
                rolls_this_turn: 0,
                has_entered_scoring: prior_total > 0 || entry_threshold == 0,
                phase: TurnPhase::AwaitingRoll,
                commits_this_turn: 0,
                committed_since_roll: false,
            },
            entry_threshold,
        }
    }

    /// Resume a turn from a snapshot.
    #[must_use]
    pub fn from_state(state: TurnState, entry_threshold: u32) -> Self {
        Self {
            state,
            entry_threshold,
        }
    }

    #[must_use]
    pub fn state(&self) -> &TurnState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.state.phase
    }

    #[must_use]
    pub fn dice(&self) -> &DiceSet {
        &self.state.dice
    }

    #[must_use]
    pub fn current_turn_score(&self) -> u32 {
        self.state.current_turn_score
    }

    #[must_use]
    pub fn rolls_this_turn(&self) -> u32 {
        self.state.rolls_this_turn
    }

    #[must_use]
    pub fn has_entered_scoring(&self) -> bool {
        self.state.has_entered_scoring
    }

    #[must_use]
    pub fn entry_threshold(&self) -> u32 {
        self.entry_threshold
    }

    /// Every die is locked, so the next roll frees all six.
    #[must_use]
    pub fn hot_dice_pending(&self) -> bool {
        self.state.dice.all_locked()
    }

    /// Dice the next roll would throw.
    #[must_use]
    pub fn dice_to_roll(&self) -> usize {
        if self.hot_dice_pending() {
            self.state.dice.dice().len()
        } else {
            self.state.dice.rollable().len()
        }
    }

    fn require_phase(&self, action: TurnAction, phase: TurnPhase) -> GameResult<()> {
        if self.state.phase == phase {
            Ok(())
        } else {
            Err(TransitionError::WrongPhase {
                action,
                phase: self.state.phase,
            }
            .into())
        }
    }

    /// Roll every unlocked die. A roll with nothing scoring busts the turn.
    pub fn roll(&mut self, rng: &mut dyn RandomSource) -> GameResult<RollOutcome> {
        match self.state.phase {
            TurnPhase::AwaitingRoll => {}
            TurnPhase::Rolled if self.state.committed_since_roll => {}
            TurnPhase::Rolled => return Err(TransitionError::NothingCommitted.into()),
            phase => {
                return Err(TransitionError::WrongPhase {
                    action: TurnAction::Roll,
                    phase,
                }
                .into());
            }
        }

        let hot_dice = self.hot_dice_pending();
        if hot_dice {
            self.state.dice.unlock_all();
        }
        self.state.dice.clear_selection();
        let faces = self.state.dice.reroll(rng);
        self.state.rolls_this_turn += 1;
        self.state.committed_since_roll = false;
        debug!(
            "roll #{}: {faces:?} (hot dice: {hot_dice})",
            self.state.rolls_this_turn
        );

        if !has_any_scoring_option(&faces) {
            let forfeited = self.state.current_turn_score;
            self.state.current_turn_score = 0;
            self.state.phase = TurnPhase::Busted;
            debug!("bust, {forfeited} points forfeited");
            return Ok(RollOutcome::Busted { faces, forfeited });
        }

        self.state.phase = TurnPhase::Rolled;
        Ok(if hot_dice {
            RollOutcome::HotDice { faces }
        } else {
            RollOutcome::Rolled { faces }
        })
    }

    pub fn select(&mut self, ids: &[DieId]) -> GameResult<()> {
        self.require_phase(TurnAction::Select, TurnPhase::Rolled)?;
        self.state.dice.select(ids)?;
        Ok(())
    }

    pub fn deselect(&mut self, ids: &[DieId]) -> GameResult<()> {
        self.require_phase(TurnAction::Deselect, TurnPhase::Rolled)?;
        self.state.dice.deselect(ids)?;
        Ok(())
    }

    /// Lock the selected dice and add their points to the turn score.
    pub fn commit_selection(&mut self) -> GameResult<ScoreResult> {
        self.require_phase(TurnAction::Commit, TurnPhase::Rolled)?;
        let score = validate_selection(&self.state.dice.selected_faces())?;

        self.state.dice.lock_selected();
        self.state.current_turn_score += score.points;
        self.state.commits_this_turn += 1;
        self.state.committed_since_roll = true;
        if self.state.current_turn_score >= self.entry_threshold {
            self.state.has_entered_scoring = true;
        }
        debug!(
            "committed {score}, turn score {}",
            self.state.current_turn_score
        );
        Ok(score)
    }

    /// End the turn keeping its points.
    pub fn bank(&mut self) -> GameResult<u32> {
        self.require_phase(TurnAction::Bank, TurnPhase::Rolled)?;
        if self.state.commits_this_turn == 0 {
            return Err(TransitionError::NothingCommitted.into());
        }
        if !self.state.has_entered_scoring {
            return Err(TransitionError::BelowEntryThreshold {
                turn_score: self.state.current_turn_score,
                threshold: self.entry_threshold,
            }
            .into());
        }
        self.state.phase = TurnPhase::Banked;
        Ok(self.state.current_turn_score)
    }

    /// Force the turn to end without points. Returns what was forfeited.
    pub fn bust(&mut self) -> GameResult<u32> {
        if self.state.phase.is_finished() {
            return Err(GameError::IllegalTransition(TransitionError::WrongPhase {
                action: TurnAction::Bust,
                phase: self.state.phase,
            }));
        }
        let forfeited = self.state.current_turn_score;
        self.state.current_turn_score = 0;
        self.state.phase = TurnPhase::Busted;
        Ok(forfeited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::errors::SelectionError;
    use crate::rng::ScriptedSource;

    const ENTRY: u32 = 500;

    fn rolled_turn(prior_total: u32, faces: [Face; 6]) -> Turn {
        let mut turn = Turn::new(prior_total, ENTRY);
        let mut rng = ScriptedSource::new(faces);
        turn.roll(&mut rng).unwrap();
        turn
    }

    #[test]
    fn test_new_turn_awaits_roll() {
        let turn = Turn::new(0, ENTRY);
        assert_eq!(turn.phase(), TurnPhase::AwaitingRoll);
        assert_eq!(turn.current_turn_score(), 0);
        assert!(!turn.has_entered_scoring());
        assert!(Turn::new(350, ENTRY).has_entered_scoring());
        assert!(Turn::new(0, 0).has_entered_scoring());
    }

    #[test]
    fn test_first_roll() {
        let turn = rolled_turn(0, [1, 1, 1, 5, 5, 2]);
        assert_eq!(turn.phase(), TurnPhase::Rolled);
        assert_eq!(turn.dice().faces(), [1, 1, 1, 5, 5, 2]);
        assert_eq!(turn.rolls_this_turn(), 1);
    }

    #[test]
    fn test_commit_scores_and_locks() {
        let mut turn = rolled_turn(0, [1, 1, 1, 5, 5, 2]);
        turn.select(&[0, 1, 2, 3, 4]).unwrap();
        let score = turn.commit_selection().unwrap();

        assert_eq!(score.points, 1100);
        assert_eq!(turn.current_turn_score(), 1100);
        assert_eq!(turn.dice().locked_count(), 5);
        assert!(turn.dice().selected().is_empty());
        assert!(turn.has_entered_scoring());
    }

    #[test]
    fn test_commit_dead_die_fails_without_change() {
        let mut turn = rolled_turn(0, [1, 1, 1, 5, 5, 2]);
        turn.select(&[5]).unwrap();
        let err = turn.commit_selection().unwrap_err();

        assert_eq!(err, GameError::InvalidSelection(SelectionError::NoScore));
        assert_eq!(turn.current_turn_score(), 0);
        assert_eq!(turn.dice().locked_count(), 0);
        assert_eq!(turn.phase(), TurnPhase::Rolled);
    }

    #[test]
    fn test_commit_nothing_selected() {
        let mut turn = rolled_turn(0, [1, 1, 1, 5, 5, 2]);
        assert_eq!(
            turn.commit_selection(),
            Err(GameError::InvalidSelection(SelectionError::NoDiceSelected))
        );
    }

    #[test]
    fn test_roll_bust_discards_turn_score() {
        let mut turn = Turn::new(0, ENTRY);
        let mut rng = ScriptedSource::new([1, 1, 1, 5, 5, 2, 3]);
        turn.roll(&mut rng).unwrap();
        turn.select(&[0, 1, 2, 3, 4]).unwrap();
        turn.commit_selection().unwrap();

        let outcome = turn.roll(&mut rng).unwrap();
        assert_eq!(
            outcome,
            RollOutcome::Busted {
                faces: vec![3],
                forfeited: 1100
            }
        );
        assert_eq!(turn.phase(), TurnPhase::Busted);
        assert_eq!(turn.current_turn_score(), 0);
    }

    #[test]
    fn test_first_roll_bust() {
        let mut turn = Turn::new(0, ENTRY);
        let mut rng = ScriptedSource::new([2, 2, 3, 4, 6, 3]);
        let outcome = turn.roll(&mut rng).unwrap();
        assert!(outcome.is_bust());
        assert_eq!(turn.phase(), TurnPhase::Busted);
    }

    #[test]
    fn test_roll_requires_commit() {
        let mut turn = rolled_turn(0, [1, 1, 1, 5, 5, 2]);
        let mut rng = ScriptedSource::new([1]);
        assert_eq!(
            turn.roll(&mut rng),
            Err(GameError::IllegalTransition(TransitionError::NothingCommitted))
        );

        turn.select(&[0]).unwrap();
        assert_eq!(
            turn.roll(&mut rng),
            Err(GameError::IllegalTransition(TransitionError::NothingCommitted))
        );
        assert_eq!(turn.rolls_this_turn(), 1);
    }

    #[test]
    fn test_select_before_roll_is_wrong_phase() {
        let mut turn = Turn::new(0, ENTRY);
        assert_eq!(
            turn.select(&[0]),
            Err(GameError::IllegalTransition(TransitionError::WrongPhase {
                action: TurnAction::Select,
                phase: TurnPhase::AwaitingRoll,
            }))
        );
    }

    #[test]
    fn test_bank_below_entry_threshold() {
        let mut turn = rolled_turn(0, [1, 5, 2, 3, 4, 4]);
        turn.select(&[0]).unwrap();
        turn.commit_selection().unwrap();

        assert_eq!(
            turn.bank(),
            Err(GameError::IllegalTransition(
                TransitionError::BelowEntryThreshold {
                    turn_score: 100,
                    threshold: ENTRY
                }
            ))
        );
        assert_eq!(turn.phase(), TurnPhase::Rolled);
    }

    #[test]
    fn test_bank_small_score_once_on_board() {
        let mut turn = rolled_turn(800, [1, 5, 2, 3, 4, 4]);
        turn.select(&[1]).unwrap();
        turn.commit_selection().unwrap();

        assert_eq!(turn.bank(), Ok(50));
        assert_eq!(turn.phase(), TurnPhase::Banked);
    }

    #[test]
    fn test_bank_without_commit() {
        let mut turn = rolled_turn(800, [1, 5, 2, 3, 4, 4]);
        assert_eq!(
            turn.bank(),
            Err(GameError::IllegalTransition(TransitionError::NothingCommitted))
        );
    }

    #[test]
    fn test_commands_rejected_after_bank() {
        let mut turn = rolled_turn(800, [1, 5, 2, 3, 4, 4]);
        turn.select(&[0]).unwrap();
        turn.commit_selection().unwrap();
        turn.bank().unwrap();

        let mut rng = ScriptedSource::new([1]);
        assert!(matches!(
            turn.roll(&mut rng),
            Err(GameError::IllegalTransition(TransitionError::WrongPhase { .. }))
        ));
        assert!(turn.bust().is_err());
    }

    #[test]
    fn test_hot_dice_rerolls_all_six() {
        let mut turn = Turn::new(0, ENTRY);
        let mut rng = ScriptedSource::new([1, 1, 1, 5, 5, 5, 2, 3, 4, 6, 6, 1]);
        turn.roll(&mut rng).unwrap();
        turn.select(&[0, 1, 2, 3, 4, 5]).unwrap();
        turn.commit_selection().unwrap();
        assert!(turn.hot_dice_pending());
        assert_eq!(turn.dice_to_roll(), 6);
        assert_eq!(turn.current_turn_score(), 1500);

        let outcome = turn.roll(&mut rng).unwrap();
        assert_eq!(
            outcome,
            RollOutcome::HotDice {
                faces: vec![2, 3, 4, 6, 6, 1]
            }
        );
        assert_eq!(turn.dice().locked_count(), 0);
        assert_eq!(turn.current_turn_score(), 1500);
        assert_eq!(turn.phase(), TurnPhase::Rolled);
    }

    #[test]
    fn test_bust_forces_end() {
        let mut turn = rolled_turn(0, [1, 1, 1, 5, 5, 2]);
        turn.select(&[0, 1, 2]).unwrap();
        turn.commit_selection().unwrap();
        assert_eq!(turn.bust(), Ok(1000));
        assert_eq!(turn.phase(), TurnPhase::Busted);
        assert_eq!(turn.current_turn_score(), 0);
    }

    #[test]
    fn test_bust_after_bank_names_bust() {
        let mut turn = rolled_turn(800, [1, 5, 2, 3, 4, 4]);
        turn.select(&[0]).unwrap();
        turn.commit_selection().unwrap();
        turn.bank().unwrap();

        let err = turn.bust().unwrap_err();
        assert_eq!(
            err,
            GameError::IllegalTransition(TransitionError::WrongPhase {
                action: TurnAction::Bust,
                phase: TurnPhase::Banked,
            })
        );
        assert!(err.to_string().contains("bust"));
        assert_eq!(turn.current_turn_score(), 100);
    }
}
