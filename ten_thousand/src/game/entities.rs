use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{constants::NUM_DICE, errors::SelectionError};
use crate::rng::RandomSource;

/// Placeholder for die faces (1..=6).
pub type Face = u8;

/// Position of a die within the set (0..6).
pub type DieId = usize;

/// Player identifier, as handed out by the player directory.
pub type PlayerId = i64;

/// Match identifier used by storage collaborators.
pub type MatchId = uuid::Uuid;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Die {
    pub id: DieId,
    pub face: Face,
    pub is_selected: bool,
    /// Committed to a scored selection this turn and out of the rollable
    /// pool.
    pub is_locked: bool,
}

impl Die {
    #[must_use]
    pub const fn new(id: DieId, face: Face) -> Self {
        Self {
            id,
            face,
            is_selected: false,
            is_locked: false,
        }
    }

    #[must_use]
    pub const fn is_rollable(&self) -> bool {
        !self.is_locked
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let face = self.face;
        let repr = match (self.is_locked, self.is_selected) {
            (true, _) => format!("[{face}]"),
            (false, true) => format!("*{face}*"),
            (false, false) => format!(" {face} "),
        };
        write!(f, "{repr}")
    }
}

/// The six physical dice with their per-turn selection and lock state.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct DiceSet {
    dice: [Die; NUM_DICE],
}

impl Default for DiceSet {
    fn default() -> Self {
        Self {
            dice: std::array::from_fn(|id| Die::new(id, 1)),
        }
    }
}

impl DiceSet {
    /// Dice showing the given faces, all unlocked and unselected.
    #[must_use]
    pub fn with_faces(faces: [Face; NUM_DICE]) -> Self {
        Self {
            dice: std::array::from_fn(|id| Die::new(id, faces[id])),
        }
    }

    #[must_use]
    pub fn dice(&self) -> &[Die] {
        &self.dice
    }

    #[must_use]
    pub fn get(&self, id: DieId) -> Option<&Die> {
        self.dice.get(id)
    }

    #[must_use]
    pub fn faces(&self) -> [Face; NUM_DICE] {
        self.dice.map(|die| die.face)
    }

    /// Unlocked dice, in id order.
    #[must_use]
    pub fn rollable(&self) -> Vec<Die> {
        self.dice.iter().filter(|d| d.is_rollable()).copied().collect()
    }

    #[must_use]
    pub fn rollable_faces(&self) -> Vec<Face> {
        self.dice
            .iter()
            .filter(|d| d.is_rollable())
            .map(|d| d.face)
            .collect()
    }

    /// Selected dice that are still unlocked.
    #[must_use]
    pub fn selected(&self) -> Vec<Die> {
        self.dice
            .iter()
            .filter(|d| d.is_selected && d.is_rollable())
            .copied()
            .collect()
    }

    #[must_use]
    pub fn selected_faces(&self) -> Vec<Face> {
        self.selected().iter().map(|d| d.face).collect()
    }

    #[must_use]
    pub fn locked_count(&self) -> usize {
        self.dice.iter().filter(|d| d.is_locked).count()
    }

    #[must_use]
    pub fn all_locked(&self) -> bool {
        self.locked_count() == NUM_DICE
    }

    /// Mark dice as selected. Either every id is accepted or nothing changes.
    pub fn select(&mut self, ids: &[DieId]) -> Result<(), SelectionError> {
        self.check_selectable(ids)?;
        for &id in ids {
            self.dice[id].is_selected = true;
        }
        Ok(())
    }

    /// Clear the selection flag. Either every id is accepted or nothing changes.
    pub fn deselect(&mut self, ids: &[DieId]) -> Result<(), SelectionError> {
        self.check_selectable(ids)?;
        for &id in ids {
            self.dice[id].is_selected = false;
        }
        Ok(())
    }

    fn check_selectable(&self, ids: &[DieId]) -> Result<(), SelectionError> {
        for &id in ids {
            match self.dice.get(id) {
                None => return Err(SelectionError::UnknownDie(id)),
                Some(die) if die.is_locked => return Err(SelectionError::DieLocked(id)),
                Some(_) => {}
            }
        }
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        for die in &mut self.dice {
            die.is_selected = false;
        }
    }

    /// Lock every selected die and clear the selection. Returns how many
    /// dice were locked.
    pub fn lock_selected(&mut self) -> usize {
        let mut locked = 0;
        for die in self.dice.iter_mut().filter(|d| d.is_selected) {
            die.is_selected = false;
            if !die.is_locked {
                die.is_locked = true;
                locked += 1;
            }
        }
        locked
    }

    pub fn unlock_all(&mut self) {
        for die in &mut self.dice {
            die.is_locked = false;
            die.is_selected = false;
        }
    }

    /// Give every unlocked die a fresh face. Returns the new faces of the
    /// rolled dice in id order.
    pub fn reroll(&mut self, rng: &mut dyn RandomSource) -> Vec<Face> {
        self.dice
            .iter_mut()
            .filter(|d| d.is_rollable())
            .map(|die| {
                die.face = rng.roll_face();
                die.is_selected = false;
                die.face
            })
            .collect()
    }
}

impl fmt::Display for DiceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = self
            .dice
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "{repr}")
    }
}

/// Points and human-readable breakdown for a set of faces.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct ScoreResult {
    pub points: u32,
    pub description: String,
}

impl ScoreResult {
    pub const NO_SCORE: &'static str = "No score";

    #[must_use]
    pub fn none() -> Self {
        Self {
            points: 0,
            description: Self::NO_SCORE.to_string(),
        }
    }

    #[must_use]
    pub const fn is_scoring(&self) -> bool {
        self.points > 0
    }
}

impl fmt::Display for ScoreResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} pts)", self.description, self.points)
    }
}

/// How a turn ended.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum TurnOutcome {
    Banked,
    /// A roll produced no scoring dice.
    Busted,
    /// A bank would have passed the target score.
    Overshot,
    /// The bank landed exactly on the target score.
    Won,
}

impl fmt::Display for TurnOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Banked => "banked",
            Self::Busted => "busted",
            Self::Overshot => "overshot",
            Self::Won => "won",
        };
        write!(f, "{repr}")
    }
}

/// One completed turn, owned by the match history.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PlayerTurnRecord {
    pub player_id: PlayerId,
    pub round: u32,
    /// Points that reached the cumulative total. Zero for busts and
    /// overshoots.
    pub turn_score: u32,
    pub total_score_after: u32,
    pub dice_rolls_used: u32,
    pub outcome: TurnOutcome,
    pub recorded_at: DateTime<Utc>,
}
