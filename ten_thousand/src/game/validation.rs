//! Turn validation: legal selections, bust detection and exact wins.

use serde::{Deserialize, Serialize};

use super::{
    constants::NUM_DICE,
    entities::{Die, DieId, Face, ScoreResult},
    errors::SelectionError,
    scoring::{evaluate, score_faces},
};

/// Check that a non-empty selection of faces scores.
pub fn validate_selection(selected: &[Face]) -> Result<ScoreResult, SelectionError> {
    if selected.is_empty() {
        return Err(SelectionError::NoDiceSelected);
    }
    let score = evaluate(selected);
    if !score.is_scoring() {
        return Err(SelectionError::NoScore);
    }
    Ok(score)
}

/// Whether some non-empty sub-multiset of `rollable` scores.
///
/// Exhaustive over every subset (at most 63 for six dice), so patterns that
/// need all six dice, like three pairs, are found as well. Only the first
/// six faces are considered.
#[must_use]
pub fn has_any_scoring_option(rollable: &[Face]) -> bool {
    let rollable = &rollable[..rollable.len().min(NUM_DICE)];
    subset_masks(rollable.len()).any(|mask| score_faces(&pick(rollable, mask)) > 0)
}

/// Winning requires landing exactly on the target.
#[must_use]
pub const fn has_won(total_score: u32, target_score: u32) -> bool {
    total_score == target_score
}

/// A subset of dice in which every die contributes points.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ScoringSubset {
    pub die_ids: Vec<DieId>,
    pub score: ScoreResult,
}

/// All subsets of `dice` where removing any single die strictly lowers the
/// score, ordered by points (highest first), then by fewest dice, then by
/// die ids. Only the first six dice are considered.
#[must_use]
pub fn scoring_subsets(dice: &[Die]) -> Vec<ScoringSubset> {
    let dice = &dice[..dice.len().min(NUM_DICE)];
    let faces: Vec<Face> = dice.iter().map(|d| d.face).collect();
    let mut subsets: Vec<ScoringSubset> = subset_masks(dice.len())
        .filter_map(|mask| {
            let points = score_faces(&pick(&faces, mask));
            if points == 0 {
                return None;
            }
            let every_die_counts = (0..dice.len())
                .filter(|i| mask & (1 << i) != 0)
                .all(|i| score_faces(&pick(&faces, mask & !(1 << i))) < points);
            every_die_counts.then(|| ScoringSubset {
                die_ids: pick(dice, mask).iter().map(|d| d.id).collect(),
                score: evaluate(&pick(&faces, mask)),
            })
        })
        .collect();

    subsets.sort_by(|a, b| {
        b.score
            .points
            .cmp(&a.score.points)
            .then(a.die_ids.len().cmp(&b.die_ids.len()))
            .then_with(|| a.die_ids.cmp(&b.die_ids))
    });
    subsets
}

fn subset_masks(len: usize) -> impl Iterator<Item = u32> {
    1..(1u32 << len)
}

fn pick<T: Copy>(items: &[T], mask: u32) -> Vec<T> {
    items
        .iter()
        .enumerate()
        .filter(|(i, _)| mask & (1 << i) != 0)
        .map(|(_, item)| *item)
        .collect()
}
