//! Dice selection strategies.
//!
//! Each difficulty tier uses exactly one strategy. The conservative
//! strategy keeps the best single combination; the maximal one keeps every
//! die that scores and leaves the risk call to the continue/bank decision.

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::game::{
    entities::{Die, DieId},
    validation::ScoringSubset,
};

/// Picks which of the rolled dice to keep.
#[enum_dispatch]
pub trait DiceSelection {
    /// `subsets` are the fully scoring subsets of `available`, best first.
    /// Returned ids are sorted and refer only to available dice.
    fn choose(&self, available: &[Die], subsets: &[ScoringSubset]) -> Vec<DieId>;
}

/// Keep the highest scoring subset only.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct BestSubset;

impl DiceSelection for BestSubset {
    fn choose(&self, available: &[Die], subsets: &[ScoringSubset]) -> Vec<DieId> {
        let Some(best) = subsets.iter().max_by(|a, b| {
            a.score
                .points
                .cmp(&b.score.points)
                // Fewer dice leaves more to roll.
                .then(b.die_ids.len().cmp(&a.die_ids.len()))
        }) else {
            return Vec::new();
        };
        restrict(best.die_ids.iter().copied(), available)
    }
}

/// Keep the union of every scoring subset.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct AllScoringDice;

impl DiceSelection for AllScoringDice {
    fn choose(&self, available: &[Die], subsets: &[ScoringSubset]) -> Vec<DieId> {
        restrict(
            subsets.iter().flat_map(|s| s.die_ids.iter().copied()),
            available,
        )
    }
}

fn restrict(ids: impl Iterator<Item = DieId>, available: &[Die]) -> Vec<DieId> {
    ids.filter(|id| available.iter().any(|d| d.id == *id && !d.is_locked))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[enum_dispatch(DiceSelection)]
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum SelectionStrategy {
    BestSubset(BestSubset),
    AllScoringDice(AllScoringDice),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::validation::scoring_subsets;

    fn dice(faces: &[u8]) -> Vec<Die> {
        faces
            .iter()
            .enumerate()
            .map(|(id, &face)| Die::new(id, face))
            .collect()
    }

    #[test]
    fn test_best_subset_picks_highest_points() {
        let rolled = dice(&[1, 1, 1, 5, 2, 3]);
        let subsets = scoring_subsets(&rolled);
        let chosen = BestSubset.choose(&rolled, &subsets);
        assert_eq!(chosen, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_best_subset_prefers_fewer_dice_on_ties() {
        let rolled = dice(&[5, 2, 3]);
        let subsets = vec![
            ScoringSubset {
                die_ids: vec![0, 1],
                score: crate::game::scoring::evaluate(&[5, 2]),
            },
            ScoringSubset {
                die_ids: vec![0],
                score: crate::game::scoring::evaluate(&[5]),
            },
        ];
        assert_eq!(BestSubset.choose(&rolled, &subsets), vec![0]);
    }

    #[test]
    fn test_union_keeps_every_scoring_die() {
        let rolled = dice(&[1, 4, 5, 4, 1, 6]);
        let subsets = scoring_subsets(&rolled);
        let chosen = AllScoringDice.choose(&rolled, &subsets);
        assert_eq!(chosen, vec![0, 2, 4]);
    }

    #[test]
    fn test_union_deduplicates_and_skips_unavailable() {
        let rolled = dice(&[1, 5]);
        let subsets = vec![
            ScoringSubset {
                die_ids: vec![0, 1],
                score: crate::game::scoring::evaluate(&[1, 5]),
            },
            ScoringSubset {
                die_ids: vec![1, 7],
                score: crate::game::scoring::evaluate(&[5]),
            },
        ];
        assert_eq!(AllScoringDice.choose(&rolled, &subsets), vec![0, 1]);
    }

    #[test]
    fn test_empty_subsets_choose_nothing() {
        let rolled = dice(&[2, 3]);
        assert!(BestSubset.choose(&rolled, &[]).is_empty());
        assert!(AllScoringDice.choose(&rolled, &[]).is_empty());
    }

    #[test]
    fn test_strategy_dispatch() {
        let rolled = dice(&[1, 1, 1, 5, 2, 3]);
        let subsets = scoring_subsets(&rolled);
        let conservative: SelectionStrategy = BestSubset.into();
        let maximal: SelectionStrategy = AllScoringDice.into();
        assert_eq!(conservative.choose(&rolled, &subsets), vec![0, 1, 2, 3]);
        assert_eq!(maximal.choose(&rolled, &subsets), vec![0, 1, 2, 3]);
    }
}
