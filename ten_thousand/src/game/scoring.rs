//! Scoring engine.
//!
//! Maps a multiset of faces to points. Combinations are matched by
//! precedence over the whole submission, highest order first, and the dice
//! they consume are removed before the next tier is considered:
//!
//! 1. six of a kind
//! 2. straight (1-6) or three distinct pairs
//! 3. five of a kind
//! 4. four of a kind
//! 5. three of a kind
//! 6. leftover single 1s and 5s
//!
//! Leftover 2s, 3s, 4s and 6s are worth nothing.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{
    constants::{
        FIVE_OF_A_KIND_SCORE, FOUR_OF_A_KIND_SCORE, MAX_FACE, MIN_FACE, NUM_DICE,
        SINGLE_FIVE_SCORE, SINGLE_ONE_SCORE, SIX_OF_A_KIND_SCORE, STRAIGHT_SCORE,
        THREE_ONES_SCORE, THREE_PAIRS_SCORE, TRIPLE_FACE_MULTIPLIER,
    },
    entities::{Die, Face, ScoreResult},
};

/// A scoring pattern found in a set of faces.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Combination {
    SixOfAKind(Face),
    Straight,
    ThreePairs,
    FiveOfAKind(Face),
    FourOfAKind(Face),
    ThreeOfAKind(Face),
    /// Count of leftover 1s.
    SingleOnes(u8),
    /// Count of leftover 5s.
    SingleFives(u8),
}

impl Combination {
    #[must_use]
    pub fn points(&self) -> u32 {
        match *self {
            Self::SixOfAKind(face) => kind_value(face, 6),
            Self::Straight => STRAIGHT_SCORE,
            Self::ThreePairs => THREE_PAIRS_SCORE,
            Self::FiveOfAKind(face) => kind_value(face, 5),
            Self::FourOfAKind(face) => kind_value(face, 4),
            Self::ThreeOfAKind(face) => kind_value(face, 3),
            Self::SingleOnes(count) => u32::from(count) * SINGLE_ONE_SCORE,
            Self::SingleFives(count) => u32::from(count) * SINGLE_FIVE_SCORE,
        }
    }

    /// Number of dice the combination consumes.
    #[must_use]
    pub fn dice_used(&self) -> usize {
        match *self {
            Self::SixOfAKind(_) | Self::Straight | Self::ThreePairs => NUM_DICE,
            Self::FiveOfAKind(_) => 5,
            Self::FourOfAKind(_) => 4,
            Self::ThreeOfAKind(_) => 3,
            Self::SingleOnes(count) | Self::SingleFives(count) => usize::from(count),
        }
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match *self {
            Self::SixOfAKind(face) => format!("Six {face}s"),
            Self::Straight => "Straight".to_string(),
            Self::ThreePairs => "Three pairs".to_string(),
            Self::FiveOfAKind(face) => format!("Five {face}s"),
            Self::FourOfAKind(face) => format!("Four {face}s"),
            Self::ThreeOfAKind(face) => format!("Three {face}s"),
            Self::SingleOnes(count) => singles(count, 1),
            Self::SingleFives(count) => singles(count, 5),
        };
        write!(f, "{repr} ({})", self.points())
    }
}

fn singles(count: u8, face: Face) -> String {
    let word = match count {
        1 => return format!("One {face}"),
        2 => "Two",
        3 => "Three",
        4 => "Four",
        5 => "Five",
        _ => "Six",
    };
    format!("{word} {face}s")
}

/// Value of `n` dice showing `face`, for `n` in `3..=6`.
///
/// Four or more of a kind is worth the flat tier value or the triple value
/// doubled once per extra die, whichever is higher.
#[must_use]
pub fn kind_value(face: Face, n: usize) -> u32 {
    let triple = if face == 1 {
        THREE_ONES_SCORE
    } else {
        u32::from(face) * TRIPLE_FACE_MULTIPLIER
    };
    let floor = match n {
        0..=3 => return triple,
        4 => FOUR_OF_A_KIND_SCORE,
        5 => FIVE_OF_A_KIND_SCORE,
        _ => SIX_OF_A_KIND_SCORE,
    };
    floor.max(triple << (n.min(NUM_DICE) - 3))
}

/// Count of each face, indexed by face value. Index 0 is unused, faces
/// outside `1..=6` are ignored and counts saturate at `u8::MAX`.
#[must_use]
pub fn face_counts(faces: &[Face]) -> [u8; 7] {
    let mut counts = [0u8; 7];
    for &face in faces {
        if (MIN_FACE..=MAX_FACE).contains(&face) {
            let count = &mut counts[usize::from(face)];
            *count = count.saturating_add(1);
        }
    }
    counts
}

/// Every combination matched in `faces`, in precedence order.
#[must_use]
pub fn combinations(faces: &[Face]) -> Vec<Combination> {
    let mut counts = face_counts(faces);
    let total: usize = counts.iter().map(|&c| usize::from(c)).sum();

    if total == NUM_DICE {
        if let Some(face) = all_faces().find(|&f| counts[usize::from(f)] == 6) {
            return vec![Combination::SixOfAKind(face)];
        }
        if all_faces().all(|f| counts[usize::from(f)] == 1) {
            return vec![Combination::Straight];
        }
        if all_faces().filter(|&f| counts[usize::from(f)] == 2).count() == 3 {
            return vec![Combination::ThreePairs];
        }
    }

    let mut found = Vec::new();
    for n in (3..=5).rev() {
        for face in all_faces() {
            let count = &mut counts[usize::from(face)];
            if usize::from(*count) >= n {
                *count -= n as u8;
                found.push(match n {
                    5 => Combination::FiveOfAKind(face),
                    4 => Combination::FourOfAKind(face),
                    _ => Combination::ThreeOfAKind(face),
                });
            }
        }
    }

    if counts[1] > 0 {
        found.push(Combination::SingleOnes(counts[1]));
    }
    if counts[5] > 0 {
        found.push(Combination::SingleFives(counts[5]));
    }
    found
}

fn all_faces() -> impl Iterator<Item = Face> {
    MIN_FACE..=MAX_FACE
}

/// Points and description for a multiset of faces. Pure.
#[must_use]
pub fn evaluate(faces: &[Face]) -> ScoreResult {
    let combos = combinations(faces);
    if combos.is_empty() {
        return ScoreResult::none();
    }

    let points = combos.iter().map(Combination::points).sum();
    let description = combos
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" + ");
    ScoreResult {
        points,
        description,
    }
}

/// [`evaluate`] over the faces of the given dice.
#[must_use]
pub fn evaluate_dice(dice: &[Die]) -> ScoreResult {
    let faces: Vec<Face> = dice.iter().map(|d| d.face).collect();
    evaluate(&faces)
}

/// Points only.
#[must_use]
pub fn score_faces(faces: &[Face]) -> u32 {
    combinations(faces).iter().map(Combination::points).sum()
}
