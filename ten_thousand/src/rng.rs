//! Injectable randomness for dice rolls and bot decisions.
//!
//! The engine never reaches for a global generator. Callers hand a
//! [`RandomSource`] to the match at construction time, which lets tests
//! script every face and every coin flip.

use rand::{Rng, SeedableRng, rngs::StdRng};
use std::collections::VecDeque;

use crate::game::{
    constants::{MAX_FACE, MIN_FACE},
    entities::Face,
};

/// Source of die faces and weighted coin flips.
pub trait RandomSource {
    /// Uniform face in `1..=6`.
    fn roll_face(&mut self) -> Face;

    /// `true` with the given probability. Out-of-range probabilities are
    /// clamped to `[0, 1]`.
    fn chance(&mut self, probability: f64) -> bool;
}

/// Adapter from any `rand` generator.
#[derive(Debug)]
pub struct RngSource<R>(R);

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self(rng)
    }
}

impl RngSource<StdRng> {
    /// Reproducible generator, useful for simulations.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    /// Generator seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self(StdRng::from_os_rng())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn roll_face(&mut self) -> Face {
        self.0.random_range(MIN_FACE..=MAX_FACE)
    }

    fn chance(&mut self, probability: f64) -> bool {
        self.0.random_bool(probability.clamp(0.0, 1.0))
    }
}

/// Deterministic source for tests.
///
/// Faces are handed out in order and the script wraps around once
/// exhausted. Coin flips are popped from their own queue and fall back to
/// `default_chance` when it runs dry.
#[derive(Clone, Debug, Default)]
pub struct ScriptedSource {
    faces: Vec<Face>,
    face_idx: usize,
    chances: VecDeque<bool>,
    default_chance: bool,
}

impl ScriptedSource {
    #[must_use]
    pub fn new(faces: impl IntoIterator<Item = Face>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_chances(mut self, chances: impl IntoIterator<Item = bool>) -> Self {
        self.chances = chances.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_default_chance(mut self, default_chance: bool) -> Self {
        self.default_chance = default_chance;
        self
    }

    /// Append faces to the end of the script.
    pub fn push_faces(&mut self, faces: impl IntoIterator<Item = Face>) {
        self.faces.extend(faces);
    }
}

impl RandomSource for ScriptedSource {
    fn roll_face(&mut self) -> Face {
        if self.faces.is_empty() {
            return MIN_FACE;
        }
        let face = self.faces[self.face_idx % self.faces.len()];
        self.face_idx += 1;
        face
    }

    fn chance(&mut self, _probability: f64) -> bool {
        self.chances.pop_front().unwrap_or(self.default_chance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_source_is_reproducible() {
        let mut a = RngSource::seeded(42);
        let mut b = RngSource::seeded(42);
        let faces_a: Vec<Face> = (0..32).map(|_| a.roll_face()).collect();
        let faces_b: Vec<Face> = (0..32).map(|_| b.roll_face()).collect();
        assert_eq!(faces_a, faces_b);
    }

    #[test]
    fn test_rng_faces_in_range() {
        let mut source = RngSource::seeded(7);
        for _ in 0..1000 {
            let face = source.roll_face();
            assert!((MIN_FACE..=MAX_FACE).contains(&face));
        }
    }

    #[test]
    fn test_rng_chance_clamps_probability() {
        let mut source = RngSource::seeded(1);
        assert!(source.chance(1.5));
        assert!(!source.chance(-0.5));
    }

    #[test]
    fn test_scripted_faces_wrap_around() {
        let mut source = ScriptedSource::new([1, 2, 3]);
        let faces: Vec<Face> = (0..5).map(|_| source.roll_face()).collect();
        assert_eq!(faces, vec![1, 2, 3, 1, 2]);
    }

    #[test]
    fn test_entropy_faces_in_range() {
        let mut source = RngSource::from_entropy();
        for _ in 0..200 {
            assert!((MIN_FACE..=MAX_FACE).contains(&source.roll_face()));
        }
        assert!(!source.chance(0.0));
    }

    #[test]
    fn test_pushed_faces_join_the_script() {
        let mut source = ScriptedSource::new([1, 2]);
        assert_eq!(source.roll_face(), 1);
        source.push_faces([3]);
        let faces: Vec<Face> = (0..4).map(|_| source.roll_face()).collect();
        assert_eq!(faces, vec![2, 3, 1, 2]);

        let mut empty = ScriptedSource::new([]);
        empty.push_faces([6, 5]);
        assert_eq!(empty.roll_face(), 6);
    }

    #[test]
    fn test_scripted_chances_fall_back_to_default() {
        let mut source = ScriptedSource::new([])
            .with_chances([true, false])
            .with_default_chance(true);
        assert!(source.chance(0.0));
        assert!(!source.chance(1.0));
        assert!(source.chance(0.0));
        assert_eq!(source.roll_face(), MIN_FACE);
    }
}
