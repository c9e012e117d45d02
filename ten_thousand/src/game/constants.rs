//! Rule constants and configuration defaults.

use super::entities::Face;

/// Number of physical dice in play.
pub const NUM_DICE: usize = 6;

pub const MIN_FACE: Face = 1;
pub const MAX_FACE: Face = 6;

pub const DEFAULT_TARGET_SCORE: u32 = 10_000;

/// Turn score a player must reach before their first bank counts.
pub const DEFAULT_ENTRY_THRESHOLD: u32 = 500;

pub const MAX_PLAYERS: usize = 8;

// === Scoring table ===

pub const SINGLE_ONE_SCORE: u32 = 100;
pub const SINGLE_FIVE_SCORE: u32 = 50;

/// Three 1s are worth this instead of `face * 100`.
pub const THREE_ONES_SCORE: u32 = 1000;
pub const TRIPLE_FACE_MULTIPLIER: u32 = 100;

pub const STRAIGHT_SCORE: u32 = 1500;
pub const THREE_PAIRS_SCORE: u32 = 1500;

/// Floor values for N-of-a-kind with N >= 4. High faces double their
/// triple value per extra die when that exceeds the floor.
pub const FOUR_OF_A_KIND_SCORE: u32 = 1000;
pub const FIVE_OF_A_KIND_SCORE: u32 = 2000;
pub const SIX_OF_A_KIND_SCORE: u32 = 3000;
