//! Bot module providing computer opponents with difficulty presets.
//!
//! This module implements:
//! - BotPolicy: continue-or-bank decisions and dice selection for one seat
//! - Difficulty presets (Beginner, Intermediate, Expert) with distinct play styles
//! - Dice selection strategies dispatched through `enum_dispatch`
//!
//! ## Difficulty Presets
//!
//! ### Beginner (Cautious)
//! - Risk taking: 30%
//! - Banks from 300 points
//! - Keeps only the single best combination
//!
//! ### Intermediate (Balanced)
//! - Risk taking: 50%
//! - Banks from 450 points
//! - Keeps every scoring die
//!
//! ### Expert (Aggressive)
//! - Risk taking: 65%
//! - Banks from 700 points
//! - Keeps every scoring die
//!
//! ## Example
//!
//! ```
//! use ten_thousand::bot::{BotDifficulty, BotPolicy, ContinueContext};
//! use ten_thousand::rng::RngSource;
//!
//! let policy = BotPolicy::new(BotDifficulty::Expert, 10_000, 500);
//! let mut rng = RngSource::seeded(7);
//!
//! // Never stops before getting on the board.
//! let ctx = ContinueContext {
//!     current_turn_score: 350,
//!     total_score: 0,
//!     opponent_max_score: 0,
//!     available_dice_count: 2,
//! };
//! assert!(policy.should_continue_rolling(&ctx, &mut rng));
//! ```

pub mod decision;
pub mod models;
pub mod selection;

pub use decision::{BotDecisionConfig, BotPolicy, ContinueContext, ContinueDecision};
pub use models::{BotDifficulty, BotProfile};
pub use selection::{AllScoringDice, BestSubset, DiceSelection, SelectionStrategy};
