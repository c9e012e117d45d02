//! Bot decision-making logic with difficulty-based behavior.

use log::debug;

use super::{
    models::{BotDifficulty, BotProfile},
    selection::DiceSelection,
};
use crate::{
    game::{
        constants::{DEFAULT_ENTRY_THRESHOLD, DEFAULT_TARGET_SCORE},
        entities::{Die, DieId},
        validation::ScoringSubset,
    },
    rng::RandomSource,
};

/// Configuration for the continue-or-bank thresholds and adjustments.
///
/// # Examples
///
/// ```
/// use ten_thousand::bot::decision::BotDecisionConfig;
///
/// let config = BotDecisionConfig::default();
/// assert_eq!(config.opponent_pressure_score, 8000);
/// assert_eq!(config.max_continue_probability, 0.9);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BotDecisionConfig {
    /// An opponent above this score makes the bot push harder.
    pub opponent_pressure_score: u32,

    /// Added to the risk probability under opponent pressure.
    pub pressure_risk_bonus: f64,

    /// Turn score that cancels out the base risk probability.
    /// continue_prob = risk - turn_score / divisor
    pub risk_decay_divisor: f64,

    /// Continue-probability floor once the turn is worth banking.
    pub min_continue_probability: f64,

    /// Continue-probability ceiling once the turn is worth banking.
    pub max_continue_probability: f64,

    /// Bonus when at least five dice are left to roll.
    pub many_dice_bonus: f64,

    /// Bonus when three or four dice are left to roll.
    pub some_dice_bonus: f64,
}

impl Default for BotDecisionConfig {
    fn default() -> Self {
        Self {
            opponent_pressure_score: 8000,
            pressure_risk_bonus: 0.2,
            risk_decay_divisor: 2000.0,
            min_continue_probability: 0.1,
            max_continue_probability: 0.9,
            many_dice_bonus: 0.3,
            some_dice_bonus: 0.2,
        }
    }
}

/// What the bot knows when deciding whether to roll again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContinueContext {
    pub current_turn_score: u32,
    /// Bot's banked total before this turn.
    pub total_score: u32,
    pub opponent_max_score: u32,
    /// Dice the next roll would throw (six after hot dice).
    pub available_dice_count: usize,
}

/// Outcome of the continue rule before any randomness is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContinueDecision {
    Continue,
    Bank,
    /// Roll again with this probability.
    Gamble(f64),
}

/// Continue-or-bank and dice selection for one bot seat.
#[derive(Debug, Clone, PartialEq)]
pub struct BotPolicy {
    profile: BotProfile,
    target_score: u32,
    entry_threshold: u32,
    config: BotDecisionConfig,
}

impl BotPolicy {
    pub fn new(difficulty: BotDifficulty, target_score: u32, entry_threshold: u32) -> Self {
        Self::with_config(
            difficulty.into(),
            target_score,
            entry_threshold,
            BotDecisionConfig::default(),
        )
    }

    pub fn with_config(
        profile: BotProfile,
        target_score: u32,
        entry_threshold: u32,
        config: BotDecisionConfig,
    ) -> Self {
        Self {
            profile,
            target_score,
            entry_threshold,
            config,
        }
    }

    pub fn profile(&self) -> &BotProfile {
        &self.profile
    }

    /// Decide, before rolling any dice, how the bot treats this situation.
    ///
    /// Rules, first match wins:
    /// 1. Not on the board yet and below the entry threshold: continue.
    /// 2. This turn's points reach the target: bank.
    /// 3. An opponent is close to winning: gamble at `risk + bonus`.
    /// 4. Turn is worth banking: gamble at a probability that shrinks as the
    ///    turn grows and rises with the dice left.
    /// 5. Otherwise continue.
    pub fn decide(&self, ctx: &ContinueContext) -> ContinueDecision {
        let risk = self.profile.risk_taking_probability;

        if ctx.total_score == 0 && ctx.current_turn_score < self.entry_threshold {
            return ContinueDecision::Continue;
        }

        if self.target_score.saturating_sub(ctx.total_score) <= ctx.current_turn_score {
            return ContinueDecision::Bank;
        }

        if ctx.opponent_max_score > self.config.opponent_pressure_score {
            return ContinueDecision::Gamble(
                (risk + self.config.pressure_risk_bonus).clamp(0.0, 1.0),
            );
        }

        if ctx.current_turn_score >= self.profile.min_score_to_bank {
            let (lo, hi) = (
                self.config.min_continue_probability,
                self.config.max_continue_probability,
            );
            let base = (risk - f64::from(ctx.current_turn_score) / self.config.risk_decay_divisor)
                .clamp(lo, hi);
            let bonus = match ctx.available_dice_count {
                n if n >= 5 => self.config.many_dice_bonus,
                n if n >= 3 => self.config.some_dice_bonus,
                _ => 0.0,
            };
            return ContinueDecision::Gamble((base + bonus).clamp(lo, hi));
        }

        ContinueDecision::Continue
    }

    /// Whether the bot rolls again.
    pub fn should_continue_rolling(
        &self,
        ctx: &ContinueContext,
        rng: &mut dyn RandomSource,
    ) -> bool {
        let decision = self.decide(ctx);
        let continues = match decision {
            ContinueDecision::Continue => true,
            ContinueDecision::Bank => false,
            ContinueDecision::Gamble(probability) => rng.chance(probability),
        };
        debug!(
            "{} bot: {ctx:?} -> {decision:?} (continue: {continues})",
            self.profile.difficulty
        );
        continues
    }

    /// Dice to keep from `available` given its scoring subsets.
    pub fn select_dice(&self, available: &[Die], scoring_subsets: &[ScoringSubset]) -> Vec<DieId> {
        self.profile.selection.choose(available, scoring_subsets)
    }
}

impl Default for BotPolicy {
    fn default() -> Self {
        Self::new(
            BotDifficulty::Intermediate,
            DEFAULT_TARGET_SCORE,
            DEFAULT_ENTRY_THRESHOLD,
        )
    }
}
