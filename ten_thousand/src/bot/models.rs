//! Bot difficulty tiers and the profiles derived from them.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::selection::{AllScoringDice, BestSubset, SelectionStrategy};

/// Bot difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotDifficulty {
    Beginner,     // Cautious, banks early, keeps only the best combination
    Intermediate, // Balanced, keeps every scoring die
    Expert,       // Pushes its luck, keeps every scoring die
}

impl fmt::Display for BotDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotDifficulty::Beginner => write!(f, "beginner"),
            BotDifficulty::Intermediate => write!(f, "intermediate"),
            BotDifficulty::Expert => write!(f, "expert"),
        }
    }
}

impl FromStr for BotDifficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "beginner" => Ok(BotDifficulty::Beginner),
            "intermediate" => Ok(BotDifficulty::Intermediate),
            "expert" => Ok(BotDifficulty::Expert),
            other => Err(format!("unknown bot difficulty: {other}")),
        }
    }
}

/// Behavior parameters for one bot, fixed for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BotProfile {
    pub difficulty: BotDifficulty,

    /// Base probability of rolling again once the turn is worth banking
    /// (0.0 to 1.0)
    pub risk_taking_probability: f64,

    /// Turn score below which the bot always rolls again
    pub min_score_to_bank: u32,

    /// How the bot picks dice to keep after a roll
    pub selection: SelectionStrategy,
}

impl BotProfile {
    /// Banks early and keeps only the single best combination.
    pub fn beginner() -> Self {
        Self {
            difficulty: BotDifficulty::Beginner,
            risk_taking_probability: 0.30,
            min_score_to_bank: 300,
            selection: BestSubset.into(),
        }
    }

    pub fn intermediate() -> Self {
        Self {
            difficulty: BotDifficulty::Intermediate,
            risk_taking_probability: 0.50,
            min_score_to_bank: 450,
            selection: AllScoringDice.into(),
        }
    }

    /// Chases bigger turns before banking.
    pub fn expert() -> Self {
        Self {
            difficulty: BotDifficulty::Expert,
            risk_taking_probability: 0.65,
            min_score_to_bank: 700,
            selection: AllScoringDice.into(),
        }
    }

    pub fn from_difficulty(difficulty: BotDifficulty) -> Self {
        match difficulty {
            BotDifficulty::Beginner => Self::beginner(),
            BotDifficulty::Intermediate => Self::intermediate(),
            BotDifficulty::Expert => Self::expert(),
        }
    }
}

impl From<BotDifficulty> for BotProfile {
    fn from(value: BotDifficulty) -> Self {
        Self::from_difficulty(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_match_their_difficulty() {
        for difficulty in [
            BotDifficulty::Beginner,
            BotDifficulty::Intermediate,
            BotDifficulty::Expert,
        ] {
            assert_eq!(BotProfile::from(difficulty).difficulty, difficulty);
        }
    }

    #[test]
    fn test_risk_increases_with_difficulty() {
        let beginner = BotProfile::beginner();
        let intermediate = BotProfile::intermediate();
        let expert = BotProfile::expert();
        assert!(beginner.risk_taking_probability < intermediate.risk_taking_probability);
        assert!(intermediate.risk_taking_probability < expert.risk_taking_probability);
        assert!(beginner.min_score_to_bank < expert.min_score_to_bank);
    }

    #[test]
    fn test_selection_strategy_per_tier() {
        assert_eq!(
            BotProfile::beginner().selection,
            SelectionStrategy::BestSubset(BestSubset)
        );
        assert_eq!(
            BotProfile::expert().selection,
            SelectionStrategy::AllScoringDice(AllScoringDice)
        );
    }

    #[test]
    fn test_difficulty_parse_and_display() {
        assert_eq!("Expert".parse::<BotDifficulty>(), Ok(BotDifficulty::Expert));
        assert!("grandmaster".parse::<BotDifficulty>().is_err());
        assert_eq!(BotDifficulty::Intermediate.to_string(), "intermediate");
    }
}
