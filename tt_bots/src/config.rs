//! Simulation configuration management.
//!
//! Command line values win over environment variables, which win over the
//! engine defaults.

use std::str::FromStr;

use ten_thousand::{
    DEFAULT_ENTRY_THRESHOLD, DEFAULT_TARGET_SCORE, MatchConfig, Seat, bot::BotDifficulty,
    game::constants::MAX_PLAYERS,
};

/// Complete simulation configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Number of matches to play
    pub matches: usize,
    /// Score a bot must land on exactly
    pub target_score: u32,
    /// Turn score needed to get on the board
    pub entry_threshold: u32,
    /// Base seed; match `i` uses `seed + i`
    pub seed: u64,
    /// One bot per entry, in seat order
    pub bots: Vec<BotDifficulty>,
}

/// Values given on the command line.
#[derive(Debug, Default)]
pub struct Overrides {
    pub matches: Option<usize>,
    pub target_score: Option<u32>,
    pub entry_threshold: Option<u32>,
    pub seed: Option<u64>,
    pub bots: Option<String>,
}

impl SimConfig {
    /// Load configuration, falling back to environment variables
    pub fn from_env(overrides: Overrides) -> Result<Self, ConfigError> {
        let bots = overrides
            .bots
            .or_else(|| std::env::var("TT_BOTS").ok())
            .map(|list| parse_bots(&list))
            .transpose()?
            .unwrap_or_else(|| {
                vec![
                    BotDifficulty::Beginner,
                    BotDifficulty::Intermediate,
                    BotDifficulty::Expert,
                ]
            });

        Ok(Self {
            matches: overrides
                .matches
                .unwrap_or_else(|| parse_env_or("TT_MATCHES", 100)),
            target_score: overrides
                .target_score
                .unwrap_or_else(|| parse_env_or("TT_TARGET_SCORE", DEFAULT_TARGET_SCORE)),
            entry_threshold: overrides
                .entry_threshold
                .unwrap_or_else(|| parse_env_or("TT_ENTRY_THRESHOLD", DEFAULT_ENTRY_THRESHOLD)),
            seed: overrides
                .seed
                .or_else(|| std::env::var("TT_SEED").ok().and_then(|v| v.parse().ok()))
                .unwrap_or_else(rand::random),
            bots,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.matches == 0 {
            return Err(ConfigError::Invalid {
                var: "TT_MATCHES".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.bots.len() < 2 || self.bots.len() > MAX_PLAYERS {
            return Err(ConfigError::Invalid {
                var: "TT_BOTS".to_string(),
                reason: format!("Need 2 to {MAX_PLAYERS} bots, got {}", self.bots.len()),
            });
        }

        self.match_config(0)
            .validate()
            .map_err(|e| ConfigError::Invalid {
                var: "TT_TARGET_SCORE".to_string(),
                reason: e.to_string(),
            })
    }

    /// Match configuration for the `round`-th match. Seats rotate so every
    /// bot gets to roll first equally often.
    pub fn match_config(&self, round: usize) -> MatchConfig {
        let n = self.bots.len();
        let seats = (0..n)
            .map(|i| {
                let seat = (i + round) % n;
                Seat::bot(seat as i64 + 1, self.bots[seat])
            })
            .collect();
        MatchConfig::new(seats)
            .with_target_score(self.target_score)
            .with_entry_threshold(self.entry_threshold)
    }
}

fn parse_bots(list: &str) -> Result<Vec<BotDifficulty>, ConfigError> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            BotDifficulty::from_str(s).map_err(|reason| ConfigError::Invalid {
                var: "TT_BOTS".to_string(),
                reason,
            })
        })
        .collect()
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
