//! Match configuration
//!
//! Structured, already-parsed parameters for building a [`Match`]. Loads from
//! JSON; every move name is validated when the strategies are built.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::game::{FinishMode, Match};
use crate::moves::Move;
use crate::random::{RandomSource, RandomStream, DEFAULT_SEED};
use crate::strategy::{Strategy, StrategyKind};

/// Strategy kind tag plus kind-specific parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StrategySpec {
    Manual,
    Uniform {
        #[serde(default = "all_move_names")]
        moves: Vec<String>,
    },
    Weighted {
        weights: BTreeMap<String, f64>,
    },
    Mirror,
    Adaptive,
}

impl StrategySpec {
    pub fn kind(&self) -> StrategyKind {
        match self {
            StrategySpec::Manual => StrategyKind::Manual,
            StrategySpec::Uniform { .. } => StrategyKind::Uniform,
            StrategySpec::Weighted { .. } => StrategyKind::Weighted,
            StrategySpec::Mirror => StrategyKind::Mirror,
            StrategySpec::Adaptive => StrategyKind::Adaptive,
        }
    }

    /// Validate parameters and construct the strategy
    pub fn build(&self) -> Result<Strategy, EngineError> {
        match self {
            StrategySpec::Manual => Ok(Strategy::manual()),
            StrategySpec::Uniform { moves } => {
                let moves = moves
                    .iter()
                    .map(|name| name.parse::<Move>())
                    .collect::<Result<Vec<_>, _>>()?;
                Strategy::uniform(moves)
            }
            StrategySpec::Weighted { weights } => {
                let mut parsed = weights
                    .iter()
                    .map(|(name, weight)| Ok((name.parse::<Move>()?, *weight)))
                    .collect::<Result<Vec<_>, EngineError>>()?;
                // Canonical order keeps draws independent of key spelling
                parsed.sort_by_key(|(mv, _)| *mv);
                Strategy::weighted(parsed)
            }
            StrategySpec::Mirror => Ok(Strategy::mirror()),
            StrategySpec::Adaptive => Ok(Strategy::adaptive()),
        }
    }
}

fn all_move_names() -> Vec<String> {
    Move::ALL.iter().map(|m| m.name().to_string()).collect()
}

/// Complete description of a match
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    #[serde(default = "default_player1")]
    pub player1: String,
    #[serde(default = "default_player2")]
    pub player2: String,
    #[serde(default = "default_strategy1")]
    pub strategy1: StrategySpec,
    #[serde(default = "default_strategy2")]
    pub strategy2: StrategySpec,
    /// How `target` is interpreted
    #[serde(default = "default_mode")]
    pub mode: FinishMode,
    #[serde(default = "default_target")]
    pub target: u32,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_player1() -> String {
    "Player 1".to_string()
}

fn default_player2() -> String {
    "Player 2".to_string()
}

fn default_strategy1() -> StrategySpec {
    StrategySpec::Manual
}

fn default_strategy2() -> StrategySpec {
    StrategySpec::Uniform {
        moves: all_move_names(),
    }
}

fn default_mode() -> FinishMode {
    FinishMode::ByRounds
}

fn default_target() -> u32 {
    5
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            player1: default_player1(),
            player2: default_player2(),
            strategy1: default_strategy1(),
            strategy2: default_strategy2(),
            mode: default_mode(),
            target: default_target(),
            seed: default_seed(),
        }
    }
}

impl MatchConfig {
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build a match with its own generator seeded from `seed`
    pub fn build(&self) -> Result<Match, EngineError> {
        self.build_with(RandomSource::new(self.seed))
    }

    /// Build a match on a caller-supplied random stream
    pub fn build_with<R: RandomStream>(&self, rng: R) -> Result<Match<R>, EngineError> {
        let strategy1 = self.strategy1.build()?;
        let strategy2 = self.strategy2.build()?;
        Ok(Match::new(
            self.player1.clone(),
            strategy1,
            self.player2.clone(),
            strategy2,
            rng,
        ))
    }

    pub fn is_finished<R: RandomStream>(&self, game: &Match<R>) -> bool {
        game.is_finished(self.mode, self.target)
    }
}
