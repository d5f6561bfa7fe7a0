//! Match engine for Rock-Paper-Scissors-Lizard-Spock
//!
//! Core decision logic for the five-move game:
//! - the domination table and per-round scoring
//! - pluggable move-selection strategies
//! - a round-by-round match controller
//! - a re-seedable random stream shared by every strategy in a match
//!
//! Presentation (prompts, rendering, parameter text parsing) lives in hosts.

mod config;
mod error;
mod game;
mod moves;
mod random;
mod strategy;

pub use config::{MatchConfig, StrategySpec};
pub use error::EngineError;
pub use game::{FinishMode, Match, RoundResult, Side};
pub use moves::Move;
pub use random::{RandomSource, RandomStream, SeededRng, DEFAULT_SEED};
pub use strategy::{Adaptive, Manual, Mirror, Strategy, StrategyKind, Uniform, Weighted};
