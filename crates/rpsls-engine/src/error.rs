//! Engine error codes

use thiserror::Error;

use crate::moves::Move;

/// Errors raised while constructing moves, strategies, or matches.
///
/// Pausing for external input is not an error; it surfaces as `None` from
/// [`Strategy::next`](crate::Strategy::next) and
/// [`Match::play_round`](crate::Match::play_round).
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("unknown move '{0}'; valid moves are: Rock, Paper, Scissors, Lizard, Spock")]
    UnknownMove(String),

    #[error("move set must not be empty; use at least one of: Rock, Paper, Scissors, Lizard, Spock")]
    EmptyMoveSet,

    #[error("move {0} listed more than once")]
    DuplicateMove(Move),

    #[error("weight for {mv} must be a finite non-negative number, got {weight}")]
    NegativeWeight { mv: Move, weight: f64 },

    #[error("weights must sum to a finite positive total, got {0}")]
    NonPositiveTotalWeight(f64),

    #[error("failed to parse match config: {0}")]
    Config(#[from] serde_json::Error),
}
