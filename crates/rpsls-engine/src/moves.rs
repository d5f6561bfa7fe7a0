//! Moves and the domination table

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// One of the five game symbols
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Move {
    Rock,
    Paper,
    Scissors,
    Lizard,
    Spock,
}

impl Move {
    /// All moves in canonical order. Tie-breaks elsewhere follow this order.
    pub const ALL: [Move; 5] = [
        Move::Rock,
        Move::Paper,
        Move::Scissors,
        Move::Lizard,
        Move::Spock,
    ];

    /// The moves this one defeats
    pub fn beats(self) -> &'static [Move] {
        match self {
            Move::Scissors => &[Move::Paper, Move::Lizard],
            Move::Paper => &[Move::Rock, Move::Spock],
            Move::Rock => &[Move::Lizard, Move::Scissors],
            Move::Lizard => &[Move::Spock, Move::Paper],
            Move::Spock => &[Move::Scissors, Move::Rock],
        }
    }

    pub fn dominates(self, other: Move) -> bool {
        self.beats().contains(&other)
    }

    /// Points awarded for one round as (self, other)
    ///
    /// (0, 0) on a draw, (1, 0) when self dominates, (0, 1) otherwise.
    pub fn score(self, other: Move) -> (u32, u32) {
        if self == other {
            (0, 0)
        } else if self.dominates(other) {
            (1, 0)
        } else {
            (0, 1)
        }
    }

    /// Every move whose beats-set contains `target`, in canonical order
    pub fn dominators_of(target: Move) -> Vec<Move> {
        Move::ALL
            .iter()
            .copied()
            .filter(|m| m.dominates(target))
            .collect()
    }

    /// Flavour verb for the way self defeats `other`, if it does
    pub fn verb(self, other: Move) -> Option<&'static str> {
        let verb = match (self, other) {
            (Move::Scissors, Move::Paper) => "cuts",
            (Move::Scissors, Move::Lizard) => "decapitates",
            (Move::Paper, Move::Rock) => "covers",
            (Move::Paper, Move::Spock) => "disproves",
            (Move::Rock, Move::Lizard) => "crushes",
            (Move::Rock, Move::Scissors) => "crushes",
            (Move::Lizard, Move::Spock) => "poisons",
            (Move::Lizard, Move::Paper) => "eats",
            (Move::Spock, Move::Scissors) => "smashes",
            (Move::Spock, Move::Rock) => "vaporizes",
            _ => return None,
        };
        Some(verb)
    }

    /// "Scissors cuts Paper"
    pub fn describe(self, other: Move) -> Option<String> {
        self.verb(other)
            .map(|verb| format!("{} {} {}", self, verb, other))
    }

    pub fn name(self) -> &'static str {
        match self {
            Move::Rock => "Rock",
            Move::Paper => "Paper",
            Move::Scissors => "Scissors",
            Move::Lizard => "Lizard",
            Move::Spock => "Spock",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Move {
    type Err = EngineError;

    /// Case-insensitive; surrounding whitespace is ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Move::ALL
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| EngineError::UnknownMove(trimmed.to_string()))
    }
}
