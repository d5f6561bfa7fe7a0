//! Match execution engine

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::moves::Move;
use crate::random::{RandomSource, RandomStream};
use crate::strategy::Strategy;

/// Result of a single round
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    /// 1-based number of this round
    pub round: u32,
    pub move1: Move,
    pub move2: Move,
    /// Points awarded this round
    pub points: (u32, u32),
    /// Running totals after this round
    pub score: (u32, u32),
}

impl RoundResult {
    /// "Rock crushes Scissors", or "Draw: Rock" when both sides matched
    pub fn summary(&self) -> String {
        self.move1
            .describe(self.move2)
            .or_else(|| self.move2.describe(self.move1))
            .unwrap_or_else(|| format!("Draw: {}", self.move1))
    }
}

/// Termination condition checked by [`Match::is_finished`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinishMode {
    /// Finished once this many rounds have been played
    #[serde(rename = "rounds")]
    ByRounds,
    /// Finished once either side reaches this score
    #[serde(rename = "score")]
    ByScore,
}

/// One participant of a match
#[derive(Clone, Debug)]
pub struct Side {
    pub name: String,
    pub strategy: Strategy,
    pub score: u32,
    pub last_move: Option<Move>,
}

impl Side {
    fn new(name: impl Into<String>, strategy: Strategy) -> Self {
        Self {
            name: name.into(),
            strategy,
            score: 0,
            last_move: None,
        }
    }

    fn reset(&mut self) {
        self.score = 0;
        self.last_move = None;
        self.strategy.reset();
    }
}

/// Round-by-round controller for two strategies sharing one random stream
#[derive(Clone, Debug)]
pub struct Match<R: RandomStream = RandomSource> {
    side1: Side,
    side2: Side,
    round: u32,
    rng: R,
}

impl<R: RandomStream> Match<R> {
    pub fn new(
        name1: impl Into<String>,
        strategy1: Strategy,
        name2: impl Into<String>,
        strategy2: Strategy,
        rng: R,
    ) -> Self {
        Self {
            side1: Side::new(name1, strategy1),
            side2: Side::new(name2, strategy2),
            round: 0,
            rng,
        }
    }

    /// Resolve one round
    ///
    /// # Returns
    /// `None` without touching any state when a manual side has nothing
    /// selected yet.
    pub fn play_round(&mut self) -> Option<RoundResult> {
        if self.awaiting_input() {
            debug!(round = self.round + 1, "round paused awaiting input");
            return None;
        }

        let move1 = self.side1.strategy.next(self.side2.last_move, &self.rng)?;
        let move2 = self.side2.strategy.next(self.side1.last_move, &self.rng)?;

        self.side1.last_move = Some(move1);
        self.side2.last_move = Some(move2);

        let points = move1.score(move2);
        self.side1.score += points.0;
        self.side2.score += points.1;
        self.round += 1;

        let result = RoundResult {
            round: self.round,
            move1,
            move2,
            points,
            score: self.score(),
        };
        debug!(
            round = result.round,
            %move1,
            %move2,
            score1 = result.score.0,
            score2 = result.score.1,
            "round resolved"
        );
        Some(result)
    }

    /// Attempt up to `n` rounds; paused attempts yield nothing but still count
    pub fn play_rounds(&mut self, n: u32) -> Vec<RoundResult> {
        (0..n).filter_map(|_| self.play_round()).collect()
    }

    /// Play while both scores are below `target`
    ///
    /// Stops early, returning what was played, if a round pauses for input.
    pub fn play_until(&mut self, target: u32) -> Vec<RoundResult> {
        let mut results = Vec::new();
        while self.side1.score < target && self.side2.score < target {
            match self.play_round() {
                Some(result) => results.push(result),
                None => break,
            }
        }
        results
    }

    /// Name of the side with the strictly higher score; `None` on a tie
    pub fn winner(&self) -> Option<&str> {
        use std::cmp::Ordering;
        match self.side1.score.cmp(&self.side2.score) {
            Ordering::Greater => Some(self.side1.name.as_str()),
            Ordering::Less => Some(self.side2.name.as_str()),
            Ordering::Equal => None,
        }
    }

    pub fn is_finished(&self, mode: FinishMode, n: u32) -> bool {
        match mode {
            FinishMode::ByRounds => self.round >= n,
            FinishMode::ByScore => self.side1.score >= n || self.side2.score >= n,
        }
    }

    /// Zero scores and round, forget last moves, clear strategy history and
    /// rewind the random stream
    pub fn reset(&mut self) {
        self.side1.reset();
        self.side2.reset();
        self.round = 0;
        self.rng.reset();
        info!(
            player1 = %self.side1.name,
            player2 = %self.side2.name,
            "match reset"
        );
    }

    /// True when either side is a manual strategy with nothing selected
    pub fn awaiting_input(&self) -> bool {
        self.side1.strategy.is_awaiting_input() || self.side2.strategy.is_awaiting_input()
    }

    pub fn score(&self) -> (u32, u32) {
        (self.side1.score, self.side2.score)
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn last_moves(&self) -> (Option<Move>, Option<Move>) {
        (self.side1.last_move, self.side2.last_move)
    }

    pub fn side1(&self) -> &Side {
        &self.side1
    }

    pub fn side2(&self) -> &Side {
        &self.side2
    }

    /// Mutable access for hosts feeding manual selections
    pub fn strategy1_mut(&mut self) -> &mut Strategy {
        &mut self.side1.strategy
    }

    pub fn strategy2_mut(&mut self) -> &mut Strategy {
        &mut self.side2.strategy
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }
}
