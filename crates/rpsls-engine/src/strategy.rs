//! Strategy definitions and execution

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::EngineError;
use crate::moves::Move;
use crate::random::RandomStream;

/// Strategy type tag
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyKind {
    /// Plays whatever the host selected; pauses until something is selected.
    Manual,
    /// Uniform choice over a fixed move set.
    Uniform,
    /// Choice proportional to per-move weights.
    Weighted,
    /// Repeats the opponent's previous move.
    Mirror,
    /// Counters the opponent's most frequent move so far.
    Adaptive,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 5] = [
        StrategyKind::Manual,
        StrategyKind::Uniform,
        StrategyKind::Weighted,
        StrategyKind::Mirror,
        StrategyKind::Adaptive,
    ];

    /// Human-readable description for host display
    pub fn describe(self) -> &'static str {
        match self {
            StrategyKind::Manual => "Waits for a move chosen by hand.",
            StrategyKind::Uniform => "Picks uniformly at random from a fixed set of moves.",
            StrategyKind::Weighted => "Picks at random with probability proportional to each move's weight.",
            StrategyKind::Mirror => "Copies the opponent's last move. Starts at random.",
            StrategyKind::Adaptive => "Beats the opponent's most frequent move so far. Starts at random.",
        }
    }
}

/// Externally driven strategy
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Manual {
    pending: Option<Move>,
}

impl Manual {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, mv: Move) {
        self.pending = Some(mv);
    }

    pub fn pending(&self) -> Option<Move> {
        self.pending
    }

    fn take(&mut self) -> Option<Move> {
        self.pending.take()
    }
}

/// Uniform draw over a de-duplicated, non-empty move set
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Uniform {
    moves: Vec<Move>,
}

impl Uniform {
    /// Duplicates are dropped, keeping first-seen order
    pub fn new(moves: impl IntoIterator<Item = Move>) -> Result<Self, EngineError> {
        let mut unique: Vec<Move> = Vec::with_capacity(Move::ALL.len());
        for mv in moves {
            if !unique.contains(&mv) {
                unique.push(mv);
            }
        }
        if unique.is_empty() {
            return Err(EngineError::EmptyMoveSet);
        }
        Ok(Self { moves: unique })
    }

    /// Build from move names, rejecting anything that is not one of the five
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, EngineError> {
        let moves = names
            .iter()
            .map(|name| name.as_ref().parse::<Move>())
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(moves)
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    fn draw<R: RandomStream + ?Sized>(&self, rng: &R) -> Move {
        self.moves[rng.next_index(self.moves.len())]
    }
}

/// Weighted draw using cumulative-distribution sampling
#[derive(Clone, Debug, PartialEq)]
pub struct Weighted {
    weights: Vec<(Move, f64)>,
    /// Positive-weight entries only, in input order; never empty
    support: Vec<(Move, f64)>,
    total: f64,
}

impl Weighted {
    pub fn new(weights: impl IntoIterator<Item = (Move, f64)>) -> Result<Self, EngineError> {
        let mut entries: Vec<(Move, f64)> = Vec::with_capacity(Move::ALL.len());
        for (mv, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(EngineError::NegativeWeight { mv, weight });
            }
            if entries.iter().any(|(seen, _)| *seen == mv) {
                return Err(EngineError::DuplicateMove(mv));
            }
            entries.push((mv, weight));
        }

        let total: f64 = entries.iter().map(|(_, w)| w).sum();
        if !total.is_finite() || total <= 0.0 {
            return Err(EngineError::NonPositiveTotalWeight(total));
        }

        let support = entries.iter().copied().filter(|(_, w)| *w > 0.0).collect();
        Ok(Self {
            weights: entries,
            support,
            total,
        })
    }

    /// Every move at weight 1
    pub fn even() -> Self {
        let support: Vec<(Move, f64)> = Move::ALL.iter().map(|m| (*m, 1.0)).collect();
        Self {
            weights: support.clone(),
            support,
            total: Move::ALL.len() as f64,
        }
    }

    pub fn weights(&self) -> &[(Move, f64)] {
        &self.weights
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    fn draw<R: RandomStream + ?Sized>(&self, rng: &R) -> Move {
        let r = rng.next_unit() * self.total;
        let mut cumulative = 0.0;
        let mut fallback = self.support[0].0;
        for &(mv, weight) in &self.support {
            cumulative += weight;
            fallback = mv;
            if cumulative >= r {
                return mv;
            }
        }
        // Only reachable through floating-point rounding
        fallback
    }
}

/// Copies the opponent's previous move
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mirror {
    first_round: bool,
}

impl Mirror {
    pub fn new() -> Self {
        Self { first_round: true }
    }

    fn draw<R: RandomStream + ?Sized>(&mut self, last_opponent: Option<Move>, rng: &R) -> Move {
        match last_opponent {
            Some(mv) if !self.first_round => mv,
            _ => {
                self.first_round = false;
                random_move(rng)
            }
        }
    }

    fn reset(&mut self) {
        self.first_round = true;
    }
}

impl Default for Mirror {
    fn default() -> Self {
        Self::new()
    }
}

/// Frequency-counting opponent model
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Adaptive {
    /// Indexed by position in `Move::ALL`
    counts: [u32; 5],
}

impl Adaptive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observations(&self, mv: Move) -> u32 {
        self.counts[index_of(mv)]
    }

    pub fn total_observations(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Opponent's most frequent move; ties go to the earliest in `Move::ALL`
    pub fn most_frequent(&self) -> Option<Move> {
        let mut best: Option<(Move, u32)> = None;
        for (mv, &count) in Move::ALL.iter().zip(self.counts.iter()) {
            if count == 0 {
                continue;
            }
            match best {
                Some((_, best_count)) if best_count >= count => {}
                _ => best = Some((*mv, count)),
            }
        }
        best.map(|(mv, _)| mv)
    }

    fn draw<R: RandomStream + ?Sized>(&mut self, last_opponent: Option<Move>, rng: &R) -> Move {
        if let Some(mv) = last_opponent {
            self.counts[index_of(mv)] += 1;
        }

        let Some(target) = self.most_frequent() else {
            return random_move(rng);
        };

        let counters = Move::dominators_of(target);
        if counters.is_empty() {
            return random_move(rng);
        }
        counters[rng.next_index(counters.len())]
    }

    fn reset(&mut self) {
        self.counts = [0; 5];
    }
}

/// Complete strategy: one variant plus its state
#[derive(Clone, Debug, PartialEq)]
pub enum Strategy {
    Manual(Manual),
    Uniform(Uniform),
    Weighted(Weighted),
    Mirror(Mirror),
    Adaptive(Adaptive),
}

impl Strategy {
    pub fn manual() -> Self {
        Strategy::Manual(Manual::new())
    }

    pub fn uniform(moves: impl IntoIterator<Item = Move>) -> Result<Self, EngineError> {
        Uniform::new(moves).map(Strategy::Uniform)
    }

    pub fn weighted(weights: impl IntoIterator<Item = (Move, f64)>) -> Result<Self, EngineError> {
        Weighted::new(weights).map(Strategy::Weighted)
    }

    pub fn mirror() -> Self {
        Strategy::Mirror(Mirror::new())
    }

    pub fn adaptive() -> Self {
        Strategy::Adaptive(Adaptive::new())
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Manual(_) => StrategyKind::Manual,
            Strategy::Uniform(_) => StrategyKind::Uniform,
            Strategy::Weighted(_) => StrategyKind::Weighted,
            Strategy::Mirror(_) => StrategyKind::Mirror,
            Strategy::Adaptive(_) => StrategyKind::Adaptive,
        }
    }

    /// Produce the next move
    ///
    /// # Arguments
    /// * `last_opponent` - Opponent's move from the previous round, if any
    /// * `rng` - Shared random stream for this match
    ///
    /// # Returns
    /// `None` only for a manual strategy with nothing selected.
    pub fn next<R: RandomStream + ?Sized>(
        &mut self,
        last_opponent: Option<Move>,
        rng: &R,
    ) -> Option<Move> {
        let mv = match self {
            Strategy::Manual(manual) => return manual.take(),
            Strategy::Uniform(uniform) => uniform.draw(rng),
            Strategy::Weighted(weighted) => weighted.draw(rng),
            Strategy::Mirror(mirror) => mirror.draw(last_opponent, rng),
            Strategy::Adaptive(adaptive) => adaptive.draw(last_opponent, rng),
        };
        trace!(kind = ?self.kind(), %mv, "strategy drew move");
        Some(mv)
    }

    pub fn needs_external_input(&self) -> bool {
        matches!(self, Strategy::Manual(_))
    }

    /// True when `next` would return `None`
    pub fn is_awaiting_input(&self) -> bool {
        matches!(self, Strategy::Manual(manual) if manual.pending().is_none())
    }

    /// Queue a move for a manual strategy. Returns false for any other kind.
    pub fn select(&mut self, mv: Move) -> bool {
        match self {
            Strategy::Manual(manual) => {
                manual.select(mv);
                true
            }
            _ => false,
        }
    }

    /// Clear per-match history. No-op for stateless kinds.
    pub fn reset(&mut self) {
        match self {
            Strategy::Mirror(mirror) => mirror.reset(),
            Strategy::Adaptive(adaptive) => adaptive.reset(),
            Strategy::Manual(_) | Strategy::Uniform(_) | Strategy::Weighted(_) => {}
        }
    }

    /// Description including the configured parameters
    pub fn describe(&self) -> String {
        let mut desc = self.kind().describe().to_string();
        match self {
            Strategy::Uniform(uniform) => {
                let names: Vec<_> = uniform.moves().iter().map(|m| m.name()).collect();
                desc.push_str(&format!(" Moves: {}.", names.join(", ")));
            }
            Strategy::Weighted(weighted) => {
                let pairs: Vec<_> = weighted
                    .weights()
                    .iter()
                    .map(|(m, w)| format!("{}: {}", m, w))
                    .collect();
                desc.push_str(&format!(" Weights: {}.", pairs.join(", ")));
            }
            _ => {}
        }
        desc
    }
}

fn random_move<R: RandomStream + ?Sized>(rng: &R) -> Move {
    Move::ALL[rng.next_index(Move::ALL.len())]
}

fn index_of(mv: Move) -> usize {
    match mv {
        Move::Rock => 0,
        Move::Paper => 1,
        Move::Scissors => 2,
        Move::Lizard => 3,
        Move::Spock => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{RandomSource, DEFAULT_SEED};
    use std::cell::Cell;

    /// Always returns the same draws and counts how often it was asked
    struct Fixed {
        index: usize,
        unit: f64,
        draws: Cell<u32>,
    }

    impl Fixed {
        fn new(index: usize, unit: f64) -> Self {
            Self { index, unit, draws: Cell::new(0) }
        }
    }

    impl RandomStream for Fixed {
        fn next_unit(&self) -> f64 {
            self.draws.set(self.draws.get() + 1);
            self.unit
        }

        fn next_index(&self, n: usize) -> usize {
            self.draws.set(self.draws.get() + 1);
            self.index.min(n.saturating_sub(1))
        }

        fn reset(&self) {}
    }

    fn make_rng() -> RandomSource {
        RandomSource::new(DEFAULT_SEED)
    }

    #[test]
    fn test_manual_plays_selection_once() {
        let mut strategy = Strategy::manual();
        let rng = make_rng();

        assert!(strategy.needs_external_input());
        assert!(strategy.is_awaiting_input());
        assert_eq!(strategy.next(None, &rng), None);

        assert!(strategy.select(Move::Spock));
        assert!(!strategy.is_awaiting_input());
        assert_eq!(strategy.next(Some(Move::Rock), &rng), Some(Move::Spock));
        assert_eq!(strategy.next(Some(Move::Rock), &rng), None);
    }

    #[test]
    fn test_manual_never_draws_randomness() {
        let mut strategy = Strategy::manual();
        let rng = Fixed::new(0, 0.0);
        strategy.next(None, &rng);
        assert_eq!(rng.draws.get(), 0);
    }

    #[test]
    fn test_select_rejected_for_automatic_kinds() {
        let mut strategy = Strategy::mirror();
        assert!(!strategy.select(Move::Rock));
        assert!(!strategy.needs_external_input());
        assert!(!strategy.is_awaiting_input());
    }

    #[test]
    fn test_uniform_rejects_empty() {
        let err = Strategy::uniform(Vec::new()).unwrap_err();
        assert!(matches!(err, EngineError::EmptyMoveSet));
    }

    #[test]
    fn test_uniform_rejects_unknown_names() {
        let err = Uniform::from_names(&["Rock", "Banana"]).unwrap_err();
        assert!(matches!(err, EngineError::UnknownMove(ref s) if s == "Banana"));
    }

    #[test]
    fn test_uniform_deduplicates() {
        let uniform = Uniform::new([Move::Rock, Move::Paper, Move::Rock]).unwrap();
        assert_eq!(uniform.moves(), &[Move::Rock, Move::Paper]);
    }

    #[test]
    fn test_uniform_stays_in_set() {
        let mut strategy = Strategy::uniform([Move::Lizard, Move::Spock]).unwrap();
        let rng = make_rng();
        for _ in 0..200 {
            let mv = strategy.next(None, &rng).unwrap();
            assert!(mv == Move::Lizard || mv == Move::Spock, "got {}", mv);
        }
    }

    #[test]
    fn test_uniform_single_move_is_constant() {
        let mut strategy = Strategy::uniform([Move::Rock]).unwrap();
        let rng = make_rng();
        for _ in 0..20 {
            assert_eq!(strategy.next(None, &rng), Some(Move::Rock));
        }
    }

    #[test]
    fn test_weighted_rejects_bad_weights() {
        assert!(matches!(
            Strategy::weighted([(Move::Rock, -1.0)]).unwrap_err(),
            EngineError::NegativeWeight { mv: Move::Rock, .. }
        ));
        assert!(matches!(
            Strategy::weighted([(Move::Rock, f64::NAN)]).unwrap_err(),
            EngineError::NegativeWeight { .. }
        ));
        assert!(matches!(
            Strategy::weighted([(Move::Rock, 0.0), (Move::Paper, 0.0)]).unwrap_err(),
            EngineError::NonPositiveTotalWeight(_)
        ));
        assert!(matches!(
            Strategy::weighted(Vec::new()).unwrap_err(),
            EngineError::NonPositiveTotalWeight(_)
        ));
        assert!(matches!(
            Strategy::weighted([(Move::Rock, 1.0), (Move::Rock, 2.0)]).unwrap_err(),
            EngineError::DuplicateMove(Move::Rock)
        ));
    }

    #[test]
    fn test_weighted_rejects_overflowing_total() {
        // Each weight is finite but the sum is not
        let err = Strategy::weighted([
            (Move::Rock, f64::MAX),
            (Move::Paper, f64::MAX),
            (Move::Spock, 1.0),
        ])
        .unwrap_err();
        assert!(matches!(err, EngineError::NonPositiveTotalWeight(t) if t.is_infinite()));

        let half = f64::MAX / 2.0;
        assert!(Strategy::weighted([(Move::Rock, half), (Move::Paper, half)]).is_ok());
    }

    #[test]
    fn test_weighted_zero_weight_never_drawn() {
        // r = 0 must not select the leading zero-weight entry
        let mut strategy = Strategy::weighted([(Move::Rock, 0.0), (Move::Paper, 1.0)]).unwrap();
        let rng = Fixed::new(0, 0.0);
        assert_eq!(strategy.next(None, &rng), Some(Move::Paper));

        let rng = make_rng();
        for _ in 0..200 {
            assert_eq!(strategy.next(None, &rng), Some(Move::Paper));
        }
    }

    #[test]
    fn test_weighted_cumulative_walk() {
        let mut strategy =
            Strategy::weighted([(Move::Rock, 1.0), (Move::Paper, 1.0), (Move::Spock, 2.0)])
                .unwrap();

        // total 4: r=1.0 lands on Rock's boundary, r=1.6 in Paper, r=3.6 in Spock
        assert_eq!(strategy.next(None, &Fixed::new(0, 0.25)), Some(Move::Rock));
        assert_eq!(strategy.next(None, &Fixed::new(0, 0.4)), Some(Move::Paper));
        assert_eq!(strategy.next(None, &Fixed::new(0, 0.9)), Some(Move::Spock));
    }

    #[test]
    fn test_weighted_rounding_fallback_is_last_positive() {
        let mut strategy =
            Strategy::weighted([(Move::Rock, 1.0), (Move::Paper, 1.0), (Move::Lizard, 0.0)])
                .unwrap();
        // A unit draw of 1.0 cannot come from a real source; it exercises the fallback
        assert_eq!(strategy.next(None, &Fixed::new(0, 1.5)), Some(Move::Paper));
    }

    #[test]
    fn test_weighted_even_matches_constructor() {
        let even = Weighted::even();
        let built = Weighted::new(Move::ALL.iter().map(|m| (*m, 1.0))).unwrap();
        assert_eq!(even, built);
        assert_eq!(even.total(), 5.0);
    }

    #[test]
    fn test_mirror_first_round_random_then_copies() {
        let mut strategy = Strategy::mirror();
        let rng = Fixed::new(3, 0.0);

        // Opponent history is ignored on the very first call
        assert_eq!(strategy.next(Some(Move::Rock), &rng), Some(Move::Lizard));
        assert_eq!(strategy.next(Some(Move::Paper), &rng), Some(Move::Paper));
        assert_eq!(strategy.next(Some(Move::Spock), &rng), Some(Move::Spock));
        assert_eq!(rng.draws.get(), 1);
    }

    #[test]
    fn test_mirror_random_when_opponent_unknown() {
        let mut strategy = Strategy::mirror();
        let rng = Fixed::new(4, 0.0);
        strategy.next(None, &rng);
        assert_eq!(strategy.next(None, &rng), Some(Move::Spock));
        assert_eq!(rng.draws.get(), 2);
    }

    #[test]
    fn test_mirror_reset_restores_first_round() {
        let mut strategy = Strategy::mirror();
        let rng = Fixed::new(1, 0.0);
        strategy.next(None, &rng);
        strategy.reset();
        assert_eq!(strategy.next(Some(Move::Scissors), &rng), Some(Move::Paper));
    }

    #[test]
    fn test_adaptive_counters_most_frequent() {
        let mut strategy = Strategy::adaptive();
        let rng = make_rng();

        strategy.next(None, &rng);
        for _ in 0..10 {
            let mv = strategy.next(Some(Move::Rock), &rng).unwrap();
            assert!(mv == Move::Paper || mv == Move::Spock, "got {}", mv);
        }
    }

    #[test]
    fn test_adaptive_tie_goes_to_earliest_move() {
        let mut adaptive = Adaptive::new();
        let rng = Fixed::new(0, 0.0);
        adaptive.draw(Some(Move::Spock), &rng);
        adaptive.draw(Some(Move::Lizard), &rng);
        assert_eq!(adaptive.most_frequent(), Some(Move::Lizard));

        adaptive.draw(Some(Move::Spock), &rng);
        assert_eq!(adaptive.most_frequent(), Some(Move::Spock));
        assert_eq!(adaptive.observations(Move::Spock), 2);
        assert_eq!(adaptive.total_observations(), 3);
    }

    #[test]
    fn test_adaptive_picks_among_dominators() {
        let mut strategy = Strategy::adaptive();
        // Lizard is beaten by Rock and Scissors
        assert_eq!(strategy.next(Some(Move::Lizard), &Fixed::new(0, 0.0)), Some(Move::Rock));
        assert_eq!(strategy.next(Some(Move::Lizard), &Fixed::new(1, 0.0)), Some(Move::Scissors));
    }

    #[test]
    fn test_adaptive_reset_clears_counts() {
        let mut strategy = Strategy::adaptive();
        let rng = make_rng();
        for _ in 0..5 {
            strategy.next(Some(Move::Rock), &rng);
        }
        strategy.reset();
        match &strategy {
            Strategy::Adaptive(adaptive) => assert_eq!(adaptive.total_observations(), 0),
            other => panic!("unexpected strategy {:?}", other),
        }

        // Without observations the draw is uniform over all five
        assert_eq!(strategy.next(None, &Fixed::new(2, 0.0)), Some(Move::Scissors));
    }

    #[test]
    fn test_describe_includes_parameters() {
        let strategy = Strategy::uniform([Move::Rock, Move::Spock]).unwrap();
        assert!(strategy.describe().ends_with("Moves: Rock, Spock."));

        let strategy = Strategy::weighted([(Move::Paper, 2.0)]).unwrap();
        assert!(strategy.describe().contains("Paper: 2"));

        assert_eq!(Strategy::adaptive().describe(), StrategyKind::Adaptive.describe());
    }

    #[test]
    fn test_kinds() {
        assert_eq!(Strategy::manual().kind(), StrategyKind::Manual);
        assert_eq!(Strategy::mirror().kind(), StrategyKind::Mirror);
        assert_eq!(Strategy::adaptive().kind(), StrategyKind::Adaptive);
        assert_eq!(StrategyKind::ALL.len(), 5);
    }
}
