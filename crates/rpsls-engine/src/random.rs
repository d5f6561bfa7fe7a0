//! Seeded pseudo-random number generation
//!
//! Deterministic PRNG shared by every strategy in a match.
//! Uses a simple but effective xorshift algorithm behind a mutex so that
//! clones of one [`RandomSource`] draw from (and reset) the same sequence.

use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use tracing::trace;

/// Seed used when nothing else is configured
pub const DEFAULT_SEED: u64 = 42;

/// Source of uniform draws consumed by strategies.
///
/// [`RandomSource`] is the production implementation; tests may supply a
/// scripted stream instead.
pub trait RandomStream {
    /// Uniform in [0, 1)
    fn next_unit(&self) -> f64;

    /// Uniform in [0, n); returns 0 when n is 0
    fn next_index(&self, n: usize) -> usize;

    /// Rewind to the start of the seeded sequence
    fn reset(&self);
}

/// Seeded random number generator
///
/// Deterministic: same seed = same sequence
#[derive(Clone, Debug)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        // xorshift must never hold a zero state
        let mut state = seed ^ 0x517cc1b727220a95;
        if state == 0 {
            state = 0x9e3779b97f4a7c15;
        }

        // Warm up the generator
        let mut rng = Self { state };
        for _ in 0..8 {
            rng.next_u64();
        }

        rng
    }

    /// Generate next u64
    pub fn next_u64(&mut self) -> u64 {
        // xorshift64*
        self.state ^= self.state >> 12;
        self.state ^= self.state << 25;
        self.state ^= self.state >> 27;
        self.state.wrapping_mul(0x2545f4914f6cdd1d)
    }

    /// Generate a float in [0, 1) from the top 53 bits
    pub fn next_unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Generate a value in range [0, max)
    pub fn next_range(&mut self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        (self.next_u64() % max as u64) as usize
    }
}

/// Re-seedable generator handle shared across strategies
///
/// Cloning yields another handle onto the same generator, so a reset through
/// any handle rewinds every holder.
#[derive(Clone, Debug)]
pub struct RandomSource {
    seed: u64,
    rng: Arc<Mutex<SeededRng>>,
}

impl RandomSource {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Arc::new(Mutex::new(SeededRng::new(seed))),
        }
    }

    /// Handle onto the process-wide generator seeded with [`DEFAULT_SEED`]
    pub fn shared() -> Self {
        static SHARED: OnceLock<RandomSource> = OnceLock::new();
        SHARED.get_or_init(|| RandomSource::new(DEFAULT_SEED)).clone()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    // The guarded value is a bare integer, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, SeededRng> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl RandomStream for RandomSource {
    fn next_unit(&self) -> f64 {
        self.lock().next_unit()
    }

    fn next_index(&self, n: usize) -> usize {
        let index = self.lock().next_range(n);
        trace!(n, index, "random index drawn");
        index
    }

    fn reset(&self) {
        *self.lock() = SeededRng::new(self.seed);
    }
}
