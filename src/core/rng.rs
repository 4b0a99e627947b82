//! Shape supply - 7-bag random generation
//!
//! Implements the "bag" randomization used by modern falling-block games:
//! every window of 7 draws aligned to a bag boundary contains each of the
//! seven shapes exactly once. The queue is topped up with a freshly shuffled
//! bag whenever fewer than a full bag remains, so previews never run dry.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::types::ShapeId;

/// Shapes per bag (one of each family).
pub const BAG_SIZE: usize = 7;

/// Upper bound for `peek`: two full bags.
const PREVIEW_LIMIT: usize = 2 * BAG_SIZE;

/// Unending fair shape sequence.
#[derive(Debug, Clone)]
pub struct ShapeGenerator {
    upcoming: VecDeque<ShapeId>,
    rng: StdRng,
}

impl ShapeGenerator {
    /// Create a generator seeded from OS entropy. There is no persisted
    /// seed; a fresh instance starts a fresh sequence.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic generator for tests.
    pub fn from_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let mut generator = Self {
            upcoming: VecDeque::with_capacity(3 * BAG_SIZE),
            rng,
        };
        // Start with two bags so the preview window is full from draw one.
        generator.refill();
        generator.refill();
        generator
    }

    /// Append one uniformly shuffled bag (Fisher-Yates via `rand`).
    fn refill(&mut self) {
        let mut bag = ShapeId::ALL;
        bag.shuffle(&mut self.rng);
        self.upcoming.extend(bag);
    }

    /// Remove and return the next shape, replenishing the queue whenever
    /// fewer than a full bag remains.
    pub fn next(&mut self) -> ShapeId {
        if self.upcoming.len() < BAG_SIZE {
            self.refill();
        }
        self.upcoming
            .pop_front()
            .expect("queue replenished to at least one bag above")
    }

    /// The next `n` upcoming shapes (capped at two bags) without consuming.
    pub fn peek(&mut self, n: usize) -> Vec<ShapeId> {
        let n = n.min(PREVIEW_LIMIT);
        while self.upcoming.len() < n {
            self.refill();
        }
        self.upcoming.iter().copied().take(n).collect()
    }
}

impl Default for ShapeGenerator {
    fn default() -> Self {
        Self::new()
    }
}
