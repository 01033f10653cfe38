//! Parent selection operators.
//!
//! All strategies read the ranking metadata written by
//! [`assign_ranking`](crate::solution::assign_ranking) (rank and crowding
//! distance) or compare solutions by constrained dominance directly.
//! Lower rank is better; among equal ranks a larger crowding distance wins.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Deb et al. (2002), crowded binary tournament

use super::Selection;
use crate::error::{MoeaError, Result};
use crate::solution::{constrained_dominance, crowded_comparison, Dominance, Solution};
use rand::{Rng, RngCore};
use std::cmp::Ordering;

/// Binary tournament as in Deb's NSGA-II code.
///
/// Two distinct members are drawn; the dominating one wins, otherwise the
/// one with the larger crowding distance, otherwise a fair coin decides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinaryTournament;

impl BinaryTournament {
    pub const NAME: &'static str = "BinaryTournament";
}

impl Selection for BinaryTournament {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn select<'a>(&self, population: &'a [Solution], rng: &mut dyn RngCore) -> &'a Solution {
        assert!(
            !population.is_empty(),
            "cannot select from empty population"
        );
        let n = population.len();
        if n == 1 {
            return &population[0];
        }

        let i = rng.random_range(0..n);
        let mut j = rng.random_range(0..n - 1);
        if j >= i {
            j += 1;
        }
        let (a, b) = (&population[i], &population[j]);

        match constrained_dominance(a, b) {
            Dominance::Left => a,
            Dominance::Right => b,
            Dominance::Neither => {
                if a.crowding_distance() > b.crowding_distance() {
                    a
                } else if b.crowding_distance() > a.crowding_distance() {
                    b
                } else if rng.random_bool(0.5) {
                    a
                } else {
                    b
                }
            }
        }
    }
}

/// Tournament of `k` members drawn with replacement; the best by crowded
/// comparison wins.
///
/// Higher `k` = stronger selection pressure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tournament {
    size: usize,
}

impl Tournament {
    pub const NAME: &'static str = "Tournament";

    /// # Errors
    /// `size` is zero.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(MoeaError::invalid_operator(
                Self::NAME,
                "size",
                "must be at least 1",
            ));
        }
        Ok(Self { size })
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

impl Selection for Tournament {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn select<'a>(&self, population: &'a [Solution], rng: &mut dyn RngCore) -> &'a Solution {
        assert!(
            !population.is_empty(),
            "cannot select from empty population"
        );
        let n = population.len();

        let mut best_idx = rng.random_range(0..n);
        for _ in 1..self.size {
            let idx = rng.random_range(0..n);
            if crowded_comparison(&population[idx], &population[best_idx]) == Ordering::Less {
                best_idx = idx;
            }
        }
        &population[best_idx]
    }
}

/// Uniformly random selection; no selection pressure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RandomSelection;

impl RandomSelection {
    pub const NAME: &'static str = "RandomSelection";
}

impl Selection for RandomSelection {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn select<'a>(&self, population: &'a [Solution], rng: &mut dyn RngCore) -> &'a Solution {
        assert!(
            !population.is_empty(),
            "cannot select from empty population"
        );
        &population[rng.random_range(0..population.len())]
    }
}
