//! Ordered collection of solutions.

use super::dominance::{constrained_dominance, Dominance};
use super::types::Solution;
use std::ops::{Deref, DerefMut};

/// An ordered set of [`Solution`]s evolved together.
///
/// Dereferences to `[Solution]` for reading and in-place updates; growing
/// the set goes through [`push`](Self::push) or [`union`](Self::union).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Population {
    solutions: Vec<Solution>,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            solutions: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, solution: Solution) {
        self.solutions.push(solution);
    }

    /// Concatenates `other` after `self`, preserving order.
    pub fn union(mut self, other: Population) -> Population {
        self.solutions.extend(other.solutions);
        self
    }

    /// Keeps the first `len` solutions.
    pub fn truncate(&mut self, len: usize) {
        self.solutions.truncate(len);
    }

    /// Members dominated by no other member (constrained dominance).
    ///
    /// Order follows the population order.
    pub fn non_dominated(&self) -> Population {
        self.solutions
            .iter()
            .enumerate()
            .filter(|&(i, s)| {
                !self.solutions.iter().enumerate().any(|(j, other)| {
                    i != j && constrained_dominance(other, s) == Dominance::Left
                })
            })
            .map(|(_, s)| s.clone())
            .collect()
    }

    /// `(decision vector, objective vector)` pairs in population order.
    pub fn to_pairs(&self) -> Vec<(Vec<f64>, Vec<f64>)> {
        self.solutions
            .iter()
            .map(|s| (s.variables().to_vec(), s.objectives().to_vec()))
            .collect()
    }

    pub fn into_vec(self) -> Vec<Solution> {
        self.solutions
    }
}

impl Deref for Population {
    type Target = [Solution];

    fn deref(&self) -> &[Solution] {
        &self.solutions
    }
}

impl DerefMut for Population {
    fn deref_mut(&mut self) -> &mut [Solution] {
        &mut self.solutions
    }
}

impl From<Vec<Solution>> for Population {
    fn from(solutions: Vec<Solution>) -> Self {
        Self { solutions }
    }
}

impl FromIterator<Solution> for Population {
    fn from_iter<T: IntoIterator<Item = Solution>>(iter: T) -> Self {
        Self {
            solutions: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Population {
    type Item = Solution;
    type IntoIter = std::vec::IntoIter<Solution>;

    fn into_iter(self) -> Self::IntoIter {
        self.solutions.into_iter()
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Solution;
    type IntoIter = std::slice::Iter<'a, Solution>;

    fn into_iter(self) -> Self::IntoIter {
        self.solutions.iter()
    }
}
