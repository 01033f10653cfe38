//! Variation and selection operators.
//!
//! Each operator role is its own capability trait:
//!
//! - [`Selection`]: choose a parent (or survivor) from a population
//! - [`Crossover`]: recombine two parents into two offspring
//! - [`Mutation`]: perturb one offspring gene by gene
//!
//! Operators are immutable after construction and take every random number
//! from the generator passed in, so a fixed seed and a fixed population order
//! always reproduce the same choices. Constructors validate their parameters
//! and fail with [`MoeaError::InvalidOperatorConfiguration`] before any
//! generation runs.
//!
//! # Bound policy
//!
//! | Operator | Out-of-range genes |
//! |----------|--------------------|
//! | [`SbxCrossover`] | clamped |
//! | [`BlxAlphaCrossover`] | clamped |
//! | [`SinglePointCrossover`] | cannot occur (genes are swapped) |
//! | [`PolynomialMutation`] | clamped |
//! | [`UniformMutation`] | re-sampled uniformly inside the bounds |
//!
//! Integer variables are additionally rounded by [`VariableBounds::repair`].
//!
//! [`MoeaError::InvalidOperatorConfiguration`]: crate::MoeaError::InvalidOperatorConfiguration

mod config;
mod crossover;
mod mutation;
mod selection;

pub use config::{CrossoverConfig, MutationConfig, OperatorParams, SelectionConfig};
pub use crossover::{BlxAlphaCrossover, SbxCrossover, SinglePointCrossover};
pub use mutation::{PolynomialMutation, UniformMutation};
pub use selection::{BinaryTournament, RandomSelection, Tournament};

use crate::error::{MoeaError, Result};
use crate::problem::VariableBounds;
use crate::solution::Solution;
use rand::RngCore;
use std::fmt::Debug;

/// Chooses solutions from a population.
pub trait Selection: Send + Sync + Debug {
    /// Operator name as used by [`SelectionConfig::from_params`].
    fn name(&self) -> &'static str;

    /// Selects one solution.
    ///
    /// # Panics
    /// Panics if `population` is empty.
    fn select<'a>(&self, population: &'a [Solution], rng: &mut dyn RngCore) -> &'a Solution;

    /// Selects `count` solutions with replacement.
    fn select_many<'a>(
        &self,
        population: &'a [Solution],
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<&'a Solution> {
        (0..count).map(|_| self.select(population, rng)).collect()
    }
}

/// Recombines two parents.
///
/// Parents are never modified. When the operator's probability test fails
/// the offspring are plain copies of the parents, evaluation included.
pub trait Crossover: Send + Sync + Debug {
    /// Operator name as used by [`CrossoverConfig::from_params`].
    fn name(&self) -> &'static str;

    /// # Errors
    /// [`MoeaError::DimensionMismatch`] if a parent's length differs from `bounds`.
    fn cross(
        &self,
        parent1: &Solution,
        parent2: &Solution,
        bounds: &[VariableBounds],
        rng: &mut dyn RngCore,
    ) -> Result<(Solution, Solution)>;
}

/// Perturbs a solution gene by gene.
pub trait Mutation: Send + Sync + Debug {
    /// Operator name as used by [`MutationConfig::from_params`].
    fn name(&self) -> &'static str;

    /// Mutates `solution` in place. Only call this on a solution nobody else
    /// refers to (a freshly produced offspring).
    ///
    /// # Errors
    /// [`MoeaError::DimensionMismatch`] if `solution`'s length differs from `bounds`.
    fn mutate(
        &self,
        solution: &mut Solution,
        bounds: &[VariableBounds],
        rng: &mut dyn RngCore,
    ) -> Result<()>;

    /// Returns a mutated copy, leaving `solution` untouched.
    fn mutated(
        &self,
        solution: &Solution,
        bounds: &[VariableBounds],
        rng: &mut dyn RngCore,
    ) -> Result<Solution> {
        let mut copy = solution.clone();
        self.mutate(&mut copy, bounds, rng)?;
        Ok(copy)
    }
}

fn check_dimensions(solution: &Solution, bounds: &[VariableBounds]) -> Result<()> {
    if solution.variables().len() != bounds.len() {
        return Err(MoeaError::dimension_mismatch(
            bounds.len(),
            solution.variables().len(),
        ));
    }
    Ok(())
}

fn check_probability(operator: &str, parameter: &str, value: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&value) {
        return Err(MoeaError::invalid_operator(
            operator,
            parameter,
            format!("must be within [0, 1], got {value}"),
        ));
    }
    Ok(value)
}

fn check_non_negative(operator: &str, parameter: &str, value: f64) -> Result<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(MoeaError::invalid_operator(
            operator,
            parameter,
            format!("must be finite and non-negative, got {value}"),
        ));
    }
    Ok(value)
}
