//! Strategy seam and run bookkeeping types.

use crate::error::Result;
use crate::problem::{Problem, VariableBounds};
use crate::solution::{Population, Solution};
use rand::RngCore;
use std::fmt;

/// Replacement policy plugged into the shared generational loop.
///
/// The loop owns selection, variation, evaluation and termination; a
/// strategy decides how many offspring one generation produces, how the
/// initial population is sampled, and which solutions survive.
pub trait Strategy: Send + Sync + fmt::Debug {
    /// Registry name, e.g. `"NSGAII"`.
    fn name(&self) -> &'static str;

    /// Rejects problems the strategy cannot handle.
    ///
    /// # Errors
    /// [`MoeaError::IncompatibleProblem`](crate::MoeaError::IncompatibleProblem).
    fn check_problem(&self, _problem: &dyn Problem) -> Result<()> {
        Ok(())
    }

    /// Samples one member of the initial population.
    fn sample(&self, bounds: &[VariableBounds], rng: &mut dyn RngCore) -> Solution {
        Solution::random(bounds, rng)
    }

    /// Offspring produced per generation.
    fn offspring_count(&self, population_size: usize) -> usize {
        population_size
    }

    /// Builds the next population of exactly `size` members from the
    /// evaluated `current` population and its evaluated `offspring`.
    ///
    /// Must be a pure function of the input order and values. Returning any
    /// other size aborts the run with
    /// [`MoeaError::InvalidReplacement`](crate::MoeaError::InvalidReplacement).
    fn next_generation(&self, current: Population, offspring: Population, size: usize)
        -> Population;
}

/// Lifecycle of an [`Algorithm`](super::Algorithm).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlgorithmState {
    /// Bound to a problem, no population yet.
    Uninitialized,
    /// Initial population sampled and evaluated.
    Initialized,
    /// At least one generation completed.
    Running,
    /// Final. Further steps fail with `AlreadyTerminated`.
    Terminated,
}

/// Why a run reached [`AlgorithmState::Terminated`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    MaxGenerations,
    MaxEvaluations,
    /// No progress for `stagnation_limit` generations.
    Stagnation,
    TimeLimit,
    Cancelled,
    /// The problem failed to evaluate a solution; the run was aborted.
    EvaluationFailed,
    /// The strategy broke the fixed population size; the run was aborted.
    StrategyFailed,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MaxGenerations => "max generations reached",
            Self::MaxEvaluations => "max evaluations reached",
            Self::Stagnation => "stagnation",
            Self::TimeLimit => "time limit",
            Self::Cancelled => "cancelled",
            Self::EvaluationFailed => "evaluation failed",
            Self::StrategyFailed => "strategy failed",
        };
        f.write_str(s)
    }
}

/// Snapshot taken after initialization (generation 0) and after every
/// generation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationStats {
    pub generation: usize,
    /// Cumulative evaluation count.
    pub evaluations: usize,
    /// Size of the first front (constrained dominance).
    pub front_size: usize,
    /// Per-objective minimum over the feasible first front; empty when no
    /// member is feasible.
    pub ideal_point: Vec<f64>,
}

/// Outcome of a finished run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Final population in replacement order.
    pub population: Population,
    /// Non-dominated subset of `population`.
    pub front: Population,
    pub generations: usize,
    pub evaluations: usize,
    pub stop_reason: StopReason,
    pub history: Vec<GenerationStats>,
}
