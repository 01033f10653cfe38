//! A single candidate point.

use crate::error::Result;
use crate::problem::{Evaluation, Problem, VariableBounds};
use rand::Rng;

/// One candidate solution.
///
/// Holds the decision vector, the objective vector and constraint summary
/// from the last evaluation, and the ranking metadata written by
/// environmental selection.
///
/// Objective values are only meaningful while [`is_evaluated`](Self::is_evaluated)
/// is `true`: any change to the decision vector through
/// [`variables_mut`](Self::variables_mut) marks them stale.
///
/// `Clone` is a deep copy; operators clone parents before modifying them.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    variables: Vec<f64>,
    objectives: Vec<f64>,
    constraint_violation: f64,
    violated_constraints: usize,
    evaluated: bool,
    pub(crate) rank: usize,
    pub(crate) crowding_distance: f64,
}

impl Solution {
    /// Creates an unevaluated solution from a decision vector.
    pub fn new(variables: Vec<f64>) -> Self {
        Self {
            variables,
            objectives: Vec::new(),
            constraint_violation: 0.0,
            violated_constraints: 0,
            evaluated: false,
            rank: usize::MAX,
            crowding_distance: 0.0,
        }
    }

    /// Samples every variable uniformly within `bounds`.
    pub fn random<R: Rng + ?Sized>(bounds: &[VariableBounds], rng: &mut R) -> Self {
        Self::new(bounds.iter().map(|b| b.sample(rng)).collect())
    }

    #[inline]
    pub fn variables(&self) -> &[f64] {
        &self.variables
    }

    /// Mutable access to the decision vector. Marks the evaluation stale.
    pub fn variables_mut(&mut self) -> &mut [f64] {
        self.invalidate();
        &mut self.variables
    }

    /// Objective values of the last evaluation (empty before the first one).
    #[inline]
    pub fn objectives(&self) -> &[f64] {
        &self.objectives
    }

    #[inline]
    pub fn is_evaluated(&self) -> bool {
        self.evaluated
    }

    /// Sum of the magnitudes of violated constraints; 0 when feasible.
    #[inline]
    pub fn constraint_violation(&self) -> f64 {
        self.constraint_violation
    }

    #[inline]
    pub fn violated_constraints(&self) -> usize {
        self.violated_constraints
    }

    #[inline]
    pub fn is_feasible(&self) -> bool {
        self.violated_constraints == 0
    }

    /// Non-domination rank from the last ranking (0 = first front).
    #[inline]
    pub fn rank(&self) -> usize {
        self.rank
    }

    #[inline]
    pub fn crowding_distance(&self) -> f64 {
        self.crowding_distance
    }

    /// Stores the result of an evaluation.
    pub fn apply(&mut self, evaluation: Evaluation) {
        self.constraint_violation = evaluation.overall_violation();
        self.violated_constraints = evaluation.violated_count();
        self.objectives = evaluation.objectives;
        self.evaluated = true;
    }

    /// Evaluates against `problem` and stores the result.
    pub fn evaluate(&mut self, problem: &dyn Problem) -> Result<()> {
        let evaluation = problem.evaluate(&self.variables)?;
        self.apply(evaluation);
        Ok(())
    }

    /// Marks the objective vector stale and clears ranking metadata.
    pub fn invalidate(&mut self) {
        self.evaluated = false;
        self.rank = usize::MAX;
        self.crowding_distance = 0.0;
    }

    /// Whether every variable is a legal value of its bound.
    pub fn within(&self, bounds: &[VariableBounds]) -> bool {
        self.variables.len() == bounds.len()
            && self
                .variables
                .iter()
                .zip(bounds)
                .all(|(&v, b)| b.contains(v))
    }

    /// Consumes the solution into its `(decision, objective)` pair.
    pub fn into_pair(self) -> (Vec<f64>, Vec<f64>) {
        (self.variables, self.objectives)
    }
}
