//! Problem definition boundary.
//!
//! A [`Problem`] declares its decision-variable bounds, objective count and
//! constraint count, and computes an [`Evaluation`] for a decision vector.
//! It is the only integration point between the framework and a domain.
//!
//! All objectives are **minimized**. Constraints follow the convention
//! `g(x) >= 0` is satisfied: a negative constraint value is a violation
//! whose magnitude is `|g(x)|`.
//!
//! # Submodules
//!
//! - [`benchmarks`]: Classic test problems (Schaffer, Fonseca, Kursawe, ZDT)

pub mod benchmarks;

use crate::error::{EvaluationFailure, MoeaError, Result};
use rand::Rng;
use std::fmt;

/// Whether a decision variable takes real or whole-number values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VariableKind {
    #[default]
    Real,
    /// Stored as `f64`, always holding a whole number.
    Integer,
}

/// Inclusive bounds of one decision variable.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariableBounds {
    pub lower: f64,
    pub upper: f64,
    pub kind: VariableKind,
}

impl VariableBounds {
    /// Real-valued variable in `[lower, upper]`.
    pub fn real(lower: f64, upper: f64) -> Self {
        Self {
            lower,
            upper,
            kind: VariableKind::Real,
        }
    }

    /// Integer variable in `[lower, upper]`.
    pub fn integer(lower: i64, upper: i64) -> Self {
        Self {
            lower: lower as f64,
            upper: upper as f64,
            kind: VariableKind::Integer,
        }
    }

    /// `n` copies of the same real interval.
    pub fn uniform(n: usize, lower: f64, upper: f64) -> Vec<Self> {
        vec![Self::real(lower, upper); n]
    }

    pub fn validate(&self) -> Result<()> {
        if !self.lower.is_finite() || !self.upper.is_finite() {
            return Err(MoeaError::invalid_config(format!(
                "bounds must be finite, got [{}, {}]",
                self.lower, self.upper
            )));
        }
        if self.lower > self.upper {
            return Err(MoeaError::invalid_config(format!(
                "lower bound {} exceeds upper bound {}",
                self.lower, self.upper
            )));
        }
        if !self.width().is_finite() {
            return Err(MoeaError::invalid_config(format!(
                "bounds [{}, {}] are too wide to sample",
                self.lower, self.upper
            )));
        }
        if self.kind == VariableKind::Integer
            && (self.lower.fract() != 0.0 || self.upper.fract() != 0.0)
        {
            return Err(MoeaError::invalid_config(format!(
                "integer bounds must be whole numbers, got [{}, {}]",
                self.lower, self.upper
            )));
        }
        Ok(())
    }

    /// Width of the interval.
    #[inline]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Whether `value` is a legal value for this variable.
    pub fn contains(&self, value: f64) -> bool {
        let in_range = value >= self.lower && value <= self.upper;
        match self.kind {
            VariableKind::Real => in_range,
            VariableKind::Integer => in_range && value.fract() == 0.0,
        }
    }

    /// Brings `value` back into the legal set.
    ///
    /// Integer variables are rounded to the nearest whole number; both kinds
    /// are then clamped to `[lower, upper]`. NaN maps to `lower`.
    pub fn repair(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.lower;
        }
        let value = match self.kind {
            VariableKind::Real => value,
            VariableKind::Integer => value.round(),
        };
        value.clamp(self.lower, self.upper)
    }

    /// Draws a uniformly distributed legal value.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self.kind {
            VariableKind::Real if self.lower < self.upper => {
                rng.random_range(self.lower..=self.upper)
            }
            VariableKind::Real => self.lower,
            VariableKind::Integer => {
                rng.random_range(self.lower as i64..=self.upper as i64) as f64
            }
        }
    }
}

/// Objective and constraint values computed for one decision vector.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Evaluation {
    pub objectives: Vec<f64>,
    /// One value per constraint; negative means violated.
    pub constraints: Vec<f64>,
}

impl Evaluation {
    /// Unconstrained evaluation.
    pub fn new(objectives: Vec<f64>) -> Self {
        Self {
            objectives,
            constraints: Vec::new(),
        }
    }

    pub fn with_constraints(objectives: Vec<f64>, constraints: Vec<f64>) -> Self {
        Self {
            objectives,
            constraints,
        }
    }

    /// Sum of the magnitudes of all violated constraints (0 when feasible).
    pub fn overall_violation(&self) -> f64 {
        self.constraints
            .iter()
            .filter(|&&c| c < 0.0)
            .map(|c| -c)
            .sum()
    }

    /// Number of violated constraints.
    pub fn violated_count(&self) -> usize {
        self.constraints.iter().filter(|&&c| c < 0.0).count()
    }
}

/// Defines an optimization problem.
///
/// Implementors provide the bounds, the objective count and
/// [`compute`](Problem::compute). The framework always goes through
/// [`evaluate`](Problem::evaluate), which checks dimensions on the way in and
/// on the way out.
///
/// # Thread Safety
///
/// `compute` must be side-effect free: the algorithm may call it concurrently
/// for different solutions of the same generation.
///
/// # Implementing
///
/// ```
/// use u_moea::problem::{Evaluation, Problem, VariableBounds};
/// use u_moea::EvaluationFailure;
///
/// struct Parabolas {
///     bounds: Vec<VariableBounds>,
/// }
///
/// impl Problem for Parabolas {
///     fn name(&self) -> &str { "Parabolas" }
///     fn bounds(&self) -> &[VariableBounds] { &self.bounds }
///     fn num_objectives(&self) -> usize { 2 }
///     fn compute(&self, x: &[f64]) -> Result<Evaluation, EvaluationFailure> {
///         Ok(Evaluation::new(vec![x[0] * x[0], (x[0] - 2.0).powi(2)]))
///     }
/// }
///
/// let p = Parabolas { bounds: VariableBounds::uniform(1, -5.0, 5.0) };
/// assert!(p.evaluate(&[1.0, 2.0]).is_err());
/// assert_eq!(p.evaluate(&[1.0]).unwrap().objectives, vec![1.0, 1.0]);
/// ```
pub trait Problem: Send + Sync {
    /// Human-readable problem name.
    fn name(&self) -> &str;

    /// Per-variable bounds; its length is the number of decision variables.
    fn bounds(&self) -> &[VariableBounds];

    fn num_variables(&self) -> usize {
        self.bounds().len()
    }

    fn num_objectives(&self) -> usize;

    fn num_constraints(&self) -> usize {
        0
    }

    /// Computes objectives and constraints for an already validated vector.
    ///
    /// Called only with `variables.len() == self.num_variables()`.
    fn compute(&self, variables: &[f64]) -> std::result::Result<Evaluation, EvaluationFailure>;

    /// Validated evaluation.
    ///
    /// # Errors
    ///
    /// - [`MoeaError::DimensionMismatch`] when `variables` has the wrong length,
    ///   or when `compute` returns vectors of the wrong length.
    /// - [`MoeaError::ProblemEvaluationFailed`] when `compute` fails.
    fn evaluate(&self, variables: &[f64]) -> Result<Evaluation> {
        if variables.len() != self.num_variables() {
            return Err(MoeaError::dimension_mismatch(
                self.num_variables(),
                variables.len(),
            ));
        }
        let evaluation = self
            .compute(variables)
            .map_err(|failure| MoeaError::evaluation_failed(variables, failure))?;
        if evaluation.objectives.len() != self.num_objectives() {
            return Err(MoeaError::dimension_mismatch(
                self.num_objectives(),
                evaluation.objectives.len(),
            ));
        }
        if evaluation.constraints.len() != self.num_constraints() {
            return Err(MoeaError::dimension_mismatch(
                self.num_constraints(),
                evaluation.constraints.len(),
            ));
        }
        Ok(evaluation)
    }
}

impl fmt::Debug for dyn Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Problem")
            .field("name", &self.name())
            .field("num_variables", &self.num_variables())
            .field("num_objectives", &self.num_objectives())
            .finish()
    }
}

/// Checks the static shape of a problem before any run touches it.
pub fn validate_problem(problem: &dyn Problem) -> Result<()> {
    if problem.num_variables() == 0 {
        return Err(MoeaError::invalid_config(format!(
            "problem {} declares no decision variables",
            problem.name()
        )));
    }
    if problem.num_objectives() == 0 {
        return Err(MoeaError::invalid_config(format!(
            "problem {} declares no objectives",
            problem.name()
        )));
    }
    problem.bounds().iter().try_for_each(VariableBounds::validate)
}
