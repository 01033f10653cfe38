//! Error taxonomy for the optimization framework.
//!
//! None of these conditions are retried internally. Once an [`Algorithm`]
//! reports one of them the run is over; restarting with a new seed is a
//! caller decision.
//!
//! [`Algorithm`]: crate::algorithm::Algorithm

use thiserror::Error;

/// Failure reported by a user-supplied [`Problem`](crate::problem::Problem)
/// while computing objectives or constraints.
pub type EvaluationFailure = Box<dyn std::error::Error + Send + Sync>;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MoeaError>;

#[derive(Debug, Error)]
pub enum MoeaError {
    /// A vector length does not match what the problem declares.
    #[error("DimensionMismatch: expected {expected} values, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// An operator parameter is missing or out of range.
    #[error("InvalidOperatorConfiguration: {operator}.{parameter}: {reason}")]
    InvalidOperatorConfiguration {
        operator: String,
        parameter: String,
        reason: String,
    },

    /// No strategy is registered under the requested pair.
    #[error(
        "UnknownAlgorithm: no strategy registered as {category}/{name}; valid options: {}",
        available.join(", ")
    )]
    UnknownAlgorithm {
        category: String,
        name: String,
        available: Vec<String>,
    },

    /// The problem's evaluation callback failed for `variables`.
    #[error("ProblemEvaluationFailed: {reason} (variables = {variables:?})")]
    ProblemEvaluationFailed { variables: Vec<f64>, reason: String },

    /// Algorithm-level configuration is unusable (population size, termination, bounds).
    #[error("InvalidConfiguration: {0}")]
    InvalidConfiguration(String),

    /// The strategy cannot be bound to a problem of this shape.
    #[error("IncompatibleProblem: {algorithm} {reason}")]
    IncompatibleProblem { algorithm: String, reason: String },

    /// A strategy's replacement step returned a population of the wrong size.
    #[error(
        "InvalidReplacement: {strategy} returned {actual} solutions, expected {expected}"
    )]
    InvalidReplacement {
        strategy: String,
        expected: usize,
        actual: usize,
    },

    /// The run already reached its terminal state.
    #[error("AlreadyTerminated: the run has finished and cannot be stepped again")]
    AlreadyTerminated,
}

impl MoeaError {
    pub(crate) fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    pub(crate) fn invalid_operator(
        operator: &str,
        parameter: &str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidOperatorConfiguration {
            operator: operator.to_string(),
            parameter: parameter.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn evaluation_failed(variables: &[f64], failure: EvaluationFailure) -> Self {
        Self::ProblemEvaluationFailed {
            variables: variables.to_vec(),
            reason: failure.to_string(),
        }
    }

    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_algorithm_lists_options() {
        let err = MoeaError::UnknownAlgorithm {
            category: "MultiObjective".into(),
            name: "DoesNotExist".into(),
            available: vec!["MultiObjective/NSGAII".into(), "SingleObjective/gGA".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("MultiObjective/DoesNotExist"));
        assert!(msg.contains("MultiObjective/NSGAII, SingleObjective/gGA"));
    }

    #[test]
    fn test_evaluation_failed_keeps_vector() {
        let err = MoeaError::evaluation_failed(&[0.5, 1.0], "boom".into());
        match err {
            MoeaError::ProblemEvaluationFailed { variables, reason } => {
                assert_eq!(variables, vec![0.5, 1.0]);
                assert_eq!(reason, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
