//! Algorithm configuration.
//!
//! [`AlgorithmConfig`] holds every parameter that controls the generational
//! loop; [`Termination`] groups the stopping conditions.

use crate::error::{MoeaError, Result};
use crate::operators::{CrossoverConfig, MutationConfig, SelectionConfig};

/// Stopping conditions, checked at generation boundaries only.
///
/// The run stops as soon as any enabled condition holds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Termination {
    /// Maximum number of generations (steps for steady-state strategies).
    pub max_generations: usize,

    /// Maximum number of problem evaluations, initial population included.
    ///
    /// `None` disables the limit.
    pub max_evaluations: Option<usize>,

    /// Number of generations without progress before stopping.
    ///
    /// Progress means the ideal point of the feasible first front improved
    /// (see [`convergence_threshold`](Self::convergence_threshold)), or, while
    /// no feasible solution exists, the smallest constraint violation shrank.
    /// Set to 0 to disable stagnation-based termination.
    pub stagnation_limit: usize,

    /// Minimum relative improvement of an ideal-point component,
    /// `(old - new) / |old|`, that counts as progress.
    ///
    /// Set to 0.0 to count any improvement (the default).
    pub convergence_threshold: f64,
}

impl Default for Termination {
    fn default() -> Self {
        Self {
            max_generations: 250,
            max_evaluations: None,
            stagnation_limit: 0,
            convergence_threshold: 0.0,
        }
    }
}

/// Configuration for an [`Algorithm`](super::Algorithm) run.
///
/// # Defaults
///
/// ```
/// use u_moea::algorithm::AlgorithmConfig;
///
/// let config = AlgorithmConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.termination.max_generations, 250);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_moea::algorithm::AlgorithmConfig;
/// use u_moea::operators::SelectionConfig;
///
/// let config = AlgorithmConfig::default()
///     .with_population_size(40)
///     .with_max_generations(100)
///     .with_crossover_probability(0.9)
///     .with_mutation_probability(0.1)
///     .with_selection(SelectionConfig::Tournament(3))
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlgorithmConfig {
    /// Number of solutions kept between generations.
    pub population_size: usize,

    pub termination: Termination,

    /// Parent selection operator.
    pub selection: SelectionConfig,

    pub crossover: CrossoverConfig,

    pub mutation: MutationConfig,

    /// Whether to evaluate offspring in parallel using rayon.
    ///
    /// Has no effect without the `parallel` feature. Results do not depend
    /// on this flag.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,

    /// Optional wall-clock time limit in milliseconds, measured from
    /// initialization.
    ///
    /// Checked after each generation, so the actual runtime may exceed the
    /// limit by one generation's worth of work.
    pub time_limit_ms: Option<u64>,
}

impl Default for AlgorithmConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            termination: Termination::default(),
            selection: SelectionConfig::default(),
            crossover: CrossoverConfig::default(),
            mutation: MutationConfig::default(),
            parallel: true,
            seed: None,
            time_limit_ms: None,
        }
    }
}

impl AlgorithmConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_termination(mut self, termination: Termination) -> Self {
        self.termination = termination;
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.termination.max_generations = n;
        self
    }

    /// Sets the evaluation budget.
    pub fn with_max_evaluations(mut self, n: usize) -> Self {
        self.termination.max_evaluations = Some(n);
        self
    }

    /// Sets the stagnation limit (0 to disable).
    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.termination.stagnation_limit = limit;
        self
    }

    /// Sets the convergence threshold. Negative values are clamped to 0.
    pub fn with_convergence_threshold(mut self, threshold: f64) -> Self {
        self.termination.convergence_threshold = threshold.max(0.0);
        self
    }

    pub fn with_selection(mut self, selection: SelectionConfig) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_crossover(mut self, crossover: CrossoverConfig) -> Self {
        self.crossover = crossover;
        self
    }

    pub fn with_mutation(mut self, mutation: MutationConfig) -> Self {
        self.mutation = mutation;
        self
    }

    /// Sets the probability of the configured crossover.
    ///
    /// Not clamped: an out-of-range value fails when the operator is built.
    pub fn with_crossover_probability(mut self, probability: f64) -> Self {
        match &mut self.crossover {
            CrossoverConfig::Sbx { probability: p, .. }
            | CrossoverConfig::BlxAlpha { probability: p, .. }
            | CrossoverConfig::SinglePoint { probability: p } => *p = probability,
        }
        self
    }

    /// Sets the per-gene probability of the configured mutation.
    pub fn with_mutation_probability(mut self, probability: f64) -> Self {
        match &mut self.mutation {
            MutationConfig::Polynomial { probability: p, .. }
            | MutationConfig::Uniform { probability: p, .. } => *p = Some(probability),
        }
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the wall-clock time limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Validates the loop parameters. Operator parameters are validated
    /// when the operators are built.
    ///
    /// # Errors
    /// [`MoeaError::InvalidConfiguration`] describing the first bad value.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(MoeaError::invalid_config(
                "population_size must be at least 2",
            ));
        }
        if self.termination.max_generations == 0 {
            return Err(MoeaError::invalid_config(
                "max_generations must be at least 1",
            ));
        }
        if self.termination.max_evaluations == Some(0) {
            return Err(MoeaError::invalid_config(
                "max_evaluations must be positive or None",
            ));
        }
        let threshold = self.termination.convergence_threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(MoeaError::invalid_config(
                "convergence_threshold must be finite and non-negative",
            ));
        }
        if self.time_limit_ms == Some(0) {
            return Err(MoeaError::invalid_config(
                "time_limit_ms must be positive or None",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AlgorithmConfig::default();
        assert_eq!(config.population_size, 100);
        assert_eq!(config.termination.max_generations, 250);
        assert!(config.termination.max_evaluations.is_none());
        assert_eq!(config.termination.stagnation_limit, 0);
        assert_eq!(config.selection, SelectionConfig::BinaryTournament);
        assert!((config.crossover.probability() - 0.9).abs() < 1e-10);
        assert!(config.parallel);
        assert!(config.seed.is_none());
        assert!(config.time_limit_ms.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = AlgorithmConfig::default()
            .with_population_size(10)
            .with_max_generations(50)
            .with_max_evaluations(600)
            .with_stagnation_limit(5)
            .with_crossover(CrossoverConfig::SinglePoint { probability: 1.0 })
            .with_crossover_probability(0.8)
            .with_mutation_probability(0.1)
            .with_parallel(false)
            .with_seed(42);

        assert_eq!(config.population_size, 10);
        assert_eq!(config.termination.max_generations, 50);
        assert_eq!(config.termination.max_evaluations, Some(600));
        assert_eq!(config.termination.stagnation_limit, 5);
        assert_eq!(
            config.crossover,
            CrossoverConfig::SinglePoint { probability: 0.8 }
        );
        assert_eq!(
            config.mutation,
            MutationConfig::Polynomial {
                probability: Some(0.1),
                distribution_index: 20.0
            }
        );
        assert!(!config.parallel);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_validate_ok() {
        assert!(AlgorithmConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_population_too_small() {
        let config = AlgorithmConfig::default().with_population_size(1);
        assert!(matches!(
            config.validate(),
            Err(MoeaError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_validate_zero_limits() {
        assert!(AlgorithmConfig::default()
            .with_max_generations(0)
            .validate()
            .is_err());
        assert!(AlgorithmConfig::default()
            .with_max_evaluations(0)
            .validate()
            .is_err());
        assert!(AlgorithmConfig::default()
            .with_time_limit_ms(0)
            .validate()
            .is_err());
        assert!(AlgorithmConfig::default()
            .with_time_limit_ms(1)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_convergence_threshold_clamps_negative() {
        let config = AlgorithmConfig::default().with_convergence_threshold(-0.5);
        assert!((config.termination.convergence_threshold - 0.0).abs() < 1e-15);
        let mut config = AlgorithmConfig::default();
        config.termination.convergence_threshold = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_probabilities_not_clamped() {
        let config = AlgorithmConfig::default().with_crossover_probability(1.5);
        assert!((config.crossover.probability() - 1.5).abs() < 1e-15);
        assert!(config.crossover.build().is_err());
    }
}
