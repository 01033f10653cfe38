//! Strategy registry.
//!
//! Resolves a `(category, name)` pair chosen at configuration time into an
//! [`Algorithm`] bound to a problem. The table is filled at startup and can
//! be enumerated, so callers can validate identifiers up front and error
//! messages can list every valid option.
//!
//! ```
//! use std::sync::Arc;
//! use u_moea::algorithm::AlgorithmConfig;
//! use u_moea::problem::benchmarks::Schaffer;
//! use u_moea::{AlgorithmRegistry, MoeaError};
//!
//! let registry = AlgorithmRegistry::builtin();
//! let problem = Arc::new(Schaffer::default());
//!
//! let algorithm = registry
//!     .resolve("MultiObjective", "NSGAII", problem.clone(), AlgorithmConfig::default())
//!     .unwrap();
//! assert_eq!(algorithm.strategy_name(), "NSGAII");
//!
//! let err = registry
//!     .resolve("MultiObjective", "DoesNotExist", problem, AlgorithmConfig::default())
//!     .unwrap_err();
//! assert!(matches!(err, MoeaError::UnknownAlgorithm { .. }));
//! ```

use crate::algorithm::{
    Algorithm, AlgorithmConfig, GenerationalGa, Nsga2, SteadyStateGa, SteadyStateNsga2, Strategy,
};
use crate::error::{MoeaError, Result};
use crate::problem::Problem;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Strategy family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Category {
    MultiObjective,
    SingleObjective,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MultiObjective => "MultiObjective",
            Self::SingleObjective => "SingleObjective",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A category string that names no [`Category`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category {0:?}; expected MultiObjective or SingleObjective")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    /// Case-sensitive.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "MultiObjective" => Ok(Self::MultiObjective),
            "SingleObjective" => Ok(Self::SingleObjective),
            _ => Err(ParseCategoryError(s.to_string())),
        }
    }
}

/// Narrow reporting capability for resolution failures.
pub trait ErrorSink: Send + Sync {
    fn record(&self, context: &str, error: &MoeaError);
}

/// Forwards failures to `tracing::error!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ErrorSink for TracingSink {
    fn record(&self, context: &str, error: &MoeaError) {
        tracing::error!(context, %error, "algorithm resolution failed");
    }
}

type Factory = Box<dyn Fn() -> Box<dyn Strategy> + Send + Sync>;

struct Entry {
    category: Category,
    name: String,
    factory: Factory,
}

/// Ordered `(category, name) → strategy factory` table.
pub struct AlgorithmRegistry {
    entries: Vec<Entry>,
    sink: Arc<dyn ErrorSink>,
}

impl Default for AlgorithmRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for AlgorithmRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlgorithmRegistry")
            .field("entries", &self.available())
            .finish_non_exhaustive()
    }
}

impl AlgorithmRegistry {
    /// Empty registry reporting to [`TracingSink`].
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            sink: Arc::new(TracingSink),
        }
    }

    /// Registry holding the built-in strategies:
    /// `MultiObjective/NSGAII`, `MultiObjective/SSNSGAII`,
    /// `SingleObjective/gGA`, `SingleObjective/ssGA`.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        let builtins: [(Category, &str, fn() -> Box<dyn Strategy>); 4] = [
            (Category::MultiObjective, Nsga2::NAME, || Box::new(Nsga2)),
            (Category::MultiObjective, SteadyStateNsga2::NAME, || {
                Box::new(SteadyStateNsga2)
            }),
            (Category::SingleObjective, GenerationalGa::NAME, || {
                Box::new(GenerationalGa)
            }),
            (Category::SingleObjective, SteadyStateGa::NAME, || {
                Box::new(SteadyStateGa)
            }),
        ];
        for (category, name, factory) in builtins {
            registry.entries.push(Entry {
                category,
                name: name.to_string(),
                factory: Box::new(factory),
            });
        }
        registry
    }

    /// Replaces the error sink.
    pub fn with_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Adds a strategy factory under `category/name`.
    ///
    /// # Errors
    /// [`MoeaError::InvalidConfiguration`] if the pair is already registered.
    pub fn register<F>(&mut self, category: Category, name: &str, factory: F) -> Result<()>
    where
        F: Fn() -> Box<dyn Strategy> + Send + Sync + 'static,
    {
        if self.contains(category, name) {
            return Err(MoeaError::invalid_config(format!(
                "{category}/{name} is already registered"
            )));
        }
        self.entries.push(Entry {
            category,
            name: name.to_string(),
            factory: Box::new(factory),
        });
        Ok(())
    }

    /// Registered pairs in registration order.
    pub fn entries(&self) -> impl Iterator<Item = (Category, &str)> + '_ {
        self.entries.iter().map(|e| (e.category, e.name.as_str()))
    }

    pub fn contains(&self, category: Category, name: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.category == category && e.name == name)
    }

    /// Every registered pair rendered as `Category/Name`.
    pub fn available(&self) -> Vec<String> {
        self.entries()
            .map(|(category, name)| format!("{category}/{name}"))
            .collect()
    }

    /// Builds an [`Algorithm`] for `category/name` bound to `problem`.
    ///
    /// Nothing is constructed unless every check passes. Failures are also
    /// reported to the error sink.
    ///
    /// # Errors
    ///
    /// - [`MoeaError::UnknownAlgorithm`] for an unregistered pair (including an
    ///   unknown category), listing the valid options
    /// - any error of [`Algorithm::new`], e.g. [`MoeaError::IncompatibleProblem`]
    pub fn resolve(
        &self,
        category: &str,
        name: &str,
        problem: Arc<dyn Problem>,
        config: AlgorithmConfig,
    ) -> Result<Algorithm> {
        let result = self
            .lookup(category, name)
            .and_then(|entry| Algorithm::new((entry.factory)(), problem, config));
        if let Err(error) = &result {
            self.sink.record(&format!("resolve {category}/{name}"), error);
        }
        result
    }

    fn lookup(&self, category: &str, name: &str) -> Result<&Entry> {
        let parsed = category.parse::<Category>().ok();
        self.entries
            .iter()
            .find(|e| Some(e.category) == parsed && e.name == name)
            .ok_or_else(|| MoeaError::UnknownAlgorithm {
                category: category.to_string(),
                name: name.to_string(),
                available: self.available(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::AlgorithmState;
    use crate::problem::benchmarks::{Schaffer, Zdt};
    use crate::solution::Population;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        records: Mutex<Vec<String>>,
    }

    impl ErrorSink for RecordingSink {
        fn record(&self, context: &str, error: &MoeaError) {
            if let Ok(mut records) = self.records.lock() {
                records.push(format!("{context}: {error}"));
            }
        }
    }

    #[derive(Debug)]
    struct KeepParents;

    impl Strategy for KeepParents {
        fn name(&self) -> &'static str {
            "KeepParents"
        }
        fn next_generation(&self, current: Population, _: Population, _: usize) -> Population {
            current
        }
    }

    fn config() -> AlgorithmConfig {
        AlgorithmConfig::default()
            .with_population_size(10)
            .with_max_generations(5)
            .with_seed(1)
    }

    #[test]
    fn test_builtin_entries_in_order() {
        let registry = AlgorithmRegistry::builtin();
        let entries: Vec<(Category, &str)> = registry.entries().collect();
        assert_eq!(
            entries,
            vec![
                (Category::MultiObjective, "NSGAII"),
                (Category::MultiObjective, "SSNSGAII"),
                (Category::SingleObjective, "gGA"),
                (Category::SingleObjective, "ssGA"),
            ]
        );
    }

    #[test]
    fn test_resolve_binds_problem() {
        let registry = AlgorithmRegistry::builtin();
        let problem: Arc<dyn Problem> = Arc::new(Zdt::zdt3(5).unwrap());
        let algorithm = registry
            .resolve("MultiObjective", "SSNSGAII", Arc::clone(&problem), config())
            .unwrap();
        assert!(Arc::ptr_eq(algorithm.problem(), &problem));
        assert_eq!(algorithm.strategy_name(), "SSNSGAII");
        assert_eq!(algorithm.state(), AlgorithmState::Uninitialized);
    }

    #[test]
    fn test_unknown_algorithm_reported() {
        let sink = Arc::new(RecordingSink::default());
        let registry = AlgorithmRegistry::builtin().with_sink(sink.clone());

        let err = registry
            .resolve("MultiObjective", "DoesNotExist", Arc::new(Schaffer::default()), config())
            .unwrap_err();
        match &err {
            MoeaError::UnknownAlgorithm {
                category,
                name,
                available,
            } => {
                assert_eq!(category, "MultiObjective");
                assert_eq!(name, "DoesNotExist");
                assert_eq!(available.len(), 4);
                assert!(available.contains(&"MultiObjective/NSGAII".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }

        let records = sink.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].starts_with("resolve MultiObjective/DoesNotExist"));
    }

    #[test]
    fn test_category_is_case_sensitive() {
        let registry = AlgorithmRegistry::builtin();
        for (category, name) in [
            ("multiobjective", "NSGAII"),
            ("Swarm", "NSGAII"),
            ("SingleObjective", "NSGAII"),
        ] {
            assert!(matches!(
                registry.resolve(category, name, Arc::new(Schaffer::default()), config()),
                Err(MoeaError::UnknownAlgorithm { .. })
            ));
        }
    }

    #[test]
    fn test_incompatible_problem_rejected() {
        let registry = AlgorithmRegistry::builtin();
        let err = registry
            .resolve("SingleObjective", "gGA", Arc::new(Schaffer::default()), config())
            .unwrap_err();
        assert!(matches!(err, MoeaError::IncompatibleProblem { .. }));
    }

    #[test]
    fn test_register_custom() {
        let mut registry = AlgorithmRegistry::new();
        assert_eq!(registry.entries().count(), 0);
        registry
            .register(Category::MultiObjective, "KeepParents", || Box::new(KeepParents))
            .unwrap();
        assert!(registry
            .register(Category::MultiObjective, "KeepParents", || Box::new(KeepParents))
            .is_err());
        assert!(registry.contains(Category::MultiObjective, "KeepParents"));

        let mut algorithm = registry
            .resolve("MultiObjective", "KeepParents", Arc::new(Schaffer::default()), config())
            .unwrap();
        let result = algorithm.run().unwrap();
        assert_eq!(result.generations, 5);
        assert_eq!(result.population.len(), 10);
    }

    #[test]
    fn test_category_round_trip() {
        for c in [Category::MultiObjective, Category::SingleObjective] {
            assert_eq!(c.as_str().parse::<Category>(), Ok(c));
        }
        assert_eq!(
            "multiobjective".parse::<Category>(),
            Err(ParseCategoryError("multiobjective".into()))
        );
        let err = "Pareto".parse::<Category>().unwrap_err();
        assert!(err.to_string().contains("\"Pareto\""));
    }
}
