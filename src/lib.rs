//! Domain-agnostic multi-objective evolutionary optimization framework.
//!
//! Provides the building blocks of population-based multi-objective search:
//!
//! - **Problem**: the integration point; declares variable bounds, objective
//!   and constraint counts, and evaluates decision vectors.
//! - **Solution / Population**: candidate solutions with their objective
//!   vectors, constraint violation and ranking metadata; Pareto and
//!   constrained dominance, fast non-dominated sorting, crowding distance.
//! - **Operators**: selection, crossover and mutation as separate capability
//!   traits, each built once from a validated configuration.
//! - **Algorithm**: one generational state machine
//!   (`Uninitialized → Initialized → Running → Terminated`) with pluggable
//!   replacement strategies (NSGA-II, steady-state NSGA-II, generational and
//!   steady-state GA).
//! - **Registry**: resolves a strategy from a `(category, name)` pair chosen
//!   at configuration time.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use u_moea::algorithm::AlgorithmConfig;
//! use u_moea::problem::benchmarks::Fonseca;
//! use u_moea::AlgorithmRegistry;
//!
//! let config = AlgorithmConfig::default()
//!     .with_population_size(40)
//!     .with_max_generations(50)
//!     .with_seed(42);
//! let mut algorithm = AlgorithmRegistry::builtin()
//!     .resolve("MultiObjective", "NSGAII", Arc::new(Fonseca::default()), config)
//!     .unwrap();
//!
//! let result = algorithm.run().unwrap();
//! for (variables, objectives) in result.front.to_pairs() {
//!     assert_eq!(variables.len(), 3);
//!     assert_eq!(objectives.len(), 2);
//! }
//! ```
//!
//! # Architecture
//!
//! The crate contains no domain concepts. Routing, scheduling or any other
//! application defines its own [`Problem`](problem::Problem) and consumes
//! the returned decision/objective pairs.

pub mod algorithm;
pub mod error;
pub mod indicators;
pub mod operators;
pub mod problem;
pub mod registry;
pub mod solution;

pub use error::{EvaluationFailure, MoeaError, Result};
pub use registry::{AlgorithmRegistry, Category, ErrorSink, ParseCategoryError, TracingSink};
