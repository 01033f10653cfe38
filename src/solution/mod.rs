//! Solution and population data model.
//!
//! - [`Solution`]: decision vector, last evaluation and ranking metadata
//! - [`Population`]: ordered collection of solutions with deep-copy semantics
//! - [`dominance`]: constrained Pareto dominance, non-dominated sorting and
//!   crowding distance (NSGA-II utilities)

pub mod dominance;
mod population;
mod types;

pub use dominance::{
    assign_ranking, constrained_dominance, crowded_comparison, crowding_distance,
    non_dominated_sort, non_dominated_sort_objectives, pareto_dominance, Dominance,
    NondominatedSortResult,
};
pub use population::Population;
pub use types::Solution;
