//! Generational state machine shared by every strategy.
//!
//! An [`Algorithm`] binds a [`Strategy`] to a [`Problem`](crate::problem::Problem)
//! and moves through `Uninitialized → Initialized → Running → Terminated`.
//! Each generation selects parents, recombines and mutates them, evaluates
//! the offspring (in parallel with rayon when enabled) and lets the strategy
//! assemble the next population of fixed size.
//!
//! # Reproducibility
//!
//! All random numbers come from one seeded generator consumed sequentially
//! by selection and variation. Only evaluation runs in parallel, and it
//! draws no random numbers, so a fixed seed gives the same populations with
//! or without the `parallel` feature.
//!
//! # Built-in strategies
//!
//! | Strategy | Offspring per generation | Replacement |
//! |----------|--------------------------|-------------|
//! | [`Nsga2`] | population size | non-dominated sort + crowding |
//! | [`SteadyStateNsga2`] | 1 | non-dominated sort + crowding |
//! | [`GenerationalGa`] | population size | best of parents + offspring |
//! | [`SteadyStateGa`] | 1 | offspring replaces the worst if better |

mod config;
mod runner;
mod strategies;
mod types;

pub use config::{AlgorithmConfig, Termination};
pub use runner::Algorithm;
pub use strategies::{GenerationalGa, Nsga2, SteadyStateGa, SteadyStateNsga2};
pub use types::{AlgorithmState, GenerationStats, RunResult, StopReason, Strategy};
