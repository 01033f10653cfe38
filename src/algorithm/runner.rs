//! Generational loop execution.
//!
//! [`Algorithm`] drives the shared state machine:
//! initialization → selection → crossover → mutation → evaluation →
//! replacement → termination check → repeat.

use super::config::AlgorithmConfig;
use super::types::{AlgorithmState, GenerationStats, RunResult, Strategy, StopReason};
use crate::error::{MoeaError, Result};
use crate::operators::{Crossover, Mutation, Selection};
use crate::problem::{validate_problem, Problem};
use crate::solution::{assign_ranking, Population, Solution};
use rand::rngs::StdRng;
use rand::SeedableRng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// A strategy bound to a problem, with its operators built and validated.
///
/// # Usage
///
/// ```
/// use std::sync::Arc;
/// use u_moea::algorithm::{Algorithm, AlgorithmConfig, Nsga2};
/// use u_moea::problem::benchmarks::Schaffer;
///
/// let config = AlgorithmConfig::default()
///     .with_population_size(20)
///     .with_max_generations(10)
///     .with_seed(42);
/// let mut algorithm =
///     Algorithm::new(Box::new(Nsga2), Arc::new(Schaffer::default()), config).unwrap();
/// let result = algorithm.run().unwrap();
/// assert_eq!(result.generations, 10);
/// assert!(!result.front.is_empty());
/// ```
#[derive(Debug)]
pub struct Algorithm {
    strategy: Box<dyn Strategy>,
    problem: Arc<dyn Problem>,
    config: AlgorithmConfig,
    selection: Box<dyn Selection>,
    crossover: Box<dyn Crossover>,
    mutation: Box<dyn Mutation>,
    rng: StdRng,
    state: AlgorithmState,
    population: Population,
    generation: usize,
    evaluations: usize,
    history: Vec<GenerationStats>,
    progress: Progress,
    stagnation: usize,
    started: Option<Instant>,
    stop_reason: Option<StopReason>,
    cancel: Option<Arc<AtomicBool>>,
}

/// Best values seen so far, for stagnation detection.
#[derive(Debug, Clone)]
struct Progress {
    ideal: Option<Vec<f64>>,
    min_violation: f64,
}

impl Algorithm {
    /// Binds `strategy` to `problem` and builds the configured operators.
    ///
    /// Nothing is sampled or evaluated yet.
    ///
    /// # Errors
    ///
    /// - [`MoeaError::InvalidConfiguration`] for a bad problem shape or loop parameter
    /// - [`MoeaError::InvalidOperatorConfiguration`] for a bad operator parameter
    /// - [`MoeaError::IncompatibleProblem`] when the strategy rejects the problem
    pub fn new(
        strategy: Box<dyn Strategy>,
        problem: Arc<dyn Problem>,
        config: AlgorithmConfig,
    ) -> Result<Self> {
        validate_problem(problem.as_ref())?;
        config.validate()?;
        strategy.check_problem(problem.as_ref())?;

        let selection = config.selection.build()?;
        let crossover = config.crossover.build()?;
        let mutation = config.mutation.build(problem.num_variables())?;
        let rng = StdRng::seed_from_u64(config.seed.unwrap_or_else(rand::random));

        Ok(Self {
            strategy,
            problem,
            config,
            selection,
            crossover,
            mutation,
            rng,
            state: AlgorithmState::Uninitialized,
            population: Population::new(),
            generation: 0,
            evaluations: 0,
            history: Vec::new(),
            progress: Progress::default(),
            stagnation: 0,
            started: None,
            stop_reason: None,
            cancel: None,
        })
    }

    /// Attaches a cancellation flag, checked after every generation.
    pub fn with_cancel_token(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn state(&self) -> AlgorithmState {
        self.state
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// The problem this algorithm is bound to.
    pub fn problem(&self) -> &Arc<dyn Problem> {
        &self.problem
    }

    pub fn config(&self) -> &AlgorithmConfig {
        &self.config
    }

    /// Current population, ranked. Empty before initialization.
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Completed generations.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Problem evaluations so far.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    /// Samples and evaluates the initial population.
    pub fn initialize(&mut self) -> Result<()> {
        self.initialize_with(&[])
    }

    /// Like [`initialize`](Self::initialize), with the first members taken
    /// from `seeds`. Seeds are repaired into the bounds; the rest is sampled.
    ///
    /// # Errors
    ///
    /// - [`MoeaError::AlreadyTerminated`] after the run finished
    /// - [`MoeaError::InvalidConfiguration`] if already initialized or given
    ///   more seeds than the population size
    /// - [`MoeaError::DimensionMismatch`] for a seed of the wrong length
    /// - [`MoeaError::ProblemEvaluationFailed`]; the run is then terminated
    pub fn initialize_with(&mut self, seeds: &[Vec<f64>]) -> Result<()> {
        match self.state {
            AlgorithmState::Uninitialized => {}
            AlgorithmState::Terminated => return Err(MoeaError::AlreadyTerminated),
            AlgorithmState::Initialized | AlgorithmState::Running => {
                return Err(MoeaError::invalid_config("algorithm is already initialized"))
            }
        }
        let size = self.config.population_size;
        if seeds.len() > size {
            return Err(MoeaError::invalid_config(format!(
                "{} seeds exceed population_size {size}",
                seeds.len()
            )));
        }

        let problem = Arc::clone(&self.problem);
        let bounds = problem.bounds();
        let mut population = Population::with_capacity(size);
        for seed in seeds {
            if seed.len() != bounds.len() {
                return Err(MoeaError::dimension_mismatch(bounds.len(), seed.len()));
            }
            let repaired = seed.iter().zip(bounds).map(|(&v, b)| b.repair(v)).collect();
            population.push(Solution::new(repaired));
        }
        while population.len() < size {
            population.push(self.strategy.sample(bounds, &mut self.rng));
        }

        self.started = Some(Instant::now());
        let evaluated = match evaluate_stale(problem.as_ref(), &mut population, self.config.parallel)
        {
            Ok(n) => n,
            Err(e) => return Err(self.abort(e, StopReason::EvaluationFailed)),
        };
        assign_ranking(&mut population);

        self.population = population;
        self.evaluations = evaluated;
        self.state = AlgorithmState::Initialized;
        tracing::debug!(
            strategy = self.strategy.name(),
            problem = problem.name(),
            population = size,
            seeded = seeds.len(),
            "initialized"
        );
        self.record_generation();
        self.check_termination();
        Ok(())
    }

    /// Advances the state machine by one transition and returns the new
    /// state.
    ///
    /// From `Uninitialized` this initializes; otherwise it runs one
    /// generation. Termination is checked after every transition.
    ///
    /// # Errors
    ///
    /// - [`MoeaError::AlreadyTerminated`] when called in the terminal state
    /// - [`MoeaError::ProblemEvaluationFailed`]; the partially built generation
    ///   is discarded and the run is terminated
    /// - [`MoeaError::DimensionMismatch`] from a misbehaving problem
    pub fn step(&mut self) -> Result<AlgorithmState> {
        match self.state {
            AlgorithmState::Terminated => return Err(MoeaError::AlreadyTerminated),
            AlgorithmState::Uninitialized => self.initialize()?,
            AlgorithmState::Initialized | AlgorithmState::Running => self.evolve()?,
        }
        Ok(self.state)
    }

    /// Runs until termination.
    ///
    /// # Errors
    /// See [`step`](Self::step).
    pub fn run(&mut self) -> Result<RunResult> {
        if self.state == AlgorithmState::Terminated {
            return Err(MoeaError::AlreadyTerminated);
        }
        while self.state != AlgorithmState::Terminated {
            self.step()?;
        }
        self.result().ok_or(MoeaError::AlreadyTerminated)
    }

    /// Runs until termination or until `cancel` is set.
    ///
    /// Cancellation takes effect after the current generation's replacement,
    /// never in the middle of a generation.
    pub fn run_with_cancel(&mut self, cancel: Arc<AtomicBool>) -> Result<RunResult> {
        self.cancel = Some(cancel);
        self.run()
    }

    /// The final result, once terminated by a stopping condition.
    pub fn result(&self) -> Option<RunResult> {
        if self.state != AlgorithmState::Terminated {
            return None;
        }
        let stop_reason = self.stop_reason?;
        Some(RunResult {
            population: self.population.clone(),
            front: self.population.non_dominated(),
            generations: self.generation,
            evaluations: self.evaluations,
            stop_reason,
            history: self.history.clone(),
        })
    }

    fn evolve(&mut self) -> Result<()> {
        let problem = Arc::clone(&self.problem);
        let bounds = problem.bounds();
        let count = self.strategy.offspring_count(self.config.population_size);

        let mut offspring = Population::with_capacity(count + 1);
        while offspring.len() < count {
            let parent1 = self.selection.select(&self.population, &mut self.rng);
            let parent2 = self.selection.select(&self.population, &mut self.rng);
            let (mut child1, mut child2) =
                self.crossover
                    .cross(parent1, parent2, bounds, &mut self.rng)?;
            self.mutation.mutate(&mut child1, bounds, &mut self.rng)?;
            offspring.push(child1);
            if offspring.len() < count {
                self.mutation.mutate(&mut child2, bounds, &mut self.rng)?;
                offspring.push(child2);
            }
        }

        // copies that escaped variation keep their evaluation
        let evaluated = match evaluate_stale(problem.as_ref(), &mut offspring, self.config.parallel)
        {
            Ok(n) => n,
            Err(e) => return Err(self.abort(e, StopReason::EvaluationFailed)),
        };

        let size = self.config.population_size;
        let mut next = self
            .strategy
            .next_generation(self.population.clone(), offspring, size);
        if next.len() != size {
            let error = MoeaError::InvalidReplacement {
                strategy: self.strategy.name().to_string(),
                expected: size,
                actual: next.len(),
            };
            return Err(self.abort(error, StopReason::StrategyFailed));
        }
        assign_ranking(&mut next);

        self.population = next;
        self.generation += 1;
        self.evaluations += evaluated;
        self.state = AlgorithmState::Running;
        self.record_generation();
        self.check_termination();
        Ok(())
    }

    fn abort(&mut self, error: MoeaError, reason: StopReason) -> MoeaError {
        tracing::error!(
            strategy = self.strategy.name(),
            generation = self.generation,
            %error,
            "run aborted"
        );
        self.state = AlgorithmState::Terminated;
        self.stop_reason = Some(reason);
        error
    }

    fn record_generation(&mut self) {
        let front: Vec<&Solution> = self.population.iter().filter(|s| s.rank() == 0).collect();
        let ideal = ideal_point(&front);

        let improved = match (&self.progress.ideal, &ideal) {
            (None, Some(_)) => true,
            (Some(old), Some(new)) => {
                ideal_improved(old, new, self.config.termination.convergence_threshold)
            }
            (_, None) => {
                let min_violation = self
                    .population
                    .iter()
                    .map(Solution::constraint_violation)
                    .fold(f64::INFINITY, f64::min);
                let better = min_violation < self.progress.min_violation;
                if better {
                    self.progress.min_violation = min_violation;
                }
                better
            }
        };
        if improved {
            self.stagnation = 0;
            if let Some(point) = &ideal {
                self.progress.ideal = Some(point.clone());
            }
        } else {
            self.stagnation += 1;
        }
        if self.generation == 0 {
            self.stagnation = 0;
        }

        tracing::debug!(
            generation = self.generation,
            evaluations = self.evaluations,
            front_size = front.len(),
            stagnation = self.stagnation,
            "generation complete"
        );
        self.history.push(GenerationStats {
            generation: self.generation,
            evaluations: self.evaluations,
            front_size: front.len(),
            ideal_point: ideal.unwrap_or_default(),
        });
    }

    fn check_termination(&mut self) {
        let termination = &self.config.termination;
        let reason = if self
            .cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
        {
            Some(StopReason::Cancelled)
        } else if termination
            .max_evaluations
            .is_some_and(|max| self.evaluations >= max)
        {
            Some(StopReason::MaxEvaluations)
        } else if self.generation >= termination.max_generations {
            Some(StopReason::MaxGenerations)
        } else if termination.stagnation_limit > 0
            && self.stagnation >= termination.stagnation_limit
        {
            Some(StopReason::Stagnation)
        } else if let (Some(limit), Some(started)) = (self.config.time_limit_ms, self.started) {
            (started.elapsed().as_millis() >= u128::from(limit)).then_some(StopReason::TimeLimit)
        } else {
            None
        };

        let Some(reason) = reason else { return };
        if reason == StopReason::Cancelled {
            tracing::warn!(generation = self.generation, "run cancelled");
        }
        tracing::info!(
            strategy = self.strategy.name(),
            generations = self.generation,
            evaluations = self.evaluations,
            reason = %reason,
            "run terminated"
        );
        self.state = AlgorithmState::Terminated;
        self.stop_reason = Some(reason);
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            ideal: None,
            min_violation: f64::INFINITY,
        }
    }
}

/// Per-objective minimum over the feasible members of `front`.
fn ideal_point(front: &[&Solution]) -> Option<Vec<f64>> {
    let mut feasible = front.iter().filter(|s| s.is_feasible());
    let first = feasible.next()?;
    let mut ideal = first.objectives().to_vec();
    for s in feasible {
        for (best, &v) in ideal.iter_mut().zip(s.objectives()) {
            if v < *best {
                *best = v;
            }
        }
    }
    Some(ideal)
}

fn ideal_improved(old: &[f64], new: &[f64], threshold: f64) -> bool {
    old.iter().zip(new).any(|(&o, &n)| {
        let scale = if o.abs() > 0.0 { o.abs() } else { 1.0 };
        n < o && (o - n) / scale > threshold
    })
}

/// Evaluates every member without a current evaluation.
///
/// Returns the number of evaluations performed. On failure the first error
/// in population order is returned, whatever the completion order.
fn evaluate_stale(problem: &dyn Problem, solutions: &mut [Solution], parallel: bool) -> Result<usize> {
    if parallel {
        return evaluate_stale_parallel(problem, solutions);
    }
    let mut count = 0;
    for s in solutions.iter_mut().filter(|s| !s.is_evaluated()) {
        s.evaluate(problem)?;
        count += 1;
    }
    Ok(count)
}

#[cfg(feature = "parallel")]
fn evaluate_stale_parallel(problem: &dyn Problem, solutions: &mut [Solution]) -> Result<usize> {
    let outcomes: Vec<Result<bool>> = solutions
        .par_iter_mut()
        .map(|s| {
            if s.is_evaluated() {
                Ok(false)
            } else {
                s.evaluate(problem).map(|()| true)
            }
        })
        .collect();
    outcomes
        .into_iter()
        .try_fold(0, |count, outcome| Ok(count + usize::from(outcome?)))
}

#[cfg(not(feature = "parallel"))]
fn evaluate_stale_parallel(problem: &dyn Problem, solutions: &mut [Solution]) -> Result<usize> {
    evaluate_stale(problem, solutions, false)
}

// ============================================================================
// Tests
// ============================================================================
