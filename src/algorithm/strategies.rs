//! Built-in replacement strategies.
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic
//!   Algorithm: NSGA-II"
//! - Durillo, Nebro, Luna & Alba (2009), "On the Effect of the Steady-State
//!   Selection Scheme in Multi-Objective Genetic Algorithms"

use super::types::Strategy;
use crate::error::{MoeaError, Result};
use crate::problem::Problem;
use crate::solution::{crowding_distance, non_dominated_sort, Population, Solution};
use std::cmp::Ordering;

/// Generational NSGA-II.
///
/// Parents and offspring are merged, sorted into fronts by constrained
/// dominance, and whole fronts are kept in order; the front that does not
/// fit is cut by descending crowding distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct Nsga2;

impl Nsga2 {
    pub const NAME: &'static str = "NSGAII";
}

impl Strategy for Nsga2 {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn next_generation(
        &self,
        current: Population,
        offspring: Population,
        size: usize,
    ) -> Population {
        crowded_truncation(current.union(offspring), size)
    }
}

/// Steady-state NSGA-II: one offspring per step, NSGA-II replacement.
#[derive(Debug, Clone, Copy, Default)]
pub struct SteadyStateNsga2;

impl SteadyStateNsga2 {
    pub const NAME: &'static str = "SSNSGAII";
}

impl Strategy for SteadyStateNsga2 {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn offspring_count(&self, _population_size: usize) -> usize {
        1
    }

    fn next_generation(
        &self,
        current: Population,
        offspring: Population,
        size: usize,
    ) -> Population {
        crowded_truncation(current.union(offspring), size)
    }
}

/// Generational elitist GA on a single objective: the best `size` of
/// parents plus offspring survive.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerationalGa;

impl GenerationalGa {
    pub const NAME: &'static str = "gGA";
}

impl Strategy for GenerationalGa {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn check_problem(&self, problem: &dyn Problem) -> Result<()> {
        require_single_objective(Self::NAME, problem)
    }

    fn next_generation(
        &self,
        current: Population,
        offspring: Population,
        size: usize,
    ) -> Population {
        let mut all = current.union(offspring).into_vec();
        // stable: ties keep parents ahead of offspring
        all.sort_by(scalar_comparison);
        all.truncate(size);
        all.into()
    }
}

/// Steady-state GA on a single objective: each offspring replaces the
/// worst member if it is strictly better.
#[derive(Debug, Clone, Copy, Default)]
pub struct SteadyStateGa;

impl SteadyStateGa {
    pub const NAME: &'static str = "ssGA";
}

impl Strategy for SteadyStateGa {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn check_problem(&self, problem: &dyn Problem) -> Result<()> {
        require_single_objective(Self::NAME, problem)
    }

    fn offspring_count(&self, _population_size: usize) -> usize {
        1
    }

    fn next_generation(
        &self,
        mut current: Population,
        offspring: Population,
        size: usize,
    ) -> Population {
        for child in offspring {
            if current.len() < size {
                current.push(child);
                continue;
            }
            // last of the equally bad members
            let worst = current
                .iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| scalar_comparison(a, b))
                .map(|(i, _)| i);
            if let Some(w) = worst {
                if scalar_comparison(&child, &current[w]) == Ordering::Less {
                    current[w] = child;
                }
            }
        }
        current.truncate(size);
        current
    }
}

fn require_single_objective(algorithm: &str, problem: &dyn Problem) -> Result<()> {
    if problem.num_objectives() != 1 {
        return Err(MoeaError::IncompatibleProblem {
            algorithm: algorithm.to_string(),
            reason: format!(
                "requires exactly 1 objective, but {} declares {}",
                problem.name(),
                problem.num_objectives()
            ),
        });
    }
    Ok(())
}

/// Feasibility first, then smaller violation, then the first objective.
fn scalar_comparison(a: &Solution, b: &Solution) -> Ordering {
    a.constraint_violation()
        .partial_cmp(&b.constraint_violation())
        .unwrap_or(Ordering::Equal)
        .then_with(|| {
            a.objectives()[0]
                .partial_cmp(&b.objectives()[0])
                .unwrap_or(Ordering::Equal)
        })
}

/// Keeps whole fronts in rank order and cuts the first front that does not
/// fit by descending crowding distance. Ties keep the union order.
fn crowded_truncation(union: Population, size: usize) -> Population {
    let sorted = non_dominated_sort(&union);
    let mut keep: Vec<usize> = Vec::with_capacity(size);

    for front in &sorted.fronts {
        let remain = size - keep.len();
        if remain == 0 {
            break;
        }
        if front.len() <= remain {
            keep.extend_from_slice(front);
            continue;
        }

        let objectives: Vec<&[f64]> = front.iter().map(|&i| union[i].objectives()).collect();
        let distances = crowding_distance(&objectives);
        let mut order: Vec<usize> = (0..front.len()).collect();
        order.sort_by(|&a, &b| {
            distances[b]
                .partial_cmp(&distances[a])
                .unwrap_or(Ordering::Equal)
        });
        keep.extend(order.into_iter().take(remain).map(|k| front[k]));
        break;
    }

    let mut slots: Vec<Option<Solution>> = union.into_iter().map(Some).collect();
    keep.into_iter().filter_map(|i| slots[i].take()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::benchmarks::{Schaffer, Zdt};
    use crate::problem::Evaluation;

    fn evaluated(id: f64, objectives: &[f64]) -> Solution {
        let mut s = Solution::new(vec![id]);
        s.apply(Evaluation::new(objectives.to_vec()));
        s
    }

    fn infeasible(id: f64, objectives: &[f64], violation: f64) -> Solution {
        let mut s = Solution::new(vec![id]);
        s.apply(Evaluation::with_constraints(objectives.to_vec(), vec![-violation]));
        s
    }

    fn ids(pop: &Population) -> Vec<f64> {
        pop.iter().map(|s| s.variables()[0]).collect()
    }

    #[test]
    fn test_nsga2_keeps_whole_fronts() {
        let current: Population = vec![
            evaluated(0.0, &[1.0, 4.0]),
            evaluated(1.0, &[4.0, 1.0]),
            evaluated(2.0, &[5.0, 5.0]),
        ]
        .into();
        let offspring: Population = vec![
            evaluated(3.0, &[2.0, 2.0]),
            evaluated(4.0, &[6.0, 6.0]),
            evaluated(5.0, &[3.0, 3.0]),
        ]
        .into();

        let next = Nsga2.next_generation(current, offspring, 4);
        // front 0 = {0, 1, 3}, front 1 = {5}
        assert_eq!(ids(&next), vec![0.0, 1.0, 3.0, 5.0]);
    }

    #[test]
    fn test_nsga2_cuts_last_front_by_crowding() {
        // one front of five; extremes 0 and 4 are infinitely crowded, 2 sits
        // in the widest gap
        let current: Population = vec![
            evaluated(0.0, &[0.0, 10.0]),
            evaluated(1.0, &[1.0, 9.0]),
            evaluated(2.0, &[5.0, 5.0]),
        ]
        .into();
        let offspring: Population = vec![
            evaluated(3.0, &[9.0, 1.0]),
            evaluated(4.0, &[10.0, 0.0]),
        ]
        .into();

        let next = Nsga2.next_generation(current, offspring, 3);
        assert_eq!(ids(&next), vec![0.0, 4.0, 2.0]);
    }

    #[test]
    fn test_nsga2_prefers_feasible() {
        let current: Population = vec![
            infeasible(0.0, &[0.0, 0.0], 1.0),
            evaluated(1.0, &[9.0, 9.0]),
        ]
        .into();
        let offspring: Population = vec![infeasible(2.0, &[0.0, 0.0], 0.5)].into();

        let next = Nsga2.next_generation(current, offspring, 2);
        assert_eq!(ids(&next), vec![1.0, 2.0]);
    }

    #[test]
    fn test_steady_state_offspring_count() {
        assert_eq!(SteadyStateNsga2.offspring_count(100), 1);
        assert_eq!(SteadyStateGa.offspring_count(100), 1);
        assert_eq!(Nsga2.offspring_count(100), 100);
    }

    #[test]
    fn test_generational_ga_elitist() {
        let current: Population = vec![evaluated(0.0, &[3.0]), evaluated(1.0, &[1.0])].into();
        let offspring: Population = vec![
            evaluated(2.0, &[2.0]),
            evaluated(3.0, &[5.0]),
            infeasible(4.0, &[0.0], 0.1),
        ]
        .into();
        let next = GenerationalGa.next_generation(current, offspring, 2);
        assert_eq!(ids(&next), vec![1.0, 2.0]);
    }

    #[test]
    fn test_steady_state_ga_replaces_worst() {
        let current: Population = vec![
            evaluated(0.0, &[3.0]),
            evaluated(1.0, &[7.0]),
            evaluated(2.0, &[1.0]),
        ]
        .into();
        let better: Population = vec![evaluated(3.0, &[4.0])].into();
        let next = SteadyStateGa.next_generation(current.clone(), better, 3);
        assert_eq!(ids(&next), vec![0.0, 3.0, 2.0]);

        let worse: Population = vec![evaluated(4.0, &[8.0])].into();
        let next = SteadyStateGa.next_generation(current, worse, 3);
        assert_eq!(ids(&next), vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_single_objective_check() {
        let zdt = Zdt::zdt2(4).unwrap();
        assert!(matches!(
            GenerationalGa.check_problem(&zdt),
            Err(MoeaError::IncompatibleProblem { .. })
        ));
        assert!(SteadyStateGa.check_problem(&Schaffer::default()).is_err());
        assert!(Nsga2.check_problem(&zdt).is_ok());
    }
}
