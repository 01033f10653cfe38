//! Pareto dominance, non-dominated sorting and crowding distance.
//!
//! All objectives are **minimized**. Constraint handling follows Deb's
//! feasibility rules: a feasible solution dominates an infeasible one, and
//! between two infeasible solutions the smaller overall violation wins.
//!
//! # Algorithms
//!
//! - [`non_dominated_sort`]: Fast non-dominated sorting (Deb et al., 2002)
//! - [`crowding_distance`]: Crowding distance assignment for diversity preservation
//! - [`assign_ranking`]: Both of the above written back into a [`Population`]
//!
//! Every function here is order-stable: ties keep population order, so
//! identical inputs always give identical ranks and survivors.
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"
//! - IEEE Transactions on Evolutionary Computation, 6(2), 182-197

use super::population::Population;
use super::types::Solution;
use std::cmp::Ordering;

/// Dominance comparison result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dominance {
    /// Left dominates right.
    Left,
    /// Right dominates left.
    Right,
    /// Neither dominates the other.
    Neither,
}

/// Compares two objective vectors for Pareto dominance.
pub fn pareto_dominance(a: &[f64], b: &[f64]) -> Dominance {
    debug_assert_eq!(a.len(), b.len(), "objective vectors must have equal length");

    let mut a_better_in_some = false;
    let mut b_better_in_some = false;

    for (&va, &vb) in a.iter().zip(b.iter()) {
        if va < vb {
            a_better_in_some = true;
        } else if vb < va {
            b_better_in_some = true;
        }
    }

    match (a_better_in_some, b_better_in_some) {
        (true, false) => Dominance::Left,
        (false, true) => Dominance::Right,
        _ => Dominance::Neither,
    }
}

/// Compares two evaluated solutions using constraint violation first,
/// then Pareto dominance.
pub fn constrained_dominance(a: &Solution, b: &Solution) -> Dominance {
    let va = a.constraint_violation();
    let vb = b.constraint_violation();
    if va != vb && (va > 0.0 || vb > 0.0) {
        return if va < vb {
            Dominance::Left
        } else {
            Dominance::Right
        };
    }
    pareto_dominance(a.objectives(), b.objectives())
}

/// Result of non-dominated sorting.
///
/// Each element of `ranks` corresponds to the Pareto rank of the solution
/// at the same index. Rank 0 is the Pareto front (non-dominated solutions).
#[derive(Debug, Clone)]
pub struct NondominatedSortResult {
    /// Pareto rank for each solution (0 = front).
    pub ranks: Vec<usize>,

    /// Indices grouped by front, ascending within each front.
    pub fronts: Vec<Vec<usize>>,
}

/// Fast non-dominated sorting over evaluated solutions.
///
/// Uses [`constrained_dominance`], so infeasible solutions sink below every
/// feasible one.
///
/// # Complexity
///
/// O(m * n²) where m = number of objectives, n = number of solutions
pub fn non_dominated_sort(solutions: &[Solution]) -> NondominatedSortResult {
    sort_fronts(solutions.len(), |i, j| {
        constrained_dominance(&solutions[i], &solutions[j])
    })
}

/// Fast non-dominated sorting over raw objective vectors (no constraints).
///
/// # Example
///
/// ```
/// use u_moea::solution::non_dominated_sort_objectives;
///
/// let objectives = vec![
///     vec![1.0, 5.0],  // Solution A
///     vec![3.0, 3.0],  // Solution B
///     vec![5.0, 1.0],  // Solution C
///     vec![4.0, 4.0],  // Solution D, dominated by B
/// ];
///
/// let result = non_dominated_sort_objectives(&objectives);
/// assert_eq!(result.ranks, vec![0, 0, 0, 1]);
/// ```
pub fn non_dominated_sort_objectives<T: AsRef<[f64]>>(objectives: &[T]) -> NondominatedSortResult {
    sort_fronts(objectives.len(), |i, j| {
        pareto_dominance(objectives[i].as_ref(), objectives[j].as_ref())
    })
}

fn sort_fronts<F>(n: usize, cmp: F) -> NondominatedSortResult
where
    F: Fn(usize, usize) -> Dominance,
{
    if n == 0 {
        return NondominatedSortResult {
            ranks: Vec::new(),
            fronts: Vec::new(),
        };
    }

    let mut domination_count = vec![0usize; n];
    let mut dominated_by: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut ranks = vec![0usize; n];
    let mut front_0 = Vec::new();

    for i in 0..n {
        for j in (i + 1)..n {
            match cmp(i, j) {
                Dominance::Left => {
                    dominated_by[i].push(j);
                    domination_count[j] += 1;
                }
                Dominance::Right => {
                    dominated_by[j].push(i);
                    domination_count[i] += 1;
                }
                Dominance::Neither => {}
            }
        }

        // every pair involving i has been compared by now
        if domination_count[i] == 0 {
            front_0.push(i);
        }
    }

    let mut fronts = vec![front_0];
    loop {
        let current = &fronts[fronts.len() - 1];
        let mut next_front = Vec::new();

        for &i in current {
            for &j in &dominated_by[i] {
                domination_count[j] -= 1;
                if domination_count[j] == 0 {
                    ranks[j] = fronts.len();
                    next_front.push(j);
                }
            }
        }

        if next_front.is_empty() {
            break;
        }
        next_front.sort_unstable();
        fronts.push(next_front);
    }

    NondominatedSortResult { ranks, fronts }
}

/// Crowding distance of each objective vector within one front.
///
/// Boundary solutions (min/max for any objective) receive `f64::INFINITY`.
/// Fronts of one or two members are all boundary.
///
/// # Complexity
///
/// O(m * n * log n) where m = number of objectives, n = number of solutions
pub fn crowding_distance<T: AsRef<[f64]>>(objectives: &[T]) -> Vec<f64> {
    let n = objectives.len();
    if n <= 2 {
        return vec![f64::INFINITY; n];
    }

    let m = objectives[0].as_ref().len();
    let mut distances = vec![0.0f64; n];

    for obj_idx in 0..m {
        let value = |i: usize| objectives[i].as_ref()[obj_idx];

        // stable sort keeps index order among equal values
        let mut indices: Vec<usize> = (0..n).collect();
        indices.sort_by(|&a, &b| value(a).partial_cmp(&value(b)).unwrap_or(Ordering::Equal));

        distances[indices[0]] = f64::INFINITY;
        distances[indices[n - 1]] = f64::INFINITY;

        let range = value(indices[n - 1]) - value(indices[0]);
        if range > 0.0 {
            for i in 1..(n - 1) {
                distances[indices[i]] += (value(indices[i + 1]) - value(indices[i - 1])) / range;
            }
        }
    }

    distances
}

/// Ranks `population` and writes rank and crowding distance into each member.
///
/// Returns the fronts as index lists.
pub fn assign_ranking(population: &mut Population) -> Vec<Vec<usize>> {
    let sorted = non_dominated_sort(&**population);

    for front in &sorted.fronts {
        let objectives: Vec<&[f64]> = front.iter().map(|&i| population[i].objectives()).collect();
        let distances = crowding_distance(&objectives);
        for (&i, d) in front.iter().zip(distances) {
            population[i].rank = sorted.ranks[i];
            population[i].crowding_distance = d;
        }
    }

    sorted.fronts
}

/// Crowded-comparison order: lower rank first, then larger crowding distance.
pub fn crowded_comparison(a: &Solution, b: &Solution) -> Ordering {
    a.rank().cmp(&b.rank()).then_with(|| {
        b.crowding_distance()
            .partial_cmp(&a.crowding_distance())
            .unwrap_or(Ordering::Equal)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Evaluation;
    use proptest::prelude::*;

    fn evaluated(objectives: &[f64]) -> Solution {
        let mut s = Solution::new(vec![0.0]);
        s.apply(Evaluation::new(objectives.to_vec()));
        s
    }

    // ---- Non-dominated sort ----

    #[test]
    fn test_single_solution() {
        let result = non_dominated_sort_objectives(&[vec![1.0, 2.0]]);
        assert_eq!(result.ranks, vec![0]);
        assert_eq!(result.fronts, vec![vec![0]]);
    }

    #[test]
    fn test_empty_input() {
        let empty: [Vec<f64>; 0] = [];
        let result = non_dominated_sort_objectives(&empty);
        assert!(result.ranks.is_empty());
        assert!(result.fronts.is_empty());
    }

    #[test]
    fn test_clear_dominance() {
        let objs = vec![vec![3.0, 3.0], vec![1.0, 1.0], vec![2.0, 2.0]];
        let result = non_dominated_sort_objectives(&objs);
        assert_eq!(result.ranks, vec![2, 0, 1]);
        assert_eq!(result.fronts, vec![vec![1], vec![2], vec![0]]);
    }

    #[test]
    fn test_mixed_fronts() {
        let objs = vec![
            vec![1.0, 5.0], // front 0
            vec![3.0, 3.0], // front 0
            vec![5.0, 1.0], // front 0
            vec![4.0, 4.0], // dominated by (3, 3)
            vec![6.0, 6.0], // dominated by (4, 4) as well
        ];
        let result = non_dominated_sort_objectives(&objs);
        assert_eq!(result.ranks, vec![0, 0, 0, 1, 2]);
    }

    #[test]
    fn test_all_equal() {
        let objs = vec![vec![2.0, 2.0]; 3];
        let result = non_dominated_sort_objectives(&objs);
        assert!(result.ranks.iter().all(|&r| r == 0));
    }

    #[test]
    fn test_infeasible_ranked_last() {
        let mut infeasible = Solution::new(vec![0.0]);
        infeasible.apply(Evaluation::with_constraints(vec![0.0, 0.0], vec![-0.1]));
        let mut worse_infeasible = Solution::new(vec![0.0]);
        worse_infeasible.apply(Evaluation::with_constraints(vec![0.0, 0.0], vec![-2.0]));
        let mut feasible = Solution::new(vec![0.0]);
        feasible.apply(Evaluation::with_constraints(vec![10.0, 10.0], vec![1.0]));

        let result = non_dominated_sort(&[worse_infeasible, infeasible, feasible]);
        assert_eq!(result.ranks, vec![2, 1, 0]);
    }

    // ---- Crowding distance ----

    #[test]
    fn test_crowding_small_fronts() {
        assert!(crowding_distance(&[vec![1.0, 2.0]])[0].is_infinite());
        let dist = crowding_distance(&[vec![1.0, 3.0], vec![3.0, 1.0]]);
        assert!(dist.iter().all(|d| d.is_infinite()));
    }

    #[test]
    fn test_crowding_evenly_spaced() {
        let objs = vec![
            vec![0.0, 4.0],
            vec![1.0, 3.0],
            vec![2.0, 2.0],
            vec![3.0, 1.0],
            vec![4.0, 0.0],
        ];
        let dist = crowding_distance(&objs);

        assert!(dist[0].is_infinite());
        assert!(dist[4].is_infinite());
        for d in &dist[1..4] {
            assert!((d - 1.0).abs() < 1e-10, "expected 1.0, got {d}");
        }
    }

    #[test]
    fn test_crowding_zero_range_objective() {
        let objs = vec![vec![1.0, 5.0], vec![2.0, 5.0], vec![3.0, 5.0]];
        let dist = crowding_distance(&objs);
        assert!(dist[1].is_finite());
    }

    // ---- Ranking written into a population ----

    #[test]
    fn test_assign_ranking() {
        let mut pop: Population = vec![
            evaluated(&[1.0, 5.0]),
            evaluated(&[3.0, 3.0]),
            evaluated(&[5.0, 1.0]),
            evaluated(&[4.0, 4.0]),
        ]
        .into();

        let fronts = assign_ranking(&mut pop);
        assert_eq!(fronts, vec![vec![0, 1, 2], vec![3]]);
        assert_eq!(pop[3].rank(), 1);
        assert!(pop[0].crowding_distance().is_infinite());
        assert!(pop[1].crowding_distance().is_finite());

        let mut order: Vec<usize> = (0..pop.len()).collect();
        order.sort_by(|&a, &b| crowded_comparison(&pop[a], &pop[b]));
        assert_eq!(order, vec![0, 2, 1, 3]);
    }

    proptest! {
        #[test]
        fn prop_front_zero_is_mutually_non_dominated(
            objs in prop::collection::vec(prop::collection::vec(-10.0f64..10.0, 2), 1..40)
        ) {
            let result = non_dominated_sort_objectives(&objs);
            for &i in &result.fronts[0] {
                for (j, other) in objs.iter().enumerate() {
                    prop_assert!(
                        i == j || pareto_dominance(other, &objs[i]) != Dominance::Left
                    );
                }
            }
            let total: usize = result.fronts.iter().map(Vec::len).sum();
            prop_assert_eq!(total, objs.len());
        }
    }
}
