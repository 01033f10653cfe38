//! Real-coded crossover operators.
//!
//! # References
//!
//! - Deb & Agrawal (1995), "Simulated Binary Crossover for Continuous Search Space"
//! - Eshelman & Schaffer (1993), "Real-Coded Genetic Algorithms and
//!   Interval-Schemata" (BLX-α)

use super::{check_dimensions, check_non_negative, check_probability, Crossover};
use crate::error::Result;
use crate::problem::VariableBounds;
use crate::solution::Solution;
use rand::{Rng, RngCore};

const EPS: f64 = 1.0e-14;

fn check_parents(p1: &Solution, p2: &Solution, bounds: &[VariableBounds]) -> Result<()> {
    check_dimensions(p1, bounds)?;
    check_dimensions(p2, bounds)
}

/// Simulated Binary Crossover (SBX).
///
/// Each gene pair is recombined with probability 0.5. Children that fall
/// outside the variable bounds are clamped to them.
#[derive(Debug, Clone, PartialEq)]
pub struct SbxCrossover {
    probability: f64,
    distribution_index: f64,
}

impl SbxCrossover {
    pub const NAME: &'static str = "SBXCrossover";

    /// # Errors
    /// `probability` outside `[0, 1]` or a negative/non-finite `distribution_index`.
    pub fn new(probability: f64, distribution_index: f64) -> Result<Self> {
        Ok(Self {
            probability: check_probability(Self::NAME, "probability", probability)?,
            distribution_index: check_non_negative(
                Self::NAME,
                "distributionIndex",
                distribution_index,
            )?,
        })
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn distribution_index(&self) -> f64 {
        self.distribution_index
    }

    fn spread(&self, beta: f64, u: f64) -> f64 {
        let eta = self.distribution_index + 1.0;
        let alpha = 2.0 - beta.powf(-eta);
        if u <= 1.0 / alpha {
            (u * alpha).powf(1.0 / eta)
        } else {
            (1.0 / (2.0 - u * alpha)).powf(1.0 / eta)
        }
    }
}

impl Crossover for SbxCrossover {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn cross(
        &self,
        parent1: &Solution,
        parent2: &Solution,
        bounds: &[VariableBounds],
        rng: &mut dyn RngCore,
    ) -> Result<(Solution, Solution)> {
        check_parents(parent1, parent2, bounds)?;

        let mut child1 = parent1.clone();
        let mut child2 = parent2.clone();
        if rng.random::<f64>() >= self.probability {
            return Ok((child1, child2));
        }

        let x1 = parent1.variables();
        let x2 = parent2.variables();
        let c1 = child1.variables_mut();
        let c2 = child2.variables_mut();

        for (i, b) in bounds.iter().enumerate() {
            if rng.random::<f64>() > 0.5 || (x1[i] - x2[i]).abs() <= EPS || b.width() <= 0.0 {
                continue;
            }

            let y1 = x1[i].min(x2[i]);
            let y2 = x1[i].max(x2[i]);
            let u = rng.random::<f64>();

            let beta_low = 1.0 + 2.0 * (y1 - b.lower) / (y2 - y1);
            let low = 0.5 * ((y1 + y2) - self.spread(beta_low, u) * (y2 - y1));

            let beta_high = 1.0 + 2.0 * (b.upper - y2) / (y2 - y1);
            let high = 0.5 * ((y1 + y2) + self.spread(beta_high, u) * (y2 - y1));

            let (a, z) = if rng.random::<f64>() <= 0.5 {
                (high, low)
            } else {
                (low, high)
            };
            c1[i] = b.repair(a);
            c2[i] = b.repair(z);
        }

        Ok((child1, child2))
    }
}

/// Blend crossover (BLX-α).
///
/// Each child gene is drawn uniformly from the parents' interval extended by
/// `alpha` times its width on both sides, then clamped to the bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct BlxAlphaCrossover {
    probability: f64,
    alpha: f64,
}

impl BlxAlphaCrossover {
    pub const NAME: &'static str = "BLXAlphaCrossover";

    pub fn new(probability: f64, alpha: f64) -> Result<Self> {
        Ok(Self {
            probability: check_probability(Self::NAME, "probability", probability)?,
            alpha: check_non_negative(Self::NAME, "alpha", alpha)?,
        })
    }
}

impl Crossover for BlxAlphaCrossover {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn cross(
        &self,
        parent1: &Solution,
        parent2: &Solution,
        bounds: &[VariableBounds],
        rng: &mut dyn RngCore,
    ) -> Result<(Solution, Solution)> {
        check_parents(parent1, parent2, bounds)?;

        let mut child1 = parent1.clone();
        let mut child2 = parent2.clone();
        if rng.random::<f64>() >= self.probability {
            return Ok((child1, child2));
        }

        let x1 = parent1.variables();
        let x2 = parent2.variables();
        let c1 = child1.variables_mut();
        let c2 = child2.variables_mut();

        for (i, b) in bounds.iter().enumerate() {
            let lo = x1[i].min(x2[i]);
            let hi = x1[i].max(x2[i]);
            let range = hi - lo;
            if range <= EPS {
                continue;
            }
            let mut from = lo - self.alpha * range;
            let mut to = hi + self.alpha * range;
            if !(to - from).is_finite() {
                from = from.max(b.lower);
                to = to.min(b.upper);
            }
            c1[i] = b.repair(rng.random_range(from..=to));
            c2[i] = b.repair(rng.random_range(from..=to));
        }

        Ok((child1, child2))
    }
}

/// Single-point crossover: swaps the gene tails after a random cut.
///
/// Every child gene comes from a parent, so bounds always hold.
#[derive(Debug, Clone, PartialEq)]
pub struct SinglePointCrossover {
    probability: f64,
}

impl SinglePointCrossover {
    pub const NAME: &'static str = "SinglePointCrossover";

    pub fn new(probability: f64) -> Result<Self> {
        Ok(Self {
            probability: check_probability(Self::NAME, "probability", probability)?,
        })
    }
}

impl Crossover for SinglePointCrossover {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn cross(
        &self,
        parent1: &Solution,
        parent2: &Solution,
        bounds: &[VariableBounds],
        rng: &mut dyn RngCore,
    ) -> Result<(Solution, Solution)> {
        check_parents(parent1, parent2, bounds)?;

        let mut child1 = parent1.clone();
        let mut child2 = parent2.clone();
        let n = bounds.len();
        if n < 2 || rng.random::<f64>() >= self.probability {
            return Ok((child1, child2));
        }

        let point = rng.random_range(1..n);
        child1.variables_mut()[point..].copy_from_slice(&parent2.variables()[point..]);
        child2.variables_mut()[point..].copy_from_slice(&parent1.variables()[point..]);
        Ok((child1, child2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MoeaError;
    use crate::problem::VariableKind;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn parents(bounds: &[VariableBounds], rng: &mut StdRng) -> (Solution, Solution) {
        (Solution::random(bounds, rng), Solution::random(bounds, rng))
    }

    fn operators() -> Vec<Box<dyn Crossover>> {
        vec![
            Box::new(SbxCrossover::new(1.0, 20.0).unwrap()),
            Box::new(SbxCrossover::new(1.0, 0.5).unwrap()),
            Box::new(BlxAlphaCrossover::new(1.0, 0.5).unwrap()),
            Box::new(SinglePointCrossover::new(1.0).unwrap()),
        ]
    }

    #[test]
    fn test_probability_zero_copies_parents() {
        let bounds = VariableBounds::uniform(5, 0.0, 1.0);
        let mut rng = StdRng::seed_from_u64(7);
        let (p1, p2) = parents(&bounds, &mut rng);

        for op in [
            Box::new(SbxCrossover::new(0.0, 20.0).unwrap()) as Box<dyn Crossover>,
            Box::new(BlxAlphaCrossover::new(0.0, 0.5).unwrap()),
            Box::new(SinglePointCrossover::new(0.0).unwrap()),
        ] {
            for _ in 0..50 {
                let (c1, c2) = op.cross(&p1, &p2, &bounds, &mut rng).unwrap();
                assert_eq!(c1, p1, "{} changed parent 1", op.name());
                assert_eq!(c2, p2, "{} changed parent 2", op.name());
            }
        }
    }

    #[test]
    fn test_probability_one_is_reproducible() {
        let bounds = VariableBounds::uniform(8, -1.0, 1.0);
        let mut rng = StdRng::seed_from_u64(3);
        let (p1, p2) = parents(&bounds, &mut rng);

        for op in operators() {
            let first = op
                .cross(&p1, &p2, &bounds, &mut StdRng::seed_from_u64(42))
                .unwrap();
            let second = op
                .cross(&p1, &p2, &bounds, &mut StdRng::seed_from_u64(42))
                .unwrap();
            assert_eq!(first, second, "{} is not reproducible", op.name());
            assert!(!first.0.is_evaluated());
        }
    }

    #[test]
    fn test_parents_untouched() {
        let bounds = VariableBounds::uniform(4, 0.0, 10.0);
        let mut rng = StdRng::seed_from_u64(11);
        let (p1, p2) = parents(&bounds, &mut rng);
        let (before1, before2) = (p1.clone(), p2.clone());

        for op in operators() {
            op.cross(&p1, &p2, &bounds, &mut rng).unwrap();
        }
        assert_eq!(p1, before1);
        assert_eq!(p2, before2);
    }

    #[test]
    fn test_dimension_mismatch() {
        let bounds = VariableBounds::uniform(3, 0.0, 1.0);
        let short = Solution::new(vec![0.5, 0.5]);
        let ok = Solution::new(vec![0.5, 0.5, 0.5]);
        let mut rng = StdRng::seed_from_u64(1);
        for op in operators() {
            assert!(matches!(
                op.cross(&short, &ok, &bounds, &mut rng),
                Err(MoeaError::DimensionMismatch { expected: 3, actual: 2 })
            ));
        }
    }

    #[test]
    fn test_single_point_swaps_tails() {
        let bounds = VariableBounds::uniform(4, 0.0, 1.0);
        let p1 = Solution::new(vec![0.0; 4]);
        let p2 = Solution::new(vec![1.0; 4]);
        let op = SinglePointCrossover::new(1.0).unwrap();
        let (c1, c2) = op
            .cross(&p1, &p2, &bounds, &mut StdRng::seed_from_u64(5))
            .unwrap();
        let point = c1.variables().iter().position(|&v| v == 1.0).unwrap();
        assert!(point >= 1);
        assert!(c1.variables()[point..].iter().all(|&v| v == 1.0));
        assert!(c2.variables()[..point].iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_blx_huge_alpha_stays_in_bounds() {
        let bounds = VariableBounds::uniform(3, -f64::MAX / 2.0, f64::MAX / 2.0);
        let p1 = Solution::new(vec![-1.0e300, 0.0, 5.0]);
        let p2 = Solution::new(vec![1.0e300, 1.0, 5.0]);
        let op = BlxAlphaCrossover::new(1.0, 1.0e308).unwrap();
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..50 {
            let (c1, c2) = op.cross(&p1, &p2, &bounds, &mut rng).unwrap();
            assert!(c1.within(&bounds), "{:?}", c1.variables());
            assert!(c2.within(&bounds), "{:?}", c2.variables());
            assert_eq!(c1.variables()[2], 5.0);
        }
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(SbxCrossover::new(1.5, 20.0).is_err());
        assert!(SbxCrossover::new(0.9, -1.0).is_err());
        assert!(BlxAlphaCrossover::new(-0.1, 0.5).is_err());
        assert!(BlxAlphaCrossover::new(0.9, f64::NAN).is_err());
        assert!(SinglePointCrossover::new(2.0).is_err());
    }

    proptest! {
        #[test]
        fn prop_offspring_within_bounds(
            seed in any::<u64>(),
            limits in prop::collection::vec((-100.0f64..100.0, 0.0f64..50.0, any::<bool>()), 1..12),
        ) {
            let bounds: Vec<VariableBounds> = limits
                .iter()
                .map(|&(lower, width, integer)| {
                    if integer {
                        VariableBounds::integer(lower.floor() as i64, (lower + width).floor() as i64)
                    } else {
                        VariableBounds { lower, upper: lower + width, kind: VariableKind::Real }
                    }
                })
                .collect();
            let mut rng = StdRng::seed_from_u64(seed);
            let (p1, p2) = parents(&bounds, &mut rng);

            for op in operators() {
                let (c1, c2) = op.cross(&p1, &p2, &bounds, &mut rng).unwrap();
                prop_assert!(c1.within(&bounds), "{} produced {:?}", op.name(), c1.variables());
                prop_assert!(c2.within(&bounds), "{} produced {:?}", op.name(), c2.variables());
            }
        }
    }
}
