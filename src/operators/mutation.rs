//! Real-coded mutation operators.
//!
//! # References
//!
//! - Deb & Goyal (1996), "A Combined Genetic Adaptive Search (GeneAS) for
//!   Engineering Design" (polynomial mutation)

use super::{check_dimensions, check_non_negative, check_probability, Mutation};
use crate::error::Result;
use crate::problem::{VariableBounds, VariableKind};
use crate::solution::Solution;
use rand::{Rng, RngCore};

/// Polynomial mutation.
///
/// Each gene is perturbed with probability `probability` using a polynomial
/// distribution shaped by `distribution_index`; results are clamped to the
/// variable bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialMutation {
    probability: f64,
    distribution_index: f64,
}

impl PolynomialMutation {
    pub const NAME: &'static str = "PolynomialMutation";

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

    fn perturb(&self, y: f64, b: &VariableBounds, u: f64) -> f64 {
        let width = b.width();
        let delta1 = (y - b.lower) / width;
        let delta2 = (b.upper - y) / width;
        let eta = self.distribution_index + 1.0;
        let mut_pow = 1.0 / eta;

        let deltaq = if u <= 0.5 {
            let xy = 1.0 - delta1;
            let val = 2.0 * u + (1.0 - 2.0 * u) * xy.powf(eta);
            val.powf(mut_pow) - 1.0
        } else {
            let xy = 1.0 - delta2;
            let val = 2.0 * (1.0 - u) + 2.0 * (u - 0.5) * xy.powf(eta);
            1.0 - val.powf(mut_pow)
        };

        b.repair(y + deltaq * width)
    }
}

impl Mutation for PolynomialMutation {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn mutate(
        &self,
        solution: &mut Solution,
        bounds: &[VariableBounds],
        rng: &mut dyn RngCore,
    ) -> Result<()> {
        check_dimensions(solution, bounds)?;

        for (i, b) in bounds.iter().enumerate() {
            if rng.random::<f64>() >= self.probability || b.width() <= 0.0 {
                continue;
            }
            let u = rng.random::<f64>();
            let y = solution.variables()[i];
            solution.variables_mut()[i] = self.perturb(y, b, u);
        }
        Ok(())
    }
}

/// Uniform mutation.
///
/// Adds `(u - 0.5) * perturbation` to each selected gene. A result outside
/// the bounds is discarded and the gene is re-sampled uniformly inside them.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformMutation {
    probability: f64,
    perturbation: f64,
}

impl UniformMutation {
    pub const NAME: &'static str = "UniformMutation";

    pub fn new(probability: f64, perturbation: f64) -> Result<Self> {
        Ok(Self {
            probability: check_probability(Self::NAME, "probability", probability)?,
            perturbation: check_non_negative(Self::NAME, "perturbation", perturbation)?,
        })
    }
}

impl Mutation for UniformMutation {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn mutate(
        &self,
        solution: &mut Solution,
        bounds: &[VariableBounds],
        rng: &mut dyn RngCore,
    ) -> Result<()> {
        check_dimensions(solution, bounds)?;

        for (i, b) in bounds.iter().enumerate() {
            if rng.random::<f64>() >= self.probability {
                continue;
            }
            let step = (rng.random::<f64>() - 0.5) * self.perturbation;
            let candidate = match b.kind {
                VariableKind::Real => solution.variables()[i] + step,
                VariableKind::Integer => (solution.variables()[i] + step).round(),
            };
            solution.variables_mut()[i] = if b.contains(candidate) {
                candidate
            } else {
                b.sample(rng)
            };
        }
        Ok(())
    }
}
