//! Classic multi-objective test problems.
//!
//! Useful as smoke tests for new strategies and as workloads for the
//! benchmarks. All are unconstrained and minimize every objective.
//!
//! # References
//!
//! - Schaffer (1985), "Multiple Objective Optimization with Vector Evaluated GAs"
//! - Fonseca & Fleming (1995), "An Overview of Evolutionary Algorithms in
//!   Multiobjective Optimization"
//! - Kursawe (1991), "A Variant of Evolution Strategies for Vector Optimization"
//! - Zitzler, Deb & Thiele (2000), "Comparison of Multiobjective Evolutionary
//!   Algorithms: Empirical Results"

use super::{Evaluation, Problem, VariableBounds};
use crate::error::{EvaluationFailure, MoeaError, Result};
use std::f64::consts::PI;

type Computed = std::result::Result<Evaluation, EvaluationFailure>;

/// Schaffer's single-variable problem: `f1 = x²`, `f2 = (x - 2)²`.
#[derive(Debug, Clone)]
pub struct Schaffer {
    bounds: Vec<VariableBounds>,
}

impl Default for Schaffer {
    fn default() -> Self {
        Self {
            bounds: vec![VariableBounds::real(-100_000.0, 100_000.0)],
        }
    }
}

impl Problem for Schaffer {
    fn name(&self) -> &str {
        "Schaffer"
    }

    fn bounds(&self) -> &[VariableBounds] {
        &self.bounds
    }

    fn num_objectives(&self) -> usize {
        2
    }

    fn compute(&self, x: &[f64]) -> Computed {
        Ok(Evaluation::new(vec![x[0] * x[0], (x[0] - 2.0).powi(2)]))
    }
}

/// Fonseca–Fleming problem, 3 variables in `[-4, 4]`.
#[derive(Debug, Clone)]
pub struct Fonseca {
    bounds: Vec<VariableBounds>,
}

impl Default for Fonseca {
    fn default() -> Self {
        Self {
            bounds: VariableBounds::uniform(3, -4.0, 4.0),
        }
    }
}

impl Problem for Fonseca {
    fn name(&self) -> &str {
        "Fonseca"
    }

    fn bounds(&self) -> &[VariableBounds] {
        &self.bounds
    }

    fn num_objectives(&self) -> usize {
        2
    }

    fn compute(&self, x: &[f64]) -> Computed {
        let shift = 1.0 / (x.len() as f64).sqrt();
        let s1: f64 = x.iter().map(|v| (v - shift).powi(2)).sum();
        let s2: f64 = x.iter().map(|v| (v + shift).powi(2)).sum();
        Ok(Evaluation::new(vec![1.0 - (-s1).exp(), 1.0 - (-s2).exp()]))
    }
}

/// Kursawe problem, 3 variables in `[-5, 5]`.
#[derive(Debug, Clone)]
pub struct Kursawe {
    bounds: Vec<VariableBounds>,
}

impl Default for Kursawe {
    fn default() -> Self {
        Self {
            bounds: VariableBounds::uniform(3, -5.0, 5.0),
        }
    }
}

impl Problem for Kursawe {
    fn name(&self) -> &str {
        "Kursawe"
    }

    fn bounds(&self) -> &[VariableBounds] {
        &self.bounds
    }

    fn num_objectives(&self) -> usize {
        2
    }

    fn compute(&self, x: &[f64]) -> Computed {
        let f1 = x
            .windows(2)
            .map(|w| -10.0 * (-0.2 * (w[0] * w[0] + w[1] * w[1]).sqrt()).exp())
            .sum();
        let f2 = x
            .iter()
            .map(|v| v.abs().powf(0.8) + 5.0 * v.powi(3).sin())
            .sum();
        Ok(Evaluation::new(vec![f1, f2]))
    }
}

/// Which member of the ZDT family a [`Zdt`] instance computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ZdtVariant {
    Two,
    Three,
    Four,
}

/// ZDT2, ZDT3 and ZDT4 problems.
///
/// ZDT2 has a concave front, ZDT3 a disconnected one, and ZDT4 adds 21⁹
/// local fronts through a Rastrigin-like `g`.
#[derive(Debug, Clone)]
pub struct Zdt {
    variant: ZdtVariant,
    bounds: Vec<VariableBounds>,
}

impl Zdt {
    /// ZDT2 with `n` variables in `[0, 1]` (the usual `n` is 30).
    pub fn zdt2(n: usize) -> Result<Self> {
        Self::build(ZdtVariant::Two, n)
    }

    /// ZDT3 with `n` variables in `[0, 1]` (the usual `n` is 30).
    pub fn zdt3(n: usize) -> Result<Self> {
        Self::build(ZdtVariant::Three, n)
    }

    /// ZDT4 with `x0` in `[0, 1]` and the rest in `[-5, 5]` (the usual `n` is 10).
    pub fn zdt4(n: usize) -> Result<Self> {
        Self::build(ZdtVariant::Four, n)
    }

    fn build(variant: ZdtVariant, n: usize) -> Result<Self> {
        if n < 2 {
            return Err(MoeaError::invalid_config(format!(
                "ZDT problems need at least 2 variables, got {n}"
            )));
        }
        let mut bounds = vec![VariableBounds::real(0.0, 1.0)];
        let tail = match variant {
            ZdtVariant::Four => VariableBounds::real(-5.0, 5.0),
            _ => VariableBounds::real(0.0, 1.0),
        };
        bounds.extend(std::iter::repeat(tail).take(n - 1));
        Ok(Self { variant, bounds })
    }

    fn g(&self, x: &[f64]) -> f64 {
        let tail = &x[1..];
        match self.variant {
            ZdtVariant::Four => {
                1.0 + 10.0 * tail.len() as f64
                    + tail
                        .iter()
                        .map(|v| v * v - 10.0 * (4.0 * PI * v).cos())
                        .sum::<f64>()
            }
            _ => 1.0 + 9.0 * tail.iter().sum::<f64>() / tail.len() as f64,
        }
    }

    fn h(&self, f: f64, g: f64) -> f64 {
        match self.variant {
            ZdtVariant::Two => 1.0 - (f / g).powi(2),
            ZdtVariant::Three => 1.0 - (f / g).sqrt() - (f / g) * (10.0 * PI * f).sin(),
            ZdtVariant::Four => 1.0 - (f / g).sqrt(),
        }
    }
}

impl Problem for Zdt {
    fn name(&self) -> &str {
        match self.variant {
            ZdtVariant::Two => "ZDT2",
            ZdtVariant::Three => "ZDT3",
            ZdtVariant::Four => "ZDT4",
        }
    }

    fn bounds(&self) -> &[VariableBounds] {
        &self.bounds
    }

    fn num_objectives(&self) -> usize {
        2
    }

    fn compute(&self, x: &[f64]) -> Computed {
        let f1 = x[0];
        let g = self.g(x);
        Ok(Evaluation::new(vec![f1, g * self.h(f1, g)]))
    }
}

/// Mixed integer/real problem: minimizes the sum of the integer block and
/// the sum of the truncated real block.
#[derive(Debug, Clone)]
pub struct IntReal {
    int_variables: usize,
    bounds: Vec<VariableBounds>,
}

impl IntReal {
    pub fn new(int_variables: usize, real_variables: usize) -> Self {
        let mut bounds = vec![VariableBounds::integer(-5, 5); int_variables];
        bounds.extend(VariableBounds::uniform(real_variables, -5.0, 5.0));
        Self {
            int_variables,
            bounds,
        }
    }
}

impl Default for IntReal {
    fn default() -> Self {
        Self::new(3, 3)
    }
}

impl Problem for IntReal {
    fn name(&self) -> &str {
        "IntReal"
    }

    fn bounds(&self) -> &[VariableBounds] {
        &self.bounds
    }

    fn num_objectives(&self) -> usize {
        2
    }

    fn compute(&self, x: &[f64]) -> Computed {
        let (ints, reals) = x.split_at(self.int_variables);
        Ok(Evaluation::new(vec![
            ints.iter().sum(),
            reals.iter().map(|v| v.trunc()).sum(),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::validate_problem;

    #[test]
    fn test_schaffer_known_points() {
        let p = Schaffer::default();
        assert_eq!(p.evaluate(&[0.0]).unwrap().objectives, vec![0.0, 4.0]);
        assert_eq!(p.evaluate(&[2.0]).unwrap().objectives, vec![4.0, 0.0]);
    }

    #[test]
    fn test_fonseca_symmetry() {
        let p = Fonseca::default();
        let s = 1.0 / 3f64.sqrt();
        let e = p.evaluate(&[s, s, s]).unwrap();
        assert!(e.objectives[0].abs() < 1e-12);
        let mirrored = p.evaluate(&[-s, -s, -s]).unwrap();
        assert!((e.objectives[1] - mirrored.objectives[0]).abs() < 1e-12);
    }

    #[test]
    fn test_kursawe_origin() {
        let e = Kursawe::default().evaluate(&[0.0, 0.0, 0.0]).unwrap();
        assert!((e.objectives[0] + 20.0).abs() < 1e-12);
        assert!(e.objectives[1].abs() < 1e-12);
    }

    #[test]
    fn test_zdt_optimal_front() {
        // With x[1..] on the optimum, g = 1 for every member of the family
        let zdt2 = Zdt::zdt2(30).unwrap();
        let mut x = vec![0.0; 30];
        x[0] = 0.5;
        let e = zdt2.evaluate(&x).unwrap();
        assert!((e.objectives[1] - 0.75).abs() < 1e-12);

        let zdt4 = Zdt::zdt4(10).unwrap();
        let mut x = vec![0.0; 10];
        x[0] = 0.25;
        let e = zdt4.evaluate(&x).unwrap();
        assert!((e.objectives[1] - 0.5).abs() < 1e-12);

        let zdt3 = Zdt::zdt3(30).unwrap();
        let e = zdt3.evaluate(&vec![0.0; 30]).unwrap();
        assert!((e.objectives[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zdt_needs_two_variables() {
        assert!(Zdt::zdt2(1).is_err());
        assert_eq!(Zdt::zdt4(10).unwrap().bounds()[3], VariableBounds::real(-5.0, 5.0));
    }

    #[test]
    fn test_int_real() {
        let p = IntReal::default();
        validate_problem(&p).unwrap();
        let e = p.evaluate(&[1.0, 2.0, -1.0, 0.9, 1.5, -2.7]).unwrap();
        assert_eq!(e.objectives, vec![2.0, -1.0]);
    }

    #[test]
    fn test_all_validate() {
        validate_problem(&Schaffer::default()).unwrap();
        validate_problem(&Fonseca::default()).unwrap();
        validate_problem(&Kursawe::default()).unwrap();
        validate_problem(&Zdt::zdt3(30).unwrap()).unwrap();
    }
}
