//! Quality indicators for approximation fronts.
//!
//! # References
//!
//! - Van Veldhuizen & Lamont (1998), "Multiobjective Evolutionary Algorithm
//!   Research: A History and Analysis"

use crate::error::{MoeaError, Result};

/// Generational distance of `front` to `reference_front`.
///
/// Both fronts are normalized with the per-objective minimum and maximum
/// of the reference front; objectives where the reference has zero range
/// are left unscaled. The result is `sqrt(Σ dᵢ²) / n`, where `dᵢ` is the
/// Euclidean distance of the i-th front point to its nearest reference
/// point. Zero means every point lies on the reference front.
///
/// # Errors
///
/// - [`MoeaError::InvalidConfiguration`] if either front is empty
/// - [`MoeaError::DimensionMismatch`] if objective vectors differ in length
///
/// # Example
///
/// ```
/// use u_moea::indicators::generational_distance;
///
/// let reference = vec![vec![0.0, 1.0], vec![0.5, 0.5], vec![1.0, 0.0]];
/// assert_eq!(generational_distance(&reference, &reference).unwrap(), 0.0);
///
/// let shifted = vec![vec![0.5, 0.6]];
/// let gd = generational_distance(&shifted, &reference).unwrap();
/// assert!((gd - 0.1).abs() < 1e-12);
/// ```
pub fn generational_distance<A, B>(front: &[A], reference_front: &[B]) -> Result<f64>
where
    A: AsRef<[f64]>,
    B: AsRef<[f64]>,
{
    if front.is_empty() || reference_front.is_empty() {
        return Err(MoeaError::invalid_config(
            "generational distance needs non-empty fronts",
        ));
    }
    let m = reference_front[0].as_ref().len();
    for point in front
        .iter()
        .map(|p| p.as_ref())
        .chain(reference_front.iter().map(|p| p.as_ref()))
    {
        if point.len() != m {
            return Err(MoeaError::dimension_mismatch(m, point.len()));
        }
    }

    let mut lower = vec![f64::INFINITY; m];
    let mut upper = vec![f64::NEG_INFINITY; m];
    for point in reference_front {
        for (k, &v) in point.as_ref().iter().enumerate() {
            lower[k] = lower[k].min(v);
            upper[k] = upper[k].max(v);
        }
    }
    let scale: Vec<f64> = lower
        .iter()
        .zip(&upper)
        .map(|(lo, hi)| if hi > lo { hi - lo } else { 1.0 })
        .collect();

    let normalize = |point: &[f64]| -> Vec<f64> {
        point
            .iter()
            .enumerate()
            .map(|(k, &v)| (v - lower[k]) / scale[k])
            .collect()
    };
    let reference: Vec<Vec<f64>> = reference_front
        .iter()
        .map(|p| normalize(p.as_ref()))
        .collect();

    let sum: f64 = front
        .iter()
        .map(|p| {
            let p = normalize(p.as_ref());
            reference
                .iter()
                .map(|r| squared_distance(&p, r))
                .fold(f64::INFINITY, f64::min)
        })
        .sum();

    Ok(sum.sqrt() / front.len() as f64)
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}
