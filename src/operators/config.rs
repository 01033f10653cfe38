//! Typed operator configurations.
//!
//! Operators are configured with the enums in this module and built once,
//! before the first generation. [`OperatorParams`] is the loosely typed
//! form accepted at the configuration boundary (a name plus a map of numeric
//! parameters); it is converted into a typed configuration immediately and
//! never travels further into the engine.

use super::{
    BinaryTournament, BlxAlphaCrossover, Crossover, Mutation, PolynomialMutation,
    RandomSelection, SbxCrossover, Selection, SinglePointCrossover, Tournament, UniformMutation,
};
use crate::error::{MoeaError, Result};
use std::collections::BTreeMap;

/// Numeric operator parameters keyed by name (`"probability"`,
/// `"distributionIndex"`, `"alpha"`, `"perturbation"`, `"size"`).
///
/// ```
/// use u_moea::operators::{CrossoverConfig, OperatorParams};
///
/// let params = OperatorParams::new()
///     .with("probability", 0.9)
///     .with("distributionIndex", 20.0);
/// let config = CrossoverConfig::from_params("SBXCrossover", &params).unwrap();
/// assert_eq!(config, CrossoverConfig::Sbx { probability: 0.9, distribution_index: 20.0 });
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct OperatorParams {
    values: BTreeMap<String, f64>,
}

impl OperatorParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` and returns `self`.
    pub fn with(mut self, key: &str, value: f64) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: f64) {
        self.values.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn require(&self, operator: &str, key: &str) -> Result<f64> {
        self.get(key)
            .ok_or_else(|| MoeaError::invalid_operator(operator, key, "missing"))
    }

    fn reject_unknown(&self, operator: &str, allowed: &[&str]) -> Result<()> {
        match self.values.keys().find(|k| !allowed.contains(&k.as_str())) {
            Some(key) => Err(MoeaError::invalid_operator(
                operator,
                key,
                format!("unknown parameter; expected one of: {}", allowed.join(", ")),
            )),
            None => Ok(()),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for OperatorParams {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

fn unknown_operator(role: &str, name: &str, known: &[&str]) -> MoeaError {
    MoeaError::invalid_operator(
        name,
        role,
        format!("unknown {role} operator; expected one of: {}", known.join(", ")),
    )
}

// ---- Crossover ----

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CrossoverConfig {
    /// Simulated binary crossover.
    Sbx {
        probability: f64,
        distribution_index: f64,
    },
    /// Blend crossover.
    BlxAlpha { probability: f64, alpha: f64 },
    SinglePoint { probability: f64 },
}

impl Default for CrossoverConfig {
    fn default() -> Self {
        Self::Sbx {
            probability: 0.9,
            distribution_index: 20.0,
        }
    }
}

impl CrossoverConfig {
    const NAMES: [&'static str; 3] = [
        SbxCrossover::NAME,
        BlxAlphaCrossover::NAME,
        SinglePointCrossover::NAME,
    ];

    /// SBX with the given probability and distribution index 20.
    pub fn sbx(probability: f64) -> Self {
        Self::Sbx {
            probability,
            distribution_index: 20.0,
        }
    }

    pub fn probability(&self) -> f64 {
        match *self {
            Self::Sbx { probability, .. }
            | Self::BlxAlpha { probability, .. }
            | Self::SinglePoint { probability } => probability,
        }
    }

    /// Converts a named parameter map. Every parameter of the operator is
    /// required.
    ///
    /// # Errors
    /// [`MoeaError::InvalidOperatorConfiguration`] for an unknown operator
    /// name, an unknown key or a missing parameter.
    pub fn from_params(name: &str, params: &OperatorParams) -> Result<Self> {
        match name {
            SbxCrossover::NAME => {
                params.reject_unknown(name, &["probability", "distributionIndex"])?;
                Ok(Self::Sbx {
                    probability: params.require(name, "probability")?,
                    distribution_index: params.require(name, "distributionIndex")?,
                })
            }
            BlxAlphaCrossover::NAME => {
                params.reject_unknown(name, &["probability", "alpha"])?;
                Ok(Self::BlxAlpha {
                    probability: params.require(name, "probability")?,
                    alpha: params.require(name, "alpha")?,
                })
            }
            SinglePointCrossover::NAME => {
                params.reject_unknown(name, &["probability"])?;
                Ok(Self::SinglePoint {
                    probability: params.require(name, "probability")?,
                })
            }
            _ => Err(unknown_operator("crossover", name, &Self::NAMES)),
        }
    }

    /// Builds and validates the operator.
    pub fn build(&self) -> Result<Box<dyn Crossover>> {
        Ok(match *self {
            Self::Sbx {
                probability,
                distribution_index,
            } => Box::new(SbxCrossover::new(probability, distribution_index)?),
            Self::BlxAlpha { probability, alpha } => {
                Box::new(BlxAlphaCrossover::new(probability, alpha)?)
            }
            Self::SinglePoint { probability } => Box::new(SinglePointCrossover::new(probability)?),
        })
    }
}

// ---- Mutation ----

/// Mutation configuration. A `probability` of `None` means
/// `1 / num_variables`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MutationConfig {
    Polynomial {
        probability: Option<f64>,
        distribution_index: f64,
    },
    Uniform {
        probability: Option<f64>,
        perturbation: f64,
    },
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self::Polynomial {
            probability: None,
            distribution_index: 20.0,
        }
    }
}

impl MutationConfig {
    const NAMES: [&'static str; 2] = [PolynomialMutation::NAME, UniformMutation::NAME];

    /// Polynomial mutation with a fixed per-gene probability and
    /// distribution index 20.
    pub fn polynomial(probability: f64) -> Self {
        Self::Polynomial {
            probability: Some(probability),
            distribution_index: 20.0,
        }
    }

    /// Converts a named parameter map. `"probability"` may be omitted.
    pub fn from_params(name: &str, params: &OperatorParams) -> Result<Self> {
        match name {
            PolynomialMutation::NAME => {
                params.reject_unknown(name, &["probability", "distributionIndex"])?;
                Ok(Self::Polynomial {
                    probability: params.get("probability"),
                    distribution_index: params.require(name, "distributionIndex")?,
                })
            }
            UniformMutation::NAME => {
                params.reject_unknown(name, &["probability", "perturbation"])?;
                Ok(Self::Uniform {
                    probability: params.get("probability"),
                    perturbation: params.require(name, "perturbation")?,
                })
            }
            _ => Err(unknown_operator("mutation", name, &Self::NAMES)),
        }
    }

    /// Builds and validates the operator for a problem with
    /// `num_variables` decision variables.
    pub fn build(&self, num_variables: usize) -> Result<Box<dyn Mutation>> {
        let default_probability = 1.0 / num_variables.max(1) as f64;
        Ok(match *self {
            Self::Polynomial {
                probability,
                distribution_index,
            } => Box::new(PolynomialMutation::new(
                probability.unwrap_or(default_probability),
                distribution_index,
            )?),
            Self::Uniform {
                probability,
                perturbation,
            } => Box::new(UniformMutation::new(
                probability.unwrap_or(default_probability),
                perturbation,
            )?),
        })
    }
}

// ---- Selection ----

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectionConfig {
    #[default]
    BinaryTournament,
    /// Tournament with the given number of contestants.
    Tournament(usize),
    Random,
}

impl SelectionConfig {
    const NAMES: [&'static str; 3] = [
        BinaryTournament::NAME,
        Tournament::NAME,
        RandomSelection::NAME,
    ];

    pub fn from_params(name: &str, params: &OperatorParams) -> Result<Self> {
        match name {
            BinaryTournament::NAME => {
                params.reject_unknown(name, &[])?;
                Ok(Self::BinaryTournament)
            }
            Tournament::NAME => {
                params.reject_unknown(name, &["size"])?;
                let size = params.require(name, "size")?;
                if !(size.is_finite() && size >= 1.0 && size.fract() == 0.0) {
                    return Err(MoeaError::invalid_operator(
                        name,
                        "size",
                        format!("must be a positive whole number, got {size}"),
                    ));
                }
                Ok(Self::Tournament(size as usize))
            }
            RandomSelection::NAME => {
                params.reject_unknown(name, &[])?;
                Ok(Self::Random)
            }
            _ => Err(unknown_operator("selection", name, &Self::NAMES)),
        }
    }

    pub fn build(&self) -> Result<Box<dyn Selection>> {
        Ok(match *self {
            Self::BinaryTournament => Box::new(BinaryTournament),
            Self::Tournament(k) => Box::new(Tournament::new(k)?),
            Self::Random => Box::new(RandomSelection),
        })
    }
}
