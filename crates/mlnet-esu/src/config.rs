use mlnet_core::errors::MlnError;
use serde::{Deserialize, Serialize};

use crate::requirement::{Bounds, Mode, Requirement};

/// Parameters of one enumeration or sampling run.
///
/// ```yaml
/// requirement:
///   kind: strict
///   sizes: [1, 2]
///   intersections: [1]
/// mode: exact
/// p: [1.0, 0.5, 0.5]
/// seed: 7
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Shape of accepted subgraphs.
    pub requirement: Requirement,
    /// Comparison used for intersections and relaxed counts.
    #[serde(default)]
    pub mode: Mode,
    /// Continuation probability per search depth, `max_nodes + max_layers - 1`
    /// entries; `None` enumerates everything.
    #[serde(default)]
    pub p: Option<Vec<f64>>,
    /// Seed for the sampling RNG.
    #[serde(default)]
    pub seed: u64,
}

impl SamplerConfig {
    /// Full enumeration for `requirement` in exact mode.
    pub fn new(requirement: Requirement) -> Self {
        Self {
            requirement,
            mode: Mode::default(),
            p: None,
            seed: 0,
        }
    }

    /// Returns a copy with a different comparison mode.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Returns a copy sampling with the given per-depth probabilities.
    pub fn with_sampling(mut self, p: Vec<f64>, seed: u64) -> Self {
        self.p = Some(p);
        self.seed = seed;
        self
    }

    /// Parses a YAML document.
    pub fn from_yaml_str(source: &str) -> Result<Self, MlnError> {
        serde_yaml::from_str(source)
            .map_err(|err| MlnError::requirement("config-parse", err.to_string()))
    }

    /// Validates the requirement and sampling probabilities.
    pub fn validate(&self) -> Result<Bounds, MlnError> {
        let bounds = self.requirement.bounds(self.mode)?;
        if let Some(p) = &self.p {
            if p.len() != bounds.sampling_depth() {
                return Err(MlnError::requirement(
                    "sampling-depth",
                    "one probability is needed per node and per layer of the largest subgraph, less one",
                )
                .with_context("expected", bounds.sampling_depth())
                .with_context("actual", p.len()));
            }
            if let Some(bad) = p.iter().find(|value| !(0.0..=1.0).contains(*value)) {
                return Err(MlnError::requirement(
                    "invalid-probability",
                    "sampling probabilities must lie in [0, 1]",
                )
                .with_context("p", bad));
            }
        }
        Ok(bounds)
    }
}
