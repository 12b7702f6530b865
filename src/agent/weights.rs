//! Q-function weight vector: estimation and persistence
//!
//! The weight vector is the only learned state. It is loaded once at
//! startup (persisted file or random init in [-1, 1]) and overwritten on
//! disk at the end of every episode, one value per line in feature order.

use std::fs;
use std::io::Write;
use std::path::Path;

use rand::rngs::StdRng;
use rand::Rng;

use crate::agent::features::{FeatureVector, NUM_FEATURES};
use crate::core::error::{AgentError, Result};

/// Linear Q-function weights, fixed length [`NUM_FEATURES`]
///
/// The length invariant is enforced eagerly at construction; a mismatch
/// is a configuration error, never a runtime surprise.
#[derive(Debug, Clone, PartialEq)]
pub struct Weights {
    values: Vec<f64>,
}

impl Weights {
    /// Wrap an explicit weight vector, checking the dimension invariant
    pub fn from_values(values: Vec<f64>) -> Result<Self> {
        if values.len() != NUM_FEATURES {
            return Err(AgentError::DimensionMismatch {
                expected: NUM_FEATURES,
                found: values.len(),
            });
        }
        Ok(Self { values })
    }

    /// Fresh random weights, each uniform in [-1, 1]
    pub fn random(rng: &mut StdRng) -> Self {
        Self {
            values: (0..NUM_FEATURES)
                .map(|_| rng.gen::<f64>() * 2.0 - 1.0)
                .collect(),
        }
    }

    /// Expected discounted return for a (unit, target) pair: the dot
    /// product of weights and features
    pub fn q_value(&self, features: &FeatureVector) -> f64 {
        self.values
            .iter()
            .zip(features.iter())
            .map(|(w, f)| w * f)
            .sum()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub(crate) fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Overwrite the weight file, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(path)?;
        for weight in &self.values {
            writeln!(file, "{}", weight)?;
        }
        Ok(())
    }

    /// Load weights from a file, one value per line
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let values: std::result::Result<Vec<f64>, _> = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.trim().parse::<f64>())
            .collect();
        Self::from_values(values?)
    }

    /// Load persisted weights, falling back to random init when the file
    /// is missing or unreadable
    pub fn load_or_random(path: &Path, rng: &mut StdRng) -> Self {
        match Self::load(path) {
            Ok(weights) => {
                tracing::info!(path = %path.display(), "loaded persisted weights");
                weights
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to load weights, falling back to random init"
                );
                Self::random(rng)
            }
        }
    }
}
