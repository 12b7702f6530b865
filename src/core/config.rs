//! Learning configuration with documented constants
//!
//! All tunable values are collected here with explanations of their
//! purpose and how they interact with each other.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::error::{AgentError, Result};

/// Configuration for the learning loop
///
/// The numeric defaults are the tuned training setup; changing them
/// changes convergence behavior, not correctness.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    // === Q-LEARNING ===
    /// Discount factor applied to the best next Q-value in the TD target
    ///
    /// At 0.9, reward 10 turns out is worth ~35% of immediate reward.
    pub gamma: f64,

    /// Step size of the semi-gradient weight update
    ///
    /// Kept small (1e-4) because features are unnormalized and can reach
    /// 100; larger values make the linear approximator oscillate.
    pub learning_rate: f64,

    /// Exploration probability during evaluation episodes
    ///
    /// Evaluation runs a near-greedy policy; 0.02 leaves just enough
    /// exploration to avoid deterministic lock-in.
    pub epsilon: f64,

    // === EPISODE SCHEDULE ===
    /// Consecutive learning episodes per block
    pub learning_block: u32,

    /// Consecutive frozen-policy evaluation episodes per block
    pub evaluation_block: u32,

    /// Total learning-episode budget; the process halts once exceeded
    pub episode_budget: u32,

    // === PERSISTENCE ===
    /// Load previously persisted weights instead of random init
    pub load_weights: bool,

    /// Weight file location, one value per line in feature order
    pub weights_path: PathBuf,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            gamma: 0.9,
            learning_rate: 0.0001,
            epsilon: 0.02,
            learning_block: 10,
            evaluation_block: 5,
            episode_budget: 10,
            load_weights: false,
            weights_path: PathBuf::from("agent_weights/weights.txt"),
        }
    }
}

impl LearningConfig {
    /// Load a config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: LearningConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(AgentError::InvalidConfig(format!(
                "gamma ({}) must be in [0, 1]",
                self.gamma
            )));
        }
        if self.learning_rate <= 0.0 {
            return Err(AgentError::InvalidConfig(format!(
                "learning_rate ({}) must be positive",
                self.learning_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(AgentError::InvalidConfig(format!(
                "epsilon ({}) must be in [0, 1]",
                self.epsilon
            )));
        }
        if self.learning_block == 0 || self.evaluation_block == 0 {
            return Err(AgentError::InvalidConfig(
                "block sizes must be positive".into(),
            ));
        }
        Ok(())
    }
}
