//! Episode phase state machine
//!
//! Alternates fixed-length blocks of learning episodes and frozen-policy
//! evaluation episodes, so evaluation reward is measured decoupled from
//! the noisy in-progress learning signal.

use serde::{Deserialize, Serialize};

use crate::core::config::LearningConfig;

/// Current learning mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Learning,
    Evaluating,
}

/// One completed evaluation block on the learning curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockSummary {
    /// Learning episodes completed when this block finished
    pub episodes_played: u32,
    /// Average cumulative per-unit reward across the block
    pub average_reward: f64,
}

/// Result of recording an episode completion
#[derive(Debug, Clone, Copy)]
pub struct EpisodeOutcome {
    /// Set when this episode closed an evaluation block
    pub completed_block: Option<BlockSummary>,
    /// True once the learning-episode budget is exceeded
    pub halt: bool,
}

/// Phase counters and the learning-curve history
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhaseState {
    phase: Phase,
    completed_in_block: u32,
    total_completed: u32,
    evaluation_sum: f64,
    curve: Vec<BlockSummary>,
}

impl PhaseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_evaluating(&self) -> bool {
        self.phase == Phase::Evaluating
    }

    /// Learning episodes completed so far; non-decreasing
    pub fn total_completed(&self) -> u32 {
        self.total_completed
    }

    /// Running evaluation-reward sum for the current block
    pub fn evaluation_sum(&self) -> f64 {
        self.evaluation_sum
    }

    pub fn curve(&self) -> &[BlockSummary] {
        &self.curve
    }

    /// Record one completed episode.
    ///
    /// `episode_mean_reward` is the episode's mean per-unit cumulative
    /// reward; it only matters during evaluation blocks.
    pub fn complete_episode(
        &mut self,
        episode_mean_reward: f64,
        config: &LearningConfig,
    ) -> EpisodeOutcome {
        let mut completed_block = None;

        match self.phase {
            Phase::Learning => {
                self.total_completed += 1;
                self.completed_in_block += 1;
                if self.completed_in_block >= config.learning_block {
                    self.phase = Phase::Evaluating;
                    self.completed_in_block = 0;
                }
            }
            Phase::Evaluating => {
                self.evaluation_sum += episode_mean_reward;
                self.completed_in_block += 1;
                if self.completed_in_block >= config.evaluation_block {
                    let summary = BlockSummary {
                        episodes_played: self.total_completed,
                        average_reward: self.evaluation_sum / config.evaluation_block as f64,
                    };
                    self.curve.push(summary);
                    completed_block = Some(summary);
                    self.evaluation_sum = 0.0;
                    self.completed_in_block = 0;
                    self.phase = Phase::Learning;
                }
            }
        }

        EpisodeOutcome {
            completed_block,
            halt: self.total_completed > config.episode_budget,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(budget: u32) -> LearningConfig {
        LearningConfig {
            episode_budget: budget,
            ..Default::default()
        }
    }

    #[test]
    fn test_ten_learning_episodes_switch_to_evaluating() {
        let mut state = PhaseState::new();
        let config = config(100);
        for _ in 0..9 {
            state.complete_episode(0.0, &config);
            assert_eq!(state.phase(), Phase::Learning);
        }
        state.complete_episode(0.0, &config);
        assert_eq!(state.phase(), Phase::Evaluating);
        assert_eq!(state.total_completed(), 10);
    }

    #[test]
    fn test_full_block_cycle_returns_to_learning() {
        let mut state = PhaseState::new();
        let config = config(100);
        for _ in 0..10 {
            state.complete_episode(0.0, &config);
        }
        for _ in 0..4 {
            let outcome = state.complete_episode(2.0, &config);
            assert!(outcome.completed_block.is_none());
            assert_eq!(state.phase(), Phase::Evaluating);
        }
        let outcome = state.complete_episode(2.0, &config);
        let block = outcome.completed_block.unwrap();
        assert_eq!(block.episodes_played, 10);
        assert!((block.average_reward - 2.0).abs() < 1e-12);
        assert_eq!(state.phase(), Phase::Learning);
        // Total counts learning episodes only.
        assert_eq!(state.total_completed(), 10);
    }

    #[test]
    fn test_evaluation_sum_resets_after_block() {
        let mut state = PhaseState::new();
        let config = config(10);
        for _ in 0..10 {
            state.complete_episode(0.0, &config);
        }
        for _ in 0..5 {
            state.complete_episode(3.0, &config);
        }
        assert_eq!(state.curve().len(), 1);
        assert_eq!(state.evaluation_sum(), 0.0);
    }

    #[test]
    fn test_halt_once_budget_exceeded() {
        let mut state = PhaseState::new();
        let config = config(10);
        for _ in 0..10 {
            let outcome = state.complete_episode(0.0, &config);
            assert!(!outcome.halt);
        }
        for _ in 0..5 {
            let outcome = state.complete_episode(1.0, &config);
            assert!(!outcome.halt);
        }
        // The eleventh learning episode pushes total past the budget.
        let outcome = state.complete_episode(0.0, &config);
        assert!(outcome.halt);
        assert_eq!(state.total_completed(), 11);
    }

    #[test]
    fn test_total_completed_is_monotonic() {
        let mut state = PhaseState::new();
        let config = config(1000);
        let mut previous = 0;
        for _ in 0..60 {
            state.complete_episode(1.0, &config);
            assert!(state.total_completed() >= previous);
            previous = state.total_completed();
        }
    }
}
