//! Semi-gradient TD(0) weight update
//!
//! All weights move by the same TD error scaled by their feature
//! coordinate, the standard linear-approximation Q-learning rule. The
//! update is synchronous and in place; it runs only during learning
//! episodes, at significant-event decision points.

use crate::agent::features::{feature_vector, FeatureVector};
use crate::agent::weights::Weights;
use crate::core::config::LearningConfig;
use crate::core::types::UnitId;
use crate::engine::history::TurnRecord;
use crate::engine::snapshot::Snapshot;

/// One gradient step of the weight vector toward the TD target.
///
/// `features` is the vector of the pair just chosen for `attacker`;
/// `accumulated_reward` is the unit's ledger total. The best next
/// Q-value is a fresh maximum over live opponents; when none remain,
/// `tracked_best_q` (the best value seen during selection) stands in.
#[allow(clippy::too_many_arguments)]
pub fn update_weights(
    weights: &mut Weights,
    features: &FeatureVector,
    accumulated_reward: f64,
    attacker: UnitId,
    opponents: &[UnitId],
    snapshot: &Snapshot,
    prior_turn: Option<&TurnRecord>,
    tracked_best_q: f64,
    config: &LearningConfig,
) {
    let current_q = weights.q_value(features);

    let best_next_q = opponents
        .iter()
        .map(|&opponent| {
            weights.q_value(&feature_vector(snapshot, prior_turn, attacker, opponent))
        })
        .fold(f64::NEG_INFINITY, f64::max);
    let best_next_q = if best_next_q.is_finite() {
        best_next_q
    } else {
        tracked_best_q
    };

    let target = accumulated_reward + config.gamma * best_next_q;
    let td_error = target - current_q;

    for (weight, feature) in weights.values_mut().iter_mut().zip(features.iter()) {
        *weight += config.learning_rate * td_error * feature;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::features::NUM_FEATURES;
    use crate::core::types::{GridPos, Side};
    use crate::engine::snapshot::UnitState;

    fn config() -> LearningConfig {
        LearningConfig::default()
    }

    fn lone_pair() -> (Snapshot, UnitId, Vec<UnitId>) {
        let mut snapshot = Snapshot::default();
        snapshot.units.insert(
            UnitId(0),
            UnitState {
                side: Side::Controlled,
                position: GridPos::new(0, 0),
                hp: 10,
            },
        );
        snapshot.units.insert(
            UnitId(1),
            UnitState {
                side: Side::Opposing,
                position: GridPos::new(2, 0),
                hp: 5,
            },
        );
        (snapshot, UnitId(0), vec![UnitId(1)])
    }

    #[test]
    fn test_single_step_matches_hand_computation() {
        let (snapshot, attacker, opponents) = lone_pair();
        let mut weights = Weights::from_values(vec![0.0; NUM_FEATURES]).unwrap();
        let features = feature_vector(&snapshot, None, attacker, opponents[0]);

        // Zero weights: current_q = 0, best_next_q = 0, target = reward.
        update_weights(
            &mut weights,
            &features,
            10.0,
            attacker,
            &opponents,
            &snapshot,
            None,
            0.0,
            &config(),
        );

        // w_i = alpha * reward * f_i
        let expected: Vec<f64> = features.iter().map(|f| 0.0001 * 10.0 * f).collect();
        for (w, e) in weights.values().iter().zip(expected.iter()) {
            assert!((w - e).abs() < 1e-12);
        }
    }

    #[test]
    fn test_zero_td_error_leaves_weights_unchanged() {
        let (snapshot, attacker, opponents) = lone_pair();
        // Bias-only weights: every pair has Q = 0.5 * w0.
        let mut weights = Weights::from_values(vec![2.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
        let before = weights.clone();
        let features = feature_vector(&snapshot, None, attacker, opponents[0]);

        // current_q = 1.0, best_next_q = 1.0, reward chosen so the target
        // equals current_q exactly: R = q - gamma * q = 0.1.
        update_weights(
            &mut weights,
            &features,
            0.1,
            attacker,
            &opponents,
            &snapshot,
            None,
            0.0,
            &config(),
        );
        for (w, b) in weights.values().iter().zip(before.values().iter()) {
            assert!((w - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_empty_roster_falls_back_to_tracked_best() {
        let (snapshot, attacker, _) = lone_pair();
        let mut weights = Weights::from_values(vec![0.0; NUM_FEATURES]).unwrap();
        let features = [0.5, 0.0, 0.0, 0.0, 0.0];

        update_weights(
            &mut weights,
            &features,
            0.0,
            attacker,
            &[],
            &snapshot,
            None,
            2.0,
            &config(),
        );

        // target = gamma * tracked_best = 1.8; w0 = alpha * 1.8 * 0.5
        let expected = 0.0001 * 1.8 * 0.5;
        assert!((weights.values()[0] - expected).abs() < 1e-12);
        assert!(weights.values()[0].is_finite());
    }
}
