//! Feature extraction for (attacker, defender) decision pairs
//!
//! Features are cheap, bounded, and depend only on the present snapshot
//! plus the previous turn's recorded actions, which keeps the linear
//! approximator numerically stable.

use crate::core::types::UnitId;
use crate::engine::history::TurnRecord;
use crate::engine::snapshot::Snapshot;

/// Length of the feature and weight vectors
pub const NUM_FEATURES: usize = 5;

/// Constant bias term; removes the need for a separate intercept
pub const BIAS: f64 = 0.5;

/// Scale on the inverse Chebyshev distance (feature 1)
const DISTANCE_SCALE: f64 = 100.0;

/// Feature 3 when the defender's last recorded action targets the attacker
const TARGETED_BY_DEFENDER: f64 = 100.0;

/// Neutral value for the history-derived features
const NEUTRAL: f64 = 1.0;

pub type FeatureVector = [f64; NUM_FEATURES];

/// Build the feature vector for attacking `defender` with `attacker`.
///
/// If either unit reference is stale (the unit died since the pair was
/// formed) every non-bias feature is 0.0; the zeroed vector signals
/// "decision pair no longer valid" instead of an error.
pub fn feature_vector(
    snapshot: &Snapshot,
    prior_turn: Option<&TurnRecord>,
    attacker: UnitId,
    defender: UnitId,
) -> FeatureVector {
    let mut features = [0.0; NUM_FEATURES];
    features[0] = BIAS;

    let (Some(att), Some(def)) = (snapshot.unit(attacker), snapshot.unit(defender)) else {
        return features;
    };

    // Closer targets are better; distance floored at 1 to keep the
    // reciprocal defined.
    let distance = att.position.chebyshev_distance(&def.position).max(1);
    features[1] = DISTANCE_SCALE / distance as f64;

    // Health ratio; a defender at or below zero is about to drop and is
    // treated as favorable, not infinite.
    features[2] = if def.hp > 0 {
        att.hp as f64 / def.hp as f64
    } else {
        NEUTRAL
    };

    features[3] = NEUTRAL;
    features[4] = NEUTRAL;

    if let Some(record) = prior_turn {
        // Is this defender attacking me right now?
        if record
            .command_of(defender)
            .is_some_and(|c| c.target == attacker)
        {
            features[3] = TARGETED_BY_DEFENDER;
        }

        // Contention: discourage redundant focus-fire by shrinking the
        // signal as more allies pile onto the same target.
        let attackers = record.attackers_of(defender);
        if attackers > 0 {
            features[4] = 1.0 / attackers as f64;
        }
    }

    features
}
