//! Epsilon-greedy target selection
//!
//! Exploits greedily while learning; runs near-greedy during evaluation
//! episodes, where the rare exploration branch scans against the tracked
//! best Q-value instead of a fresh argmax. That asymmetry is deliberate:
//! it explores around the known best rather than re-deriving it.

use rand::rngs::StdRng;
use rand::Rng;

use crate::agent::features::feature_vector;
use crate::agent::weights::Weights;
use crate::core::types::UnitId;
use crate::engine::history::TurnRecord;
use crate::engine::snapshot::Snapshot;

/// Pick the opponent `attacker` should attack this turn.
///
/// Returns `None` when no live opponents remain. The first decision of an
/// episode (no prior turn) is uniform random since no Q-values exist yet.
/// The greedy path refreshes `best_q`, the best Q-value seen this
/// selection, which the weight update consumes in the same turn.
#[allow(clippy::too_many_arguments)]
pub fn select_target(
    snapshot: &Snapshot,
    prior_turn: Option<&TurnRecord>,
    attacker: UnitId,
    opponents: &[UnitId],
    weights: &Weights,
    evaluating: bool,
    epsilon: f64,
    rng: &mut StdRng,
    best_q: &mut f64,
) -> Option<UnitId> {
    if opponents.is_empty() {
        return None;
    }

    if prior_turn.is_none() {
        return Some(opponents[rng.gen_range(0..opponents.len())]);
    }

    if evaluating && rng.gen::<f64>() < epsilon {
        // Exploration around the known best: prefer any opponent whose
        // Q-value beats the tracked best, without refreshing it.
        let mut selected = opponents[0];
        for &opponent in opponents {
            let q = weights.q_value(&feature_vector(snapshot, prior_turn, attacker, opponent));
            if q > *best_q {
                selected = opponent;
            }
        }
        return Some(selected);
    }

    // Greedy: first maximum wins, in first-seen roster order.
    let mut selected = opponents[0];
    *best_q = weights.q_value(&feature_vector(snapshot, prior_turn, attacker, selected));
    for &opponent in opponents {
        let q = weights.q_value(&feature_vector(snapshot, prior_turn, attacker, opponent));
        if q > *best_q {
            *best_q = q;
            selected = opponent;
        }
    }
    Some(selected)
}
