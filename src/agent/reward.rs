//! Event-sourced reward accounting
//!
//! Reward is turn-local, summed from the previous turn's damage, death,
//! and command logs. Only the kill bonus is deduplicated across units;
//! damage and command-cost terms are not, since the per-turn windowing
//! already bounds double-counting to within-turn events.

use ahash::{AHashMap, AHashSet};

use crate::core::types::{Side, UnitId};
use crate::engine::history::TurnRecord;

/// Bonus for the kill of record on an opposing unit
pub const KILL_REWARD: f64 = 100.0;

/// Penalty for losing the unit itself
pub const DEATH_PENALTY: f64 = -100.0;

/// Cost per command issued to the unit (discourages churn)
pub const COMMAND_COST: f64 = -0.1;

/// Reward earned by `unit` from the previous turn's events.
///
/// Exactly 0 on the first turn of an episode, where no logs exist. A kill
/// pays out at most once across all controlled units: `credited_kills`
/// carries the dead opponents whose bonus is already spent.
pub fn turn_reward(
    unit: UnitId,
    prior_turn: Option<&TurnRecord>,
    credited_kills: &mut AHashSet<UnitId>,
) -> f64 {
    let Some(record) = prior_turn else {
        return 0.0;
    };

    let mut reward = 0.0;

    for damage in &record.damage {
        if damage.attacker == unit {
            reward += damage.amount as f64;
        } else if damage.defender == unit {
            reward -= damage.amount as f64;
        }
    }

    for death in &record.deaths {
        match death.side {
            Side::Opposing => {
                if !credited_kills.contains(&death.unit)
                    && record
                        .commands
                        .iter()
                        .any(|c| c.unit == unit && c.target == death.unit)
                {
                    reward += KILL_REWARD;
                    credited_kills.insert(death.unit);
                }
            }
            Side::Controlled => {
                if death.unit == unit {
                    reward += DEATH_PENALTY;
                }
            }
        }
    }

    for command in &record.commands {
        if command.unit == unit {
            reward += COMMAND_COST;
        }
    }

    reward
}

/// Accumulated per-unit reward since each unit's last decision point
#[derive(Debug, Clone, Default)]
pub struct RewardLedger {
    totals: AHashMap<UnitId, f64>,
}

impl RewardLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure an entry exists for a newly observed unit
    pub fn observe(&mut self, unit: UnitId) {
        self.totals.entry(unit).or_insert(0.0);
    }

    pub fn accumulate(&mut self, unit: UnitId, amount: f64) {
        *self.totals.entry(unit).or_insert(0.0) += amount;
    }

    pub fn total(&self, unit: UnitId) -> f64 {
        self.totals.get(&unit).copied().unwrap_or(0.0)
    }

    /// Drop a dead unit's entry, returning its final total
    pub fn remove(&mut self, unit: UnitId) -> Option<f64> {
        self.totals.remove(&unit)
    }

    pub fn sum(&self) -> f64 {
        self.totals.values().sum()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}
