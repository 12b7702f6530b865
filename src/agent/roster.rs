//! Live unit rosters, one per side
//!
//! Kept as plain vectors in first-seen order: the greedy tie-break in
//! target selection relies on stable iteration, and rosters stay small
//! enough that linear membership checks win over anything fancier.

use crate::core::error::{AgentError, Result};
use crate::core::types::{Side, UnitId};
use crate::engine::history::TurnRecord;
use crate::engine::snapshot::Snapshot;

#[derive(Debug, Clone, Default)]
pub struct Roster {
    pub controlled: Vec<UnitId>,
    pub opposing: Vec<UnitId>,
}

impl Roster {
    /// Build both rosters from an episode-start snapshot
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            controlled: snapshot.side_units(Side::Controlled),
            opposing: snapshot.side_units(Side::Opposing),
        }
    }

    pub fn is_controlled(&self, unit: UnitId) -> bool {
        self.controlled.contains(&unit)
    }

    pub fn is_opposing(&self, unit: UnitId) -> bool {
        self.opposing.contains(&unit)
    }

    /// Remove units reported dead last turn, returning the controlled
    /// units that fell.
    ///
    /// A death whose side matches neither roster means our bookkeeping
    /// has diverged from engine truth; that is unrecoverable.
    pub fn prune_deaths(&mut self, record: &TurnRecord) -> Result<Vec<UnitId>> {
        let mut fallen = Vec::new();
        for death in &record.deaths {
            match death.side {
                Side::Controlled if self.is_controlled(death.unit) => {
                    self.controlled.retain(|u| *u != death.unit);
                    fallen.push(death.unit);
                }
                Side::Opposing if self.is_opposing(death.unit) => {
                    self.opposing.retain(|u| *u != death.unit);
                }
                _ => return Err(AgentError::RosterDesync { unit: death.unit }),
            }
        }
        Ok(fallen)
    }
}
