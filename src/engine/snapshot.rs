//! Per-turn state snapshot received from the engine

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{GridPos, Side, Turn, UnitId};

/// Observable state of a single live unit
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UnitState {
    pub side: Side,
    pub position: GridPos,
    pub hp: i32,
}

/// Engine state at the start of a turn
///
/// Only live units appear; a lookup miss means the referenced unit died
/// since the id was captured.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub turn: Turn,
    pub units: AHashMap<UnitId, UnitState>,
}

impl Snapshot {
    /// Look up a live unit; `None` signals a stale reference
    pub fn unit(&self, id: UnitId) -> Option<&UnitState> {
        self.units.get(&id)
    }

    /// Live unit ids on one side, in ascending id order
    ///
    /// Sorted so roster construction is deterministic regardless of map
    /// iteration order.
    pub fn side_units(&self, side: Side) -> Vec<UnitId> {
        let mut ids: Vec<UnitId> = self
            .units
            .iter()
            .filter(|(_, u)| u.side == side)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_by_key(|id| id.0);
        ids
    }
}
