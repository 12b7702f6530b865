//! Outbound commands issued to the engine

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::UnitId;

/// Order one unit to attack a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackCommand {
    pub target: UnitId,
}

/// Commands for one turn, keyed by controlled-unit id
///
/// Units with no entry keep executing their in-flight action.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandSet {
    pub commands: AHashMap<UnitId, AttackCommand>,
}

impl CommandSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attack(&mut self, unit: UnitId, target: UnitId) {
        self.commands.insert(unit, AttackCommand { target });
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }
}
