//! Event logs for the previous turn
//!
//! The reward accountant and feature extractor are event-sourced from
//! these three logs rather than from absolute state, so they stay
//! well-defined even as units leave the roster mid-turn.

use serde::{Deserialize, Serialize};

use crate::core::types::{Side, UnitId};

/// One damage resolution from the previous turn
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DamageEvent {
    pub attacker: UnitId,
    pub defender: UnitId,
    pub amount: i32,
}

/// A unit death from the previous turn
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DeathEvent {
    pub side: Side,
    pub unit: UnitId,
}

/// Engine feedback on a command issued last turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandStatus {
    Complete,
    Incomplete,
    Failed,
}

/// A command issued to a unit last turn, with its feedback status
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CommandRecord {
    pub unit: UnitId,
    pub target: UnitId,
    pub status: CommandStatus,
}

/// Everything the engine reports about the previous turn
///
/// Absent entirely on the first turn of an episode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TurnRecord {
    pub damage: Vec<DamageEvent>,
    pub deaths: Vec<DeathEvent>,
    pub commands: Vec<CommandRecord>,
}

impl TurnRecord {
    /// Most recent recorded action of `unit`, if any
    pub fn command_of(&self, unit: UnitId) -> Option<&CommandRecord> {
        self.commands.iter().find(|c| c.unit == unit)
    }

    /// Number of recorded commands targeting `defender`
    pub fn attackers_of(&self, defender: UnitId) -> usize {
        self.commands.iter().filter(|c| c.target == defender).count()
    }
}
