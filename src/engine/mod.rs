//! Engine boundary - the data exchanged with the simulation engine
//!
//! The agent never owns simulation truth. Each turn it receives a state
//! snapshot plus a view of the previous turn's events, and returns a set
//! of attack commands. `sim` is a small built-in engine for headless
//! training runs and tests.

pub mod command;
pub mod history;
pub mod sim;
pub mod snapshot;

pub use command::{AttackCommand, CommandSet};
pub use history::{CommandRecord, CommandStatus, DamageEvent, DeathEvent, TurnRecord};
pub use sim::{SkirmishSim, SimConfig};
pub use snapshot::{Snapshot, UnitState};
