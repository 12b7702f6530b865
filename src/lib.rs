//! Skirmish Agent - Online Q-Learning Targeting Controller
//!
//! Decides, turn by turn, which enemy unit each controlled combat unit
//! should attack, and learns the attack-selection policy online via
//! linear-function-approximation Q-learning.

pub mod agent;
pub mod core;
pub mod engine;
