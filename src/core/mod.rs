//! Core types, configuration, and error definitions

pub mod config;
pub mod error;
pub mod types;
