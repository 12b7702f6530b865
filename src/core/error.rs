use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("weight file holds {found} values, expected {expected}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("death event for unit {unit:?} matches neither roster")]
    RosterDesync { unit: crate::core::types::UnitId },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("malformed weight entry: {0}")]
    WeightParse(#[from] std::num::ParseFloatError),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, AgentError>;
