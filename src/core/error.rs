use thiserror::Error;

use crate::core::types::{EntityId, Position};

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Entity not found: {0:?}")]
    EntityNotFound(EntityId),

    #[error("Position out of bounds: {0}")]
    OutOfBounds(Position),

    #[error("Decision unavailable: {0}")]
    DecisionUnavailable(String),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
