//! Allocator-specific error types

use thiserror::Error;
use shared::{AllocationMode, SharedError};

#[derive(Error, Debug)]
pub enum AllocatorError {
    #[error("Unknown engine: {engine_id}")]
    UnknownEngine { engine_id: String },

    #[error("Engine budgets can only be set in manual mode (current mode: {mode})")]
    ManualModeRequired { mode: AllocationMode },

    #[error("Engine {engine_id} is disabled and cannot receive budget")]
    EngineDisabled { engine_id: String },

    #[error("Duplicate engine: {engine_id}")]
    DuplicateEngine { engine_id: String },

    #[error("Configuration error: {0}")]
    SharedError(#[from] SharedError),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl AllocatorError {
    pub fn unknown_engine(engine_id: impl std::fmt::Display) -> Self {
        Self::UnknownEngine { engine_id: engine_id.to_string() }
    }
}

pub type AllocatorResult<T> = Result<T, AllocatorError>;
