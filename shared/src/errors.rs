//! Shared error types for configuration and parsing

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SharedError {
    #[error("Invalid engine entry '{input}': {reason}")]
    InvalidEngineEntry { input: String, reason: String },

    #[error("Unknown allocation mode: {input}")]
    UnknownMode { input: String },

    #[error("Invalid availability value: {input}")]
    InvalidAvailability { input: String },

    #[error("Duplicate engine id: {id}")]
    DuplicateEngineId { id: String },

    #[error("Invalid configuration: {field} = {value}")]
    InvalidConfig { field: String, value: String },
}

pub type SharedResult<T> = Result<T, SharedError>;
