//! Errors surfaced by the admin binary.

use cup_core::{CoreError, ValidationError};
use cup_db::DbError;
use cup_order::OrderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdminError {
    /// Bad command line.
    #[error("{0}")]
    Usage(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to save configuration: {0}")]
    ConfigSaveFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Failed to render output: {0}")]
    Json(#[from] serde_json::Error),
}

impl AdminError {
    pub fn usage(message: impl Into<String>) -> Self {
        AdminError::Usage(message.into())
    }

    /// Process exit status: 2 for usage mistakes, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self {
            AdminError::Usage(_) => 2,
            _ => 1,
        }
    }
}

pub type AdminResult<T> = Result<T, AdminError>;
