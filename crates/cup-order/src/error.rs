//! # Order Error Types
//!
//! ```text
//! create_order(..)
//!      │
//!      ├── bad input ─────────────► OrderError::Validation
//!      │
//!      ├── collaborator failed ───► OrderError::Repository (unchanged)
//!      │
//!      └── not enough stock ──────► Ok(StockExceeded)   ← not an error
//! ```

use thiserror::Error;

use crate::repository::RepositoryError;
use cup_core::ValidationError;

/// Errors returned by the order creation service.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Invalid argument or out-of-range value. Nothing was touched.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Failure reported by the order store or the cup stock.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl OrderError {
    /// Returns the validation failure, if this is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            OrderError::Validation(err) => Some(err),
            OrderError::Repository(_) => None,
        }
    }

    /// Returns the collaborator failure, if this is one.
    pub fn as_repository(&self) -> Option<&RepositoryError> {
        match self {
            OrderError::Repository(err) => Some(err),
            OrderError::Validation(_) => None,
        }
    }
}

/// Result type for order operations.
pub type OrderResult<T> = Result<T, OrderError>;
