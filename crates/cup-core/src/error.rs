//! # Error Types
//!
//! Domain-specific error types for cup-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cup-core errors (this file)                                           │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Invalid argument / out of range                │
//! │                                                                         │
//! │  cup-order errors                                                      │
//! │  └── OrderError       - Validation or collaborator failure             │
//! │                                                                         │
//! │  cup-db errors                                                         │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Flow: ValidationError → OrderError ← RepositoryError ← DbError        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Running out of stock is NOT an error. It is reported as
//! [`OrderCreationResultCode::StockExceeded`](crate::OrderCreationResultCode).

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A discount percentage outside 0..=100 was supplied.
    #[error("Invalid discount: {percent}% is not between 0 and 100")]
    InvalidDiscount { percent: u32 },

    /// Membership name that doesn't match any tier.
    #[error("Unknown membership: '{0}'. Valid options: basic, premium")]
    UnknownMembership(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Each variant names the offending parameter so callers can report which
/// argument was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required argument is missing.
    ///
    /// ## When This Occurs
    /// - `create_order` called without a customer
    /// - Service built without one of its repositories
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric argument is out of range.
    ///
    /// ## When This Occurs
    /// - Ordering zero or a negative number of cups
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },
}

impl ValidationError {
    /// Creates a Required error for the given parameter.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Creates an OutOfRange error for the given parameter.
    pub fn out_of_range(field: impl Into<String>, min: i64, max: i64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
        }
    }

    /// Returns the name of the rejected parameter.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field } | ValidationError::OutOfRange { field, .. } => {
                field
            }
        }
    }

    /// True for a missing argument.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, ValidationError::Required { .. })
    }

    /// True for an argument outside its allowed range.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, ValidationError::OutOfRange { .. })
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
