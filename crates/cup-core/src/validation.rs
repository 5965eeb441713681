//! # Validation Module
//!
//! Input validation for order requests.
//!
//! ## Order of Checks
//! ```text
//! create_order(customer, number_of_ordered_cups)
//!      │
//!      ├── customer missing?      → Required { field: "customer" }
//!      │
//!      ├── cups < 1?              → OutOfRange { field: "number_of_ordered_cups" }
//!      │
//!      └── OK → stock check (collaborators are only touched from here on)
//! ```

use crate::error::ValidationError;
use crate::types::Customer;
use crate::MIN_ORDERED_CUPS;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Parameter name reported for a missing customer.
pub const CUSTOMER_FIELD: &str = "customer";

/// Parameter name reported for a bad cup count.
pub const NUMBER_OF_ORDERED_CUPS_FIELD: &str = "number_of_ordered_cups";

/// Ensures a customer was supplied and hands it back.
pub fn validate_customer(customer: Option<&Customer>) -> ValidationResult<&Customer> {
    customer.ok_or_else(|| ValidationError::required(CUSTOMER_FIELD))
}

/// Validates the number of cups in an order.
///
/// ## Rules
/// - Must be at least [`MIN_ORDERED_CUPS`] (1)
/// - No upper bound here; stock decides whether the order goes through
///
/// ## Example
/// ```rust
/// use cup_core::validation::validate_number_of_ordered_cups;
///
/// assert!(validate_number_of_ordered_cups(1).is_ok());
/// assert!(validate_number_of_ordered_cups(0).is_err());
/// ```
pub fn validate_number_of_ordered_cups(number_of_ordered_cups: i64) -> ValidationResult<()> {
    if number_of_ordered_cups < MIN_ORDERED_CUPS {
        return Err(ValidationError::out_of_range(
            NUMBER_OF_ORDERED_CUPS_FIELD,
            MIN_ORDERED_CUPS,
            i64::MAX,
        ));
    }

    Ok(())
}

/// Runs both request checks in the order the service applies them.
pub fn validate_order_request(
    customer: Option<&Customer>,
    number_of_ordered_cups: i64,
) -> ValidationResult<&Customer> {
    let customer = validate_customer(customer)?;
    validate_number_of_ordered_cups(number_of_ordered_cups)?;
    Ok(customer)
}

// =============================================================================
// Unit Tests
// =============================================================================
