//! # cup-core: Pure Business Logic for Cup Ordering
//!
//! This crate holds the domain types and the rules that decide how an order
//! is priced and validated. It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Cup Order Admin Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    cup-admin (CLI)                              │   │
//! │  │        order ──► quote ──► stock ──► restock                    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              cup-order (OrderCreationService)                   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ cup-core (THIS CRATE) ★                         │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ discount  │  │validation │  │   error   │  │   │
//! │  │   │ Customer  │  │  tiered   │  │ customer  │  │ CoreError │  │   │
//! │  │   │  Order    │  │  table    │  │ quantity  │  │ Validation│  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Customer, Order, CoffeeCup, outcomes)
//! - [`discount`] - Membership-based discount table
//! - [`validation`] - Input validation for order requests
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use cup_core::discount::calculate_discount_percentage;
//! use cup_core::CustomerMembership;
//!
//! let discount = calculate_discount_percentage(CustomerMembership::Premium, 5);
//! assert_eq!(discount.percent(), 8);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod discount;
pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use discount::calculate_discount_percentage;
pub use error::{CoreError, CoreResult, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Smallest number of cups a single order may request.
pub const MIN_ORDERED_CUPS: i64 = 1;

/// Number of cups from which the bulk discount tier applies.
///
/// ## Business Reason
/// Orders of five cups or more are treated as bulk orders and earn the
/// higher rate for the customer's membership tier.
pub const BULK_ORDER_THRESHOLD: i64 = 5;
