//! # Domain Types
//!
//! Core domain types used throughout cup ordering.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Customer     │   │      Order      │   │   CoffeeCup     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id (store)     │   │  id (opaque)    │       │
//! │  │  membership     │   │  customer_id    │   └─────────────────┘       │
//! │  └─────────────────┘   │  cups + count   │                              │
//! │                        │  discount       │                              │
//! │  ┌─────────────────┐   └─────────────────┘   ┌─────────────────────┐   │
//! │  │ DiscountPercent │                         │ OrderCreationResult │   │
//! │  │  0..=100        │                         │  result_code        │   │
//! │  └─────────────────┘                         │  created_order?     │   │
//! │                                              │  remaining stock    │   │
//! │                                              └─────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

// =============================================================================
// Customer Membership
// =============================================================================

/// Membership tier of a customer. Governs the discount rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerMembership {
    /// Regular customer.
    #[default]
    Basic,
    /// Paying member with a higher discount.
    Premium,
}

impl fmt::Display for CustomerMembership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomerMembership::Basic => write!(f, "basic"),
            CustomerMembership::Premium => write!(f, "premium"),
        }
    }
}

impl std::str::FromStr for CustomerMembership {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(CustomerMembership::Basic),
            "premium" => Ok(CustomerMembership::Premium),
            other => Err(CoreError::UnknownMembership(other.to_string())),
        }
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A customer placing an order. Owned by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    #[serde(default)]
    pub membership: CustomerMembership,
}

impl Customer {
    pub fn new(id: i64, membership: CustomerMembership) -> Self {
        Customer { id, membership }
    }
}

// =============================================================================
// Discount Percent
// =============================================================================

/// Whole-number discount percentage in the range 0..=100.
///
/// Stored as a newtype so a discount can never be confused with a cup count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct DiscountPercent(u8);

impl DiscountPercent {
    /// Largest allowed percentage.
    pub const MAX: u32 = 100;

    /// Creates a discount, rejecting values above 100.
    pub fn new(percent: u32) -> Result<Self, CoreError> {
        if percent > Self::MAX {
            return Err(CoreError::InvalidDiscount { percent });
        }
        Ok(DiscountPercent(percent as u8))
    }

    /// Builds a discount from a table constant known to be in range.
    pub(crate) const fn from_table(percent: u8) -> Self {
        DiscountPercent(percent)
    }

    /// No discount.
    #[inline]
    pub const fn zero() -> Self {
        DiscountPercent(0)
    }

    /// Returns the percentage.
    #[inline]
    pub const fn percent(&self) -> u32 {
        self.0 as u32
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for DiscountPercent {
    fn default() -> Self {
        DiscountPercent::zero()
    }
}

impl TryFrom<u32> for DiscountPercent {
    type Error = CoreError;

    fn try_from(percent: u32) -> Result<Self, Self::Error> {
        DiscountPercent::new(percent)
    }
}

impl From<DiscountPercent> for u32 {
    fn from(discount: DiscountPercent) -> Self {
        discount.percent()
    }
}

impl fmt::Display for DiscountPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

// =============================================================================
// Coffee Cup
// =============================================================================

/// A single cup allocated from stock. Only its identity matters here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoffeeCup {
    pub id: i64,
}

impl CoffeeCup {
    pub fn new(id: i64) -> Self {
        CoffeeCup { id }
    }
}

// =============================================================================
// Order
// =============================================================================

/// An order for a number of coffee cups.
///
/// Built once per successful order creation and handed to the order store,
/// which returns the persisted copy (with `id` assigned).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Identifier assigned by the order store. `None` until persisted.
    pub id: Option<i64>,

    /// Customer who placed the order.
    pub customer_id: i64,

    /// Number of cups ordered.
    pub number_of_ordered_cups: i64,

    /// Discount applied to this order.
    pub discount: DiscountPercent,

    /// Cups allocated from stock for this order.
    pub coffee_cups: Vec<CoffeeCup>,

    /// When the order was created.
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Creates a new, not yet persisted order.
    pub fn new(
        customer_id: i64,
        number_of_ordered_cups: i64,
        discount: DiscountPercent,
        coffee_cups: Vec<CoffeeCup>,
    ) -> Self {
        Order {
            id: None,
            customer_id,
            number_of_ordered_cups,
            discount,
            coffee_cups,
            created_at: Utc::now(),
        }
    }

    /// True once the order store has assigned an id.
    #[inline]
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

// =============================================================================
// Order Creation Outcome
// =============================================================================

/// Result code of an order creation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderCreationResultCode {
    /// The order was created and persisted.
    Success,
    /// More cups were requested than are in stock. Nothing was changed.
    StockExceeded,
}

/// Structured outcome of `create_order`.
///
/// ## Remaining Stock
/// - `Success`: stock before allocation minus the cups just taken
/// - `StockExceeded`: stock as it was checked (unchanged)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCreationResult {
    pub result_code: OrderCreationResultCode,
    pub created_order: Option<Order>,
    pub remaining_cups_in_stock: i64,
}

impl OrderCreationResult {
    /// Outcome for a persisted order.
    pub fn success(created_order: Order, remaining_cups_in_stock: i64) -> Self {
        OrderCreationResult {
            result_code: OrderCreationResultCode::Success,
            created_order: Some(created_order),
            remaining_cups_in_stock,
        }
    }

    /// Outcome for a request larger than the current stock.
    pub fn stock_exceeded(cups_in_stock: i64) -> Self {
        OrderCreationResult {
            result_code: OrderCreationResultCode::StockExceeded,
            created_order: None,
            remaining_cups_in_stock: cups_in_stock,
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        self.result_code == OrderCreationResultCode::Success
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_parsing() {
        assert_eq!(
            "basic".parse::<CustomerMembership>().unwrap(),
            CustomerMembership::Basic
        );
        assert_eq!(
            " Premium ".parse::<CustomerMembership>().unwrap(),
            CustomerMembership::Premium
        );
        assert!("gold".parse::<CustomerMembership>().is_err());
    }

    #[test]
    fn test_membership_default_and_display() {
        assert_eq!(CustomerMembership::default(), CustomerMembership::Basic);
        assert_eq!(CustomerMembership::Premium.to_string(), "premium");
    }

    #[test]
    fn test_discount_bounds() {
        assert_eq!(DiscountPercent::new(8).unwrap().percent(), 8);
        assert_eq!(DiscountPercent::new(100).unwrap().percent(), 100);
        assert!(matches!(
            DiscountPercent::new(101),
            Err(CoreError::InvalidDiscount { percent: 101 })
        ));
        assert!(DiscountPercent::default().is_zero());
        assert_eq!(DiscountPercent::new(3).unwrap().to_string(), "3%");
    }

    #[test]
    fn test_discount_serializes_as_number() {
        let json = serde_json::to_string(&DiscountPercent::new(5).unwrap()).unwrap();
        assert_eq!(json, "5");

        let parsed: DiscountPercent = serde_json::from_str("8").unwrap();
        assert_eq!(parsed.percent(), 8);

        assert!(serde_json::from_str::<DiscountPercent>("250").is_err());
    }

    #[test]
    fn test_new_order_is_not_persisted() {
        let order = Order::new(
            99,
            2,
            DiscountPercent::zero(),
            vec![CoffeeCup::new(1), CoffeeCup::new(2)],
        );
        assert!(!order.is_persisted());
        assert_eq!(order.customer_id, 99);
        assert_eq!(order.coffee_cups.len(), 2);
    }

    #[test]
    fn test_outcome_constructors() {
        let order = Order::new(1, 1, DiscountPercent::zero(), vec![CoffeeCup::new(7)]);
        let ok = OrderCreationResult::success(order, 9);
        assert!(ok.is_success());
        assert!(ok.created_order.is_some());
        assert_eq!(ok.remaining_cups_in_stock, 9);

        let exceeded = OrderCreationResult::stock_exceeded(10);
        assert!(!exceeded.is_success());
        assert_eq!(exceeded.result_code, OrderCreationResultCode::StockExceeded);
        assert!(exceeded.created_order.is_none());
        assert_eq!(exceeded.remaining_cups_in_stock, 10);
    }

    #[test]
    fn test_result_code_json() {
        let json = serde_json::to_string(&OrderCreationResultCode::StockExceeded).unwrap();
        assert_eq!(json, "\"stock_exceeded\"");
    }
}
