//! # Discount Module
//!
//! Membership-based discount table for cup orders.
//!
//! ## Discount Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Discount by Tier                                  │
//! │                                                                         │
//! │   Membership     1 ─ 4 cups       5+ cups (bulk)                        │
//! │   ──────────     ──────────       ──────────────                        │
//! │   Basic              0%                 3%                              │
//! │   Premium            5%                 8%                              │
//! │                                                                         │
//! │   Bulk threshold: BULK_ORDER_THRESHOLD (5 cups)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The lookup is total: every membership/quantity pair maps to a rate.

use crate::types::{CustomerMembership, DiscountPercent};
use crate::BULK_ORDER_THRESHOLD;

const BASIC_STANDARD: DiscountPercent = DiscountPercent::from_table(0);
const BASIC_BULK: DiscountPercent = DiscountPercent::from_table(3);
const PREMIUM_STANDARD: DiscountPercent = DiscountPercent::from_table(5);
const PREMIUM_BULK: DiscountPercent = DiscountPercent::from_table(8);

/// Calculates the discount for an order.
///
/// ## Rules
/// - Basic: 0% below the bulk threshold, 3% from it
/// - Premium: 5% below the bulk threshold, 8% from it
///
/// Quantities below one are never passed in by the order service; they fall
/// into the standard rate here.
///
/// ## Example
/// ```rust
/// use cup_core::discount::calculate_discount_percentage;
/// use cup_core::CustomerMembership;
///
/// assert_eq!(calculate_discount_percentage(CustomerMembership::Basic, 4).percent(), 0);
/// assert_eq!(calculate_discount_percentage(CustomerMembership::Basic, 5).percent(), 3);
/// ```
pub fn calculate_discount_percentage(
    membership: CustomerMembership,
    number_of_ordered_cups: i64,
) -> DiscountPercent {
    let bulk = number_of_ordered_cups >= BULK_ORDER_THRESHOLD;

    match (membership, bulk) {
        (CustomerMembership::Basic, false) => BASIC_STANDARD,
        (CustomerMembership::Basic, true) => BASIC_BULK,
        (CustomerMembership::Premium, false) => PREMIUM_STANDARD,
        (CustomerMembership::Premium, true) => PREMIUM_BULK,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
