//! # Repository Module
//!
//! SQLite implementations of the order service's collaborators.
//!
//! ```text
//! OrderCreationService
//!   ├── Arc<dyn OrderRepository>      ──► SqliteOrderRepository
//!   │                                      orders + links allocated cups
//!   └── Arc<dyn CoffeeCupRepository>  ──► SqliteCoffeeCupRepository
//!                                          count / allocate / release
//! ```
//!
//! Both repositories also expose inherent methods returning [`DbResult`]
//! for callers that want database errors directly (`get_by_id`, `count`,
//! `add_coffee_cups`).
//!
//! [`DbResult`]: crate::DbResult

pub mod coffee_cup;
pub mod order;
