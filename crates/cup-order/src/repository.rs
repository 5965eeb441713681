//! # Collaborator Contracts
//!
//! The order creation service never talks to storage directly. It depends on
//! two traits supplied at construction.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Collaborators                                      │
//! │                                                                         │
//! │  OrderRepository (order store)                                         │
//! │  └── save(order) → persisted order (may carry a store-assigned id)     │
//! │                                                                         │
//! │  CoffeeCupRepository (cup stock)                                       │
//! │  ├── get_coffee_cups_in_stock_count() → available cups                 │
//! │  ├── get_coffee_cups_in_stock(n)      → exactly n cups, or an error    │
//! │  └── release_coffee_cups(cups)        → put allocated cups back        │
//! │                                                                         │
//! │  Implementations: cup-db (SQLite), memory.rs (in-process)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stock Consistency
//! The service checks the count and then allocates. It does not hold a lock
//! in between, so `get_coffee_cups_in_stock(n)` must allocate all `n` cups
//! atomically or fail without allocating any.
//!
//! Under contention the count can pass while allocation fails. The losing
//! order then gets `OrderError::Repository` wrapping the stock's own
//! shortage error, not a `StockExceeded` result.

use async_trait::async_trait;
use std::error::Error;
use std::fmt;

use cup_core::{CoffeeCup, Order};

// =============================================================================
// Repository Error
// =============================================================================

/// A failure reported by a collaborator.
///
/// Wraps the backend's own error without altering it. Use
/// [`downcast_ref`](RepositoryError::downcast_ref) to get it back.
pub struct RepositoryError {
    inner: Box<dyn Error + Send + Sync + 'static>,
}

impl RepositoryError {
    /// Wraps a backend error.
    pub fn new<E>(err: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        RepositoryError {
            inner: Box::new(err),
        }
    }

    /// Creates an error from a plain message.
    pub fn msg(message: impl Into<String>) -> Self {
        let message: String = message.into();
        RepositoryError {
            inner: message.into(),
        }
    }

    /// Returns the backend error if it is of type `E`.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: Error + 'static,
    {
        self.inner.downcast_ref::<E>()
    }

    /// Consumes the wrapper and returns the backend error.
    pub fn into_inner(self) -> Box<dyn Error + Send + Sync + 'static> {
        self.inner
    }
}

impl fmt::Debug for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl Error for RepositoryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.inner.source()
    }
}

/// Result type for collaborator operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

// =============================================================================
// Traits
// =============================================================================

/// Persists finished orders.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persists an order and returns the stored copy.
    ///
    /// The returned order may differ from the input (e.g. `id` assigned).
    async fn save(&self, order: Order) -> RepositoryResult<Order>;
}

/// Reports and allocates cups in stock.
#[async_trait]
pub trait CoffeeCupRepository: Send + Sync {
    /// Number of cups currently available.
    async fn get_coffee_cups_in_stock_count(&self) -> RepositoryResult<i64>;

    /// Allocates `count` cups. All or nothing.
    async fn get_coffee_cups_in_stock(&self, count: i64) -> RepositoryResult<Vec<CoffeeCup>>;

    /// Returns previously allocated cups to stock.
    async fn release_coffee_cups(&self, cups: &[CoffeeCup]) -> RepositoryResult<()>;
}
