//! # In-Memory Collaborators
//!
//! Process-local implementations of the collaborator traits. Useful for tests
//! and for running the service without a database.
//!
//! ## Thread Safety
//! Each repository keeps its state behind a `tokio::sync::Mutex`. Allocation
//! checks and takes cups inside one critical section, so two concurrent
//! orders can never both get the last cup.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

use crate::repository::{CoffeeCupRepository, OrderRepository, RepositoryError, RepositoryResult};
use cup_core::{CoffeeCup, Order};

/// Failures of the in-memory stock.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryStockError {
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: i64, available: i64 },

    #[error("Invalid cup count: {0}")]
    InvalidCount(i64),
}

// =============================================================================
// Order Repository
// =============================================================================

#[derive(Debug)]
struct OrderLedger {
    next_id: i64,
    orders: Vec<Order>,
}

/// Keeps saved orders in a vector and assigns ids 1, 2, 3, ...
#[derive(Debug)]
pub struct InMemoryOrderRepository {
    ledger: Mutex<OrderLedger>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        InMemoryOrderRepository {
            ledger: Mutex::new(OrderLedger {
                next_id: 1,
                orders: Vec::new(),
            }),
        }
    }

    /// Snapshot of all saved orders, in save order.
    pub async fn orders(&self) -> Vec<Order> {
        self.ledger.lock().await.orders.clone()
    }

    /// Number of saved orders.
    pub async fn len(&self) -> usize {
        self.ledger.lock().await.orders.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryOrderRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn save(&self, mut order: Order) -> RepositoryResult<Order> {
        let mut ledger = self.ledger.lock().await;

        order.id = Some(ledger.next_id);
        ledger.next_id += 1;
        ledger.orders.push(order.clone());

        debug!(order_id = ?order.id, "Order saved in memory");
        Ok(order)
    }
}

// =============================================================================
// Coffee Cup Repository
// =============================================================================

#[derive(Debug)]
struct CupShelf {
    next_id: i64,
    available: Vec<CoffeeCup>,
}

/// Cups on a shelf. Allocation takes from the front (lowest ids first).
#[derive(Debug)]
pub struct InMemoryCoffeeCupRepository {
    shelf: Mutex<CupShelf>,
}

impl InMemoryCoffeeCupRepository {
    /// Creates an empty stock.
    pub fn new() -> Self {
        Self::with_stock(0)
    }

    /// Creates a stock of `count` cups with ids `1..=count`.
    pub fn with_stock(count: u32) -> Self {
        let available = (1..=i64::from(count)).map(CoffeeCup::new).collect();
        InMemoryCoffeeCupRepository {
            shelf: Mutex::new(CupShelf {
                next_id: i64::from(count) + 1,
                available,
            }),
        }
    }

    /// Adds `count` new cups to the stock.
    pub async fn add_coffee_cups(&self, count: u32) {
        let mut shelf = self.shelf.lock().await;
        for _ in 0..count {
            let cup = CoffeeCup::new(shelf.next_id);
            shelf.next_id += 1;
            shelf.available.push(cup);
        }
    }
}

impl Default for InMemoryCoffeeCupRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CoffeeCupRepository for InMemoryCoffeeCupRepository {
    async fn get_coffee_cups_in_stock_count(&self) -> RepositoryResult<i64> {
        Ok(self.shelf.lock().await.available.len() as i64)
    }

    async fn get_coffee_cups_in_stock(&self, count: i64) -> RepositoryResult<Vec<CoffeeCup>> {
        if count < 0 {
            return Err(RepositoryError::new(MemoryStockError::InvalidCount(count)));
        }

        let mut shelf = self.shelf.lock().await;
        let available = shelf.available.len() as i64;

        if count > available {
            return Err(RepositoryError::new(MemoryStockError::InsufficientStock {
                requested: count,
                available,
            }));
        }

        let cups: Vec<CoffeeCup> = shelf.available.drain(..count as usize).collect();
        debug!(allocated = cups.len(), remaining = shelf.available.len(), "Cups allocated");
        Ok(cups)
    }

    async fn release_coffee_cups(&self, cups: &[CoffeeCup]) -> RepositoryResult<()> {
        let mut shelf = self.shelf.lock().await;

        for cup in cups {
            if !shelf.available.contains(cup) {
                shelf.available.push(*cup);
            }
        }
        shelf.available.sort_by_key(|cup| cup.id);

        debug!(released = cups.len(), "Cups returned to stock");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
