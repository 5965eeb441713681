//! # cup-order: Order Creation Service
//!
//! Turns a (customer, number of cups) request into a persisted order, or a
//! `StockExceeded` outcome when there aren't enough cups.
//!
//! ## Module Organization
//!
//! - [`repository`] - Collaborator traits (order store, cup stock)
//! - [`service`] - [`OrderCreationService`] and its builder
//! - [`memory`] - In-memory collaborators
//! - [`error`] - [`OrderError`]
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use cup_core::{Customer, CustomerMembership};
//! use cup_order::memory::{InMemoryCoffeeCupRepository, InMemoryOrderRepository};
//! use cup_order::OrderCreationService;
//!
//! # tokio_test_block(async {
//! let service = OrderCreationService::new(
//!     Arc::new(InMemoryOrderRepository::new()),
//!     Arc::new(InMemoryCoffeeCupRepository::with_stock(10)),
//! );
//!
//! let customer = Customer::new(99, CustomerMembership::Basic);
//! let result = service.create_order(Some(&customer), 3).await.unwrap();
//! assert_eq!(result.remaining_cups_in_stock, 7);
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f);
//! # }
//! ```

pub mod error;
pub mod memory;
pub mod repository;
pub mod service;

pub use error::{OrderError, OrderResult};
pub use repository::{CoffeeCupRepository, OrderRepository, RepositoryError, RepositoryResult};
pub use service::{OrderCreationService, OrderCreationServiceBuilder};
