//! # cup-db: Database Layer for Cup Ordering
//!
//! SQLite storage for orders and coffee cups, exposed through the
//! collaborator traits of `cup-order`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cup Order Data Flow                              │
//! │                                                                         │
//! │  OrderCreationService                                                  │
//! │       │  Arc<dyn OrderRepository>  /  Arc<dyn CoffeeCupRepository>     │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     cup-db (THIS CRATE)                         │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌──────────────────────┐  ┌──────────┐  │   │
//! │  │   │   Database    │    │    Repositories      │  │Migrations│  │   │
//! │  │   │   (pool.rs)   │◄───│ SqliteOrderRepo      │  │(embedded)│  │   │
//! │  │   │   SqlitePool  │    │ SqliteCoffeeCupRepo  │  │          │  │   │
//! │  │   └───────────────┘    └──────────────────────┘  └──────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (WAL)                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cup_db::{Database, DbConfig};
//! use cup_order::OrderCreationService;
//!
//! let db = Database::new(DbConfig::new("cups.db")).await?;
//! db.coffee_cups().add_coffee_cups(10).await?;
//!
//! let service = OrderCreationService::new(
//!     Arc::new(db.orders()),
//!     Arc::new(db.coffee_cups()),
//! );
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::coffee_cup::SqliteCoffeeCupRepository;
pub use repository::order::SqliteOrderRepository;
