//! # Order Repository
//!
//! Persists orders and marks their allocated cups as sold.
//!
//! ## Save
//! ```text
//! BEGIN
//!   INSERT INTO orders ...                  → new order id
//!   for each allocated cup:
//!     UPDATE coffee_cups SET order_id = id
//!      WHERE reserved_at IS NOT NULL AND order_id IS NULL
//!     no row? ──► ROLLBACK, NotFound
//! COMMIT
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use cup_core::{CoffeeCup, DiscountPercent, Order};
use cup_order::{OrderRepository, RepositoryResult};

/// Row shape of the `orders` table.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    customer_id: i64,
    number_of_ordered_cups: i64,
    discount_percent: i64,
    created_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, coffee_cups: Vec<CoffeeCup>) -> DbResult<Order> {
        let discount = u32::try_from(self.discount_percent)
            .ok()
            .and_then(|percent| DiscountPercent::new(percent).ok())
            .ok_or_else(|| {
                DbError::CorruptRow(format!(
                    "order {} has discount {}",
                    self.id, self.discount_percent
                ))
            })?;

        Ok(Order {
            id: Some(self.id),
            customer_id: self.customer_id,
            number_of_ordered_cups: self.number_of_ordered_cups,
            discount,
            coffee_cups,
            created_at: self.created_at,
        })
    }
}

/// Repository for persisted orders.
#[derive(Debug, Clone)]
pub struct SqliteOrderRepository {
    pool: SqlitePool,
}

impl SqliteOrderRepository {
    /// Creates a new SqliteOrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteOrderRepository { pool }
    }

    /// Inserts `order` and links its cups in one transaction.
    ///
    /// Every cup must be allocated and not yet sold, otherwise nothing is
    /// written and `DbError::NotFound` names the offending cup.
    pub async fn insert(&self, order: Order) -> DbResult<Order> {
        debug!(
            customer_id = order.customer_id,
            cups = order.coffee_cups.len(),
            "Inserting order"
        );

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let result = sqlx::query(
            r#"
            INSERT INTO orders (customer_id, number_of_ordered_cups, discount_percent, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(order.customer_id)
        .bind(order.number_of_ordered_cups)
        .bind(i64::from(order.discount.percent()))
        .bind(order.created_at)
        .execute(&mut *tx)
        .await?;

        let order_id = result.last_insert_rowid();

        for cup in &order.coffee_cups {
            let linked = sqlx::query(
                r#"
                UPDATE coffee_cups
                SET order_id = ?1
                WHERE id = ?2 AND reserved_at IS NOT NULL AND order_id IS NULL
                "#,
            )
            .bind(order_id)
            .bind(cup.id)
            .execute(&mut *tx)
            .await?;

            if linked.rows_affected() == 0 {
                // Dropping the transaction rolls it back
                return Err(DbError::not_found("Allocated coffee cup", cup.id));
            }
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        debug!(order_id, "Order inserted");
        Ok(Order {
            id: Some(order_id),
            ..order
        })
    }

    /// Loads an order with its cups, or `None` if the id is unknown.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Order>> {
        let row: Option<OrderRow> = sqlx::query_as(
            r#"
            SELECT id, customer_id, number_of_ordered_cups, discount_percent, created_at
            FROM orders
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let cup_ids: Vec<i64> =
            sqlx::query_scalar("SELECT id FROM coffee_cups WHERE order_id = ?1 ORDER BY id")
                .bind(id)
                .fetch_all(&self.pool)
                .await?;

        row.into_order(cup_ids.into_iter().map(CoffeeCup::new).collect())
            .map(Some)
    }

    /// Number of persisted orders.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl OrderRepository for SqliteOrderRepository {
    async fn save(&self, order: Order) -> RepositoryResult<Order> {
        Ok(self.insert(order).await?)
    }
}
