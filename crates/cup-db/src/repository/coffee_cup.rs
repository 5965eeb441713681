//! # Coffee Cup Repository
//!
//! Cup stock backed by the `coffee_cups` table.
//!
//! ## Allocation
//! ```text
//! BEGIN
//!   UPDATE coffee_cups SET reserved_at = now
//!    WHERE id IN (lowest `count` ids with reserved_at IS NULL)
//!   RETURNING id
//!   fewer rows than `count`? ──► ROLLBACK, InsufficientStock
//! COMMIT
//! ```
//! The reservation is one statement inside one transaction, so two
//! concurrent orders can never be handed the same cup, and a short stock
//! leaves every row untouched.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use cup_core::CoffeeCup;
use cup_order::{CoffeeCupRepository, RepositoryResult};

/// Repository for the cup stock.
#[derive(Debug, Clone)]
pub struct SqliteCoffeeCupRepository {
    pool: SqlitePool,
}

impl SqliteCoffeeCupRepository {
    /// Creates a new SqliteCoffeeCupRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteCoffeeCupRepository { pool }
    }

    /// Number of cups neither allocated nor sold.
    pub async fn count_in_stock(&self) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM coffee_cups WHERE reserved_at IS NULL")
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Number of cups ever stocked, whether in stock, allocated or sold.
    pub async fn count_all(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM coffee_cups")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Reserves exactly `count` cups, lowest ids first.
    ///
    /// ## Errors
    /// * `DbError::InvalidCount` - `count` is negative
    /// * `DbError::InsufficientStock` - fewer than `count` cups are free;
    ///   nothing is reserved
    pub async fn allocate(&self, count: i64) -> DbResult<Vec<CoffeeCup>> {
        if count < 0 {
            return Err(DbError::InvalidCount(count));
        }
        if count == 0 {
            return Ok(Vec::new());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let mut ids: Vec<i64> = sqlx::query_scalar(
            r#"
            UPDATE coffee_cups
            SET reserved_at = ?1
            WHERE id IN (
                SELECT id FROM coffee_cups
                WHERE reserved_at IS NULL
                ORDER BY id
                LIMIT ?2
            )
            RETURNING id
            "#,
        )
        .bind(Utc::now())
        .bind(count)
        .fetch_all(&mut *tx)
        .await?;

        let available = ids.len() as i64;
        if available < count {
            tx.rollback()
                .await
                .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
            debug!(requested = count, available, "Allocation rolled back");
            return Err(DbError::InsufficientStock {
                requested: count,
                available,
            });
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        // RETURNING makes no ordering promise
        ids.sort_unstable();
        debug!(count, "Cups allocated");
        Ok(ids.into_iter().map(CoffeeCup::new).collect())
    }

    /// Returns allocated cups to stock.
    ///
    /// Cups already linked to an order stay sold; cups already in stock
    /// are left as they are.
    pub async fn release(&self, cups: &[CoffeeCup]) -> DbResult<u64> {
        if cups.is_empty() {
            return Ok(0);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let mut released = 0;
        for cup in cups {
            let result = sqlx::query(
                "UPDATE coffee_cups SET reserved_at = NULL WHERE id = ?1 AND order_id IS NULL",
            )
            .bind(cup.id)
            .execute(&mut *tx)
            .await?;
            released += result.rows_affected();
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        debug!(requested = cups.len(), released, "Cups released");
        Ok(released)
    }

    /// Restocks `count` new cups and returns them.
    pub async fn add_coffee_cups(&self, count: u32) -> DbResult<Vec<CoffeeCup>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let now = Utc::now();
        let mut added = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let result = sqlx::query("INSERT INTO coffee_cups (created_at) VALUES (?1)")
                .bind(now)
                .execute(&mut *tx)
                .await?;
            added.push(CoffeeCup::new(result.last_insert_rowid()));
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(count, "Cups restocked");
        Ok(added)
    }
}

#[async_trait]
impl CoffeeCupRepository for SqliteCoffeeCupRepository {
    async fn get_coffee_cups_in_stock_count(&self) -> RepositoryResult<i64> {
        Ok(self.count_in_stock().await?)
    }

    async fn get_coffee_cups_in_stock(&self, count: i64) -> RepositoryResult<Vec<CoffeeCup>> {
        Ok(self.allocate(count).await?)
    }

    async fn release_coffee_cups(&self, cups: &[CoffeeCup]) -> RepositoryResult<()> {
        self.release(cups).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    async fn stocked(count: u32) -> SqliteCoffeeCupRepository {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.coffee_cups();
        repo.add_coffee_cups(count).await.unwrap();
        repo
    }

    fn ids(cups: &[CoffeeCup]) -> Vec<i64> {
        cups.iter().map(|c| c.id).collect()
    }

    #[tokio::test]
    async fn test_restock_counts_toward_stock() {
        let repo = stocked(0).await;
        assert_eq!(repo.count_in_stock().await.unwrap(), 0);

        let added = repo.add_coffee_cups(4).await.unwrap();
        assert_eq!(ids(&added), vec![1, 2, 3, 4]);
        assert_eq!(repo.count_in_stock().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_allocate_takes_lowest_ids() {
        let repo = stocked(5).await;

        let cups = repo.allocate(3).await.unwrap();

        assert_eq!(ids(&cups), vec![1, 2, 3]);
        assert_eq!(repo.count_in_stock().await.unwrap(), 2);

        let next = repo.allocate(2).await.unwrap();
        assert_eq!(ids(&next), vec![4, 5]);
        assert_eq!(repo.count_in_stock().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_short_stock_reserves_nothing() {
        let repo = stocked(2).await;

        let err = repo.allocate(3).await.unwrap_err();

        assert!(matches!(
            err,
            DbError::InsufficientStock {
                requested: 3,
                available: 2
            }
        ));
        assert_eq!(repo.count_in_stock().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_zero_and_negative_counts() {
        let repo = stocked(2).await;

        assert!(repo.allocate(0).await.unwrap().is_empty());
        assert!(matches!(
            repo.allocate(-1).await.unwrap_err(),
            DbError::InvalidCount(-1)
        ));
        assert_eq!(repo.count_in_stock().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_release_returns_cups_to_stock() {
        let repo = stocked(3).await;
        let cups = repo.allocate(3).await.unwrap();
        assert_eq!(repo.count_in_stock().await.unwrap(), 0);
        assert_eq!(repo.count_all().await.unwrap(), 3);

        let released = repo.release(&cups[..2]).await.unwrap();

        assert_eq!(released, 2);
        assert_eq!(repo.count_in_stock().await.unwrap(), 2);
        // Released cups come back first
        assert_eq!(ids(&repo.allocate(2).await.unwrap()), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_trait_errors_carry_db_error() {
        let repo = stocked(1).await;
        let stock: &dyn CoffeeCupRepository = &repo;

        let err = stock.get_coffee_cups_in_stock(2).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<DbError>(),
            Some(DbError::InsufficientStock { .. })
        ));
        assert_eq!(stock.get_coffee_cups_in_stock_count().await.unwrap(), 1);
    }
}
