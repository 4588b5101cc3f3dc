//! # Inventory Repository
//!
//! Database operations for stocked units (size/color variants).
//!
//! Quantity is mutated in two places only: manual edits through this
//! repository and the guarded decrement inside the checkout transaction.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use kade_core::{InventoryUnit, LOW_STOCK_THRESHOLD};

/// Repository for inventory database operations.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// Lists all inventory units.
    pub async fn list_all(&self) -> DbResult<Vec<InventoryUnit>> {
        let units = sqlx::query_as::<_, InventoryUnit>(
            r#"
            SELECT id, product_id, size, color, quantity,
                   buying_price_cents, retail_price_cents, wholesale_price_cents
            FROM inventory
            ORDER BY product_id, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(units)
    }

    /// Gets an inventory unit by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<InventoryUnit>> {
        let unit = sqlx::query_as::<_, InventoryUnit>(
            r#"
            SELECT id, product_id, size, color, quantity,
                   buying_price_cents, retail_price_cents, wholesale_price_cents
            FROM inventory
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(unit)
    }

    /// Inserts an inventory unit.
    pub async fn insert(&self, unit: &InventoryUnit) -> DbResult<()> {
        debug!(id = %unit.id, product_id = %unit.product_id, "Inserting inventory unit");

        sqlx::query(
            r#"
            INSERT INTO inventory (
                id, product_id, size, color, quantity,
                buying_price_cents, retail_price_cents, wholesale_price_cents
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&unit.id)
        .bind(&unit.product_id)
        .bind(&unit.size)
        .bind(&unit.color)
        .bind(unit.quantity)
        .bind(unit.buying_price_cents)
        .bind(unit.retail_price_cents)
        .bind(unit.wholesale_price_cents)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an inventory unit (variant fields, quantity, prices).
    pub async fn update(&self, unit: &InventoryUnit) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE inventory SET
                product_id = ?2, size = ?3, color = ?4, quantity = ?5,
                buying_price_cents = ?6, retail_price_cents = ?7,
                wholesale_price_cents = ?8
            WHERE id = ?1
            "#,
        )
        .bind(&unit.id)
        .bind(&unit.product_id)
        .bind(&unit.size)
        .bind(&unit.color)
        .bind(unit.quantity)
        .bind(unit.buying_price_cents)
        .bind(unit.retail_price_cents)
        .bind(unit.wholesale_price_cents)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Inventory unit", &unit.id));
        }

        Ok(())
    }

    /// Deletes an inventory unit.
    ///
    /// The owning product is kept even if this was its last unit; the
    /// catalog join simply stops offering it.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM inventory WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Inventory unit", id));
        }

        Ok(())
    }

    /// Counts units with quantity strictly below the low-stock threshold.
    pub async fn low_stock_count(&self) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM inventory WHERE quantity < ?1")
                .bind(LOW_STOCK_THRESHOLD)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Sum of on-hand quantity over all units.
    pub async fn total_units(&self) -> DbResult<i64> {
        let total: Option<i64> =
            sqlx::query_scalar("SELECT SUM(quantity) FROM inventory")
                .fetch_one(&self.pool)
                .await?;

        Ok(total.unwrap_or(0))
    }

    /// Counts all inventory units.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inventory")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
