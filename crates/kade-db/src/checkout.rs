//! # Checkout Transaction
//!
//! The one multi-table write in the system: committing a sale.
//!
//! ## Atomicity
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Checkout Transaction                               │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    │                                                                    │
//! │    ├── INSERT INTO sales          (the sale row)                        │
//! │    ├── INSERT INTO sale_items     (one row per cart line, positional)   │
//! │    │                                                                    │
//! │    └── per line:                                                        │
//! │        UPDATE inventory                                                 │
//! │           SET quantity = quantity - :qty                                │
//! │         WHERE id = :unit AND quantity >= :qty                           │
//! │              │                                                          │
//! │              ├── 1 row  → next line                                     │
//! │              └── 0 rows → ROLLBACK (stock drained or unit deleted)      │
//! │    │                                                                    │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Either the sale exists AND stock is decremented, or neither.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `quantity >= :qty` guard re-checks stock inside the transaction, so a
//! cart built against stale data fails the checkout instead of driving a
//! unit's quantity negative.

use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use kade_core::SaleRecord;

/// Repository wrapping the atomic checkout transaction.
#[derive(Debug, Clone)]
pub struct CheckoutRepository {
    pool: SqlitePool,
}

impl CheckoutRepository {
    /// Creates a new CheckoutRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CheckoutRepository { pool }
    }

    /// Commits a sale: inserts the sale row and item snapshot, and
    /// decrements stock for every line, all in one transaction.
    ///
    /// ## Errors
    /// - [`DbError::InsufficientStock`] - a line requested more than the
    ///   unit's current quantity; nothing is written
    /// - [`DbError::NotFound`] - a line's inventory unit no longer exists;
    ///   nothing is written
    pub async fn process(&self, sale: &SaleRecord) -> DbResult<()> {
        debug!(id = %sale.id, lines = sale.items.len(), "Starting checkout transaction");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, date, customer_name, total_cents,
                cash_given_cents, balance_cents, processed_by
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&sale.id)
        .bind(sale.date)
        .bind(&sale.customer_name)
        .bind(sale.total_cents)
        .bind(sale.cash_given_cents)
        .bind(sale.balance_cents)
        .bind(&sale.processed_by)
        .execute(&mut *tx)
        .await?;

        for (position, line) in sale.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO sale_items (
                    id, sale_id, inventory_id, name, sku, size, color,
                    unit_price_cents, quantity, position
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&sale.id)
            .bind(&line.inventory_id)
            .bind(&line.name)
            .bind(&line.sku)
            .bind(&line.size)
            .bind(&line.color)
            .bind(line.unit_price_cents)
            .bind(line.quantity)
            .bind(position as i64)
            .execute(&mut *tx)
            .await?;

            // Guarded decrement: the WHERE clause re-checks stock inside
            // the transaction. Zero rows affected means the unit vanished
            // or was drained since the cart was built.
            let result = sqlx::query(
                r#"
                UPDATE inventory
                SET quantity = quantity - ?2
                WHERE id = ?1 AND quantity >= ?2
                "#,
            )
            .bind(&line.inventory_id)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                warn!(
                    inventory_id = %line.inventory_id,
                    sku = %line.sku,
                    requested = line.quantity,
                    "Checkout guard failed, rolling back"
                );
                tx.rollback().await?;

                let exists: i64 =
                    sqlx::query_scalar("SELECT COUNT(*) FROM inventory WHERE id = ?1")
                        .bind(&line.inventory_id)
                        .fetch_one(&self.pool)
                        .await?;

                return Err(if exists == 0 {
                    DbError::not_found("Inventory unit", &line.inventory_id)
                } else {
                    DbError::InsufficientStock {
                        sku: line.sku.clone(),
                        requested: line.quantity,
                    }
                });
            }
        }

        tx.commit().await?;

        info!(id = %sale.id, total = %sale.total_cents, "Sale committed");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
