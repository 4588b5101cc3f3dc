//! # Sale Repository
//!
//! Read access to the immutable sale history.
//!
//! Sales are written exclusively by the checkout transaction
//! ([`crate::checkout::CheckoutRepository`]) and the backup import; this
//! repository only reads them back, reassembling the embedded item snapshot
//! from the `sale_items` table.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::DbResult;
use kade_core::{Money, SaleLine, SaleRecord};

/// Raw `sales` row, before the item snapshot is attached.
#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: String,
    date: DateTime<Utc>,
    customer_name: String,
    total_cents: Money,
    cash_given_cents: Money,
    balance_cents: Money,
    processed_by: String,
}

/// Raw `sale_items` row.
#[derive(Debug, sqlx::FromRow)]
struct SaleItemRow {
    inventory_id: String,
    name: String,
    sku: String,
    size: Option<String>,
    color: Option<String>,
    unit_price_cents: Money,
    quantity: i64,
}

impl SaleItemRow {
    fn into_line(self) -> SaleLine {
        SaleLine {
            inventory_id: self.inventory_id,
            name: self.name,
            sku: self.sku,
            size: self.size,
            color: self.color,
            unit_price_cents: self.unit_price_cents,
            quantity: self.quantity,
        }
    }
}

/// Repository for sale read operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Gets a sale by ID, with its embedded item snapshot.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<SaleRecord>> {
        let row = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT id, date, customer_name, total_cents,
                   cash_given_cents, balance_cents, processed_by
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, SaleItemRow>(
            r#"
            SELECT inventory_id, name, sku, size, color,
                   unit_price_cents, quantity
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY position
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(assemble(row, items)))
    }

    /// Lists every sale with its item snapshot, oldest first. Used by the
    /// backup export; history views should prefer the bounded queries.
    pub async fn list_all(&self) -> DbResult<Vec<SaleRecord>> {
        let rows = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT id, date, customer_name, total_cents,
                   cash_given_cents, balance_cents, processed_by
            FROM sales
            ORDER BY date
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        self.attach_items(rows).await
    }

    /// Lists the most recent sales, newest first.
    pub async fn list_recent(&self, limit: i64) -> DbResult<Vec<SaleRecord>> {
        let rows = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT id, date, customer_name, total_cents,
                   cash_given_cents, balance_cents, processed_by
            FROM sales
            ORDER BY date DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        self.attach_items(rows).await
    }

    /// Count and revenue total over sales committed at or after `since`.
    pub async fn stats_since(&self, since: DateTime<Utc>) -> DbResult<(i64, Money)> {
        let (count, total): (i64, Option<i64>) = sqlx::query_as(
            "SELECT COUNT(*), SUM(total_cents) FROM sales WHERE date >= ?1",
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok((count, Money::from_cents(total.unwrap_or(0))))
    }

    /// Raw count of sales ever recorded. Drives the every-Nth-sale
    /// auto-backup trigger.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn attach_items(&self, rows: Vec<SaleRow>) -> DbResult<Vec<SaleRecord>> {
        let mut sales = Vec::with_capacity(rows.len());

        for row in rows {
            let items = sqlx::query_as::<_, SaleItemRow>(
                r#"
                SELECT inventory_id, name, sku, size, color,
                       unit_price_cents, quantity
                FROM sale_items
                WHERE sale_id = ?1
                ORDER BY position
                "#,
            )
            .bind(&row.id)
            .fetch_all(&self.pool)
            .await?;

            sales.push(assemble(row, items));
        }

        Ok(sales)
    }
}

fn assemble(row: SaleRow, items: Vec<SaleItemRow>) -> SaleRecord {
    SaleRecord {
        id: row.id,
        date: row.date,
        customer_name: row.customer_name,
        total_cents: row.total_cents,
        cash_given_cents: row.cash_given_cents,
        balance_cents: row.balance_cents,
        processed_by: row.processed_by,
        items: items.into_iter().map(SaleItemRow::into_line).collect(),
    }
}
