//! # Dashboard Commands
//!
//! Aggregate figures for the landing view: today's trade, stock health, and
//! the latest sales. Pure reads, recomputed on every load.

use chrono::{NaiveTime, Utc};
use serde::Serialize;

use kade_core::{Money, SaleRecord};
use kade_db::Database;

use crate::error::AppResult;

/// Number of recent sales shown on the dashboard.
const RECENT_SALES_LIMIT: i64 = 5;

/// Everything the dashboard view renders.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Sales committed since local midnight (UTC day boundary).
    pub today_sales_count: i64,

    /// Revenue over those sales.
    pub today_revenue_cents: Money,

    /// Units whose quantity fell below the low-stock threshold.
    pub low_stock_count: i64,

    /// Sum of on-hand quantity across all units.
    pub total_units: i64,

    /// The latest sales, newest first, with item snapshots.
    pub recent_sales: Vec<SaleRecord>,
}

/// Computes the dashboard stats.
pub async fn load_dashboard(db: &Database) -> AppResult<DashboardStats> {
    let day_start = Utc::now()
        .date_naive()
        .and_time(NaiveTime::MIN)
        .and_utc();

    let (today_sales_count, today_revenue_cents) = db.sales().stats_since(day_start).await?;
    let low_stock_count = db.inventory().low_stock_count().await?;
    let total_units = db.inventory().total_units().await?;
    let recent_sales = db.sales().list_recent(RECENT_SALES_LIMIT).await?;

    Ok(DashboardStats {
        today_sales_count,
        today_revenue_cents,
        low_stock_count,
        total_units,
        recent_sales,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth, pos};
    use crate::session::SessionState;
    use kade_core::InventoryUnit;
    use kade_db::DbConfig;

    async fn setup() -> (Database, SessionState) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        auth::ensure_default_admin(&db).await.unwrap();
        let session = SessionState::new();
        auth::login(&db, &session, "admin", "123").await.unwrap();
        (db, session)
    }

    async fn seed_unit(db: &Database, id: &str, qty: i64) {
        let product = db
            .products()
            .get_or_create(&format!("SKU-{}", id), &format!("Item {}", id), None)
            .await
            .unwrap();
        db.inventory()
            .insert(&InventoryUnit {
                id: id.to_string(),
                product_id: product.id,
                size: None,
                color: None,
                quantity: qty,
                buying_price_cents: Money::from_cents(30000),
                retail_price_cents: Money::from_cents(50000),
                wholesale_price_cents: Money::from_cents(40000),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_empty_dashboard() {
        let (db, _session) = setup().await;
        let stats = load_dashboard(&db).await.unwrap();

        assert_eq!(stats.today_sales_count, 0);
        assert_eq!(stats.today_revenue_cents.cents(), 0);
        assert_eq!(stats.low_stock_count, 0);
        assert_eq!(stats.total_units, 0);
        assert!(stats.recent_sales.is_empty());
    }

    #[tokio::test]
    async fn test_dashboard_after_sales() {
        let (db, session) = setup().await;
        seed_unit(&db, "u1", 10).await;
        seed_unit(&db, "u2", 3).await; // below threshold

        pos::add_to_cart(&db, &session, "u1").await.unwrap();
        pos::add_to_cart(&db, &session, "u1").await.unwrap();
        pos::checkout(&db, &session, false, None).await.unwrap();

        let stats = load_dashboard(&db).await.unwrap();
        assert_eq!(stats.today_sales_count, 1);
        assert_eq!(stats.today_revenue_cents.cents(), 100000);
        assert_eq!(stats.low_stock_count, 1);
        assert_eq!(stats.total_units, 11); // 8 left on u1 + 3 on u2
        assert_eq!(stats.recent_sales.len(), 1);
        assert_eq!(stats.recent_sales[0].items.len(), 1);
    }

    #[tokio::test]
    async fn test_recent_sales_capped_and_newest_first() {
        let (db, session) = setup().await;
        seed_unit(&db, "u1", 100).await;

        for _ in 0..7 {
            pos::add_to_cart(&db, &session, "u1").await.unwrap();
            pos::checkout(&db, &session, false, None).await.unwrap();
        }

        let stats = load_dashboard(&db).await.unwrap();
        assert_eq!(stats.today_sales_count, 7);
        assert_eq!(stats.recent_sales.len(), 5);
        for pair in stats.recent_sales.windows(2) {
            assert!(pair[0].date >= pair[1].date);
        }
    }
}
