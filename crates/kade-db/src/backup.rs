//! # Backup, Restore, and Reset
//!
//! Full-database export to a single JSON document, the inverse import, and
//! the factory reset.
//!
//! ## Restore Safety
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Import Pipeline                                  │
//! │                                                                         │
//! │  Read file ──► Parse JSON ──► BEGIN ──► clear all ──► insert all ──►   │
//! │                    │                                              COMMIT│
//! │                    └── parse error? abort HERE, before any write        │
//! │                                                                         │
//! │  A malformed file can never destroy existing data.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Import replaces the entire database contents; it does not merge.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{DbError, DbResult};
use crate::pool::Database;
use kade_core::{InventoryUnit, Product, SaleRecord, ShopSettings, UserAccount};

/// The on-disk backup document: every record collection, verbatim.
///
/// `settings` is a list for uniformity with the other collections; it holds
/// zero or one entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackupDocument {
    pub products: Vec<Product>,
    pub inventory: Vec<InventoryUnit>,
    pub sales: Vec<SaleRecord>,
    pub users: Vec<UserAccount>,
    pub settings: Vec<ShopSettings>,
}

/// Repository for backup export, import, and full reset.
#[derive(Debug, Clone)]
pub struct BackupRepository {
    db: Database,
}

impl BackupRepository {
    /// Creates a new BackupRepository.
    pub fn new(db: Database) -> Self {
        BackupRepository { db }
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Reads every collection into a backup document.
    pub async fn export(&self) -> DbResult<BackupDocument> {
        let products = self.db.products().list_all().await?;
        let inventory = self.db.inventory().list_all().await?;
        let sales = self.db.sales().list_all().await?;
        let users = self.db.users().list_all().await?;
        let settings = vec![self.db.settings().get().await?];

        info!(
            products = products.len(),
            inventory = inventory.len(),
            sales = sales.len(),
            users = users.len(),
            "Backup exported"
        );

        Ok(BackupDocument {
            products,
            inventory,
            sales,
            users,
            settings,
        })
    }

    /// Exports to a date-stamped JSON file in the given directory.
    ///
    /// ## Returns
    /// The path of the written file, `kadepos_backup_YYYY-MM-DD.json`.
    /// An existing file for the same day is overwritten.
    pub async fn export_to_file(&self, dir: impl AsRef<Path>) -> DbResult<PathBuf> {
        let doc = self.export().await?;
        let filename = format!("kadepos_backup_{}.json", Utc::now().format("%Y-%m-%d"));
        let path = dir.as_ref().join(filename);

        let json = serde_json::to_string_pretty(&doc)
            .map_err(|e| DbError::Internal(e.to_string()))?;
        std::fs::write(&path, json)?;

        info!(path = %path.display(), "Backup written");
        Ok(path)
    }

    // =========================================================================
    // Import
    // =========================================================================

    /// Parses a backup document from JSON text.
    ///
    /// Parsing happens before any table is touched, so a malformed file
    /// fails here with [`DbError::InvalidBackup`] and the database is left
    /// unchanged.
    pub fn parse(json: &str) -> DbResult<BackupDocument> {
        let doc: BackupDocument = serde_json::from_str(json)?;
        Ok(doc)
    }

    /// Reads and imports a backup file, replacing all current data.
    pub async fn import_from_file(&self, path: impl AsRef<Path>) -> DbResult<()> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let doc = Self::parse(&json)?;
        self.import(&doc).await
    }

    /// Replaces the entire database contents with the document, in one
    /// transaction: clear every table, then insert every record.
    pub async fn import(&self, doc: &BackupDocument) -> DbResult<()> {
        warn!(
            products = doc.products.len(),
            sales = doc.sales.len(),
            "Importing backup, replacing all data"
        );

        let mut tx = self.db.pool().begin().await?;

        // sale_items references sales, so it goes first
        for table in ["sale_items", "sales", "inventory", "products", "users", "settings"] {
            sqlx::query(&format!("DELETE FROM {}", table))
                .execute(&mut *tx)
                .await?;
        }

        for product in &doc.products {
            sqlx::query(
                r#"
                INSERT INTO products (id, name, sku, category, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(&product.id)
            .bind(&product.name)
            .bind(&product.sku)
            .bind(&product.category)
            .bind(product.created_at)
            .execute(&mut *tx)
            .await?;
        }

        for unit in &doc.inventory {
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
            .execute(&mut *tx)
            .await?;
        }

        for sale in &doc.sales {
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
                .bind(uuid::Uuid::new_v4().to_string())
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
            }
        }

        for user in &doc.users {
            sqlx::query(
                r#"
                INSERT INTO users (id, username, password_hash, role)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(&user.id)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(user.role)
            .execute(&mut *tx)
            .await?;
        }

        for settings in &doc.settings {
            sqlx::query(
                r#"
                INSERT INTO settings (id, shop_name, shop_address, shop_phone, logo, theme)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(settings.id)
            .bind(&settings.shop_name)
            .bind(&settings.shop_address)
            .bind(&settings.shop_phone)
            .bind(&settings.logo)
            .bind(settings.theme)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!("Backup import complete");
        Ok(())
    }

    // =========================================================================
    // Full Reset
    // =========================================================================

    /// Destroys all data and recreates the empty schema.
    ///
    /// Drops every table (including the migration ledger) and re-runs the
    /// embedded migrations, leaving the database as on first run.
    pub async fn full_reset(&self) -> DbResult<()> {
        warn!("Performing full data reset");

        for table in [
            "sale_items",
            "sales",
            "inventory",
            "products",
            "users",
            "settings",
            "_sqlx_migrations",
        ] {
            sqlx::query(&format!("DROP TABLE IF EXISTS {}", table))
                .execute(self.db.pool())
                .await?;
        }

        self.db.run_migrations().await?;

        info!("Full reset complete, schema recreated");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use kade_core::{Money, Role, SaleLine, Theme};
    use uuid::Uuid;

    async fn seed(db: &Database) {
        let product = db
            .products()
            .get_or_create("TS1", "T-Shirt", Some("Clothing"))
            .await
            .unwrap();

        db.inventory()
            .insert(&InventoryUnit {
                id: "u1".to_string(),
                product_id: product.id.clone(),
                size: Some("M".to_string()),
                color: None,
                quantity: 10,
                buying_price_cents: Money::from_cents(30000),
                retail_price_cents: Money::from_cents(50000),
                wholesale_price_cents: Money::from_cents(40000),
            })
            .await
            .unwrap();

        db.users()
            .insert(&UserAccount {
                id: Uuid::new_v4().to_string(),
                username: "admin".to_string(),
                password_hash: "$argon2id$test".to_string(),
                role: Role::Admin,
            })
            .await
            .unwrap();

        db.settings()
            .put(&ShopSettings {
                shop_name: "Kade Corner".to_string(),
                theme: Theme::Dark,
                ..ShopSettings::default()
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_export_import_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed(&db).await;

        let doc = db.backup().export().await.unwrap();
        assert_eq!(doc.products.len(), 1);
        assert_eq!(doc.inventory.len(), 1);
        assert_eq!(doc.users.len(), 1);
        assert_eq!(doc.settings.len(), 1);

        // Wipe and restore into a fresh database
        let other = Database::new(DbConfig::in_memory()).await.unwrap();
        other.backup().import(&doc).await.unwrap();

        assert_eq!(other.products().count().await.unwrap(), 1);
        let unit = other.inventory().get_by_id("u1").await.unwrap().unwrap();
        assert_eq!(unit.quantity, 10);
        let settings = other.settings().get().await.unwrap();
        assert_eq!(settings.shop_name, "Kade Corner");
        assert_eq!(settings.theme, Theme::Dark);
    }

    #[tokio::test]
    async fn test_round_trip_preserves_sales_and_item_snapshots() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed(&db).await;

        let items = vec![
            SaleLine {
                inventory_id: "u1".to_string(),
                name: "T-Shirt".to_string(),
                sku: "TS1".to_string(),
                size: Some("M".to_string()),
                color: None,
                unit_price_cents: Money::from_cents(50000),
                quantity: 2,
            },
            SaleLine {
                inventory_id: "u1".to_string(),
                name: "T-Shirt".to_string(),
                sku: "TS1".to_string(),
                size: Some("M".to_string()),
                color: None,
                unit_price_cents: Money::from_cents(40000),
                quantity: 1,
            },
        ];
        let record = SaleRecord {
            id: Uuid::new_v4().to_string(),
            date: Utc::now(),
            customer_name: "Nimal".to_string(),
            total_cents: Money::from_cents(140000),
            cash_given_cents: Money::from_cents(140000),
            balance_cents: Money::zero(),
            processed_by: "admin".to_string(),
            items,
        };
        db.checkout().process(&record).await.unwrap();

        let doc = db.backup().export().await.unwrap();
        assert_eq!(doc.sales.len(), 1);
        assert_eq!(doc.sales[0].items.len(), 2);

        let other = Database::new(DbConfig::in_memory()).await.unwrap();
        other.backup().import(&doc).await.unwrap();

        let loaded = other.sales().get_by_id(&record.id).await.unwrap().unwrap();
        assert_eq!(loaded.customer_name, "Nimal");
        assert_eq!(loaded.items, record.items);

        // Re-exporting the restored store yields the same document,
        // element for element, embedded sale lines included.
        let doc2 = other.backup().export().await.unwrap();
        assert_eq!(doc2.sales, doc.sales);
        assert_eq!(doc2.inventory, doc.inventory);
        assert_eq!(doc2.products, doc.products);
    }

    #[tokio::test]
    async fn test_import_replaces_not_merges() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed(&db).await;

        // Import an empty document: everything must be gone.
        db.backup().import(&BackupDocument::default()).await.unwrap();

        assert_eq!(db.products().count().await.unwrap(), 0);
        assert_eq!(db.inventory().count().await.unwrap(), 0);
        assert_eq!(db.users().count().await.unwrap(), 0);
        assert_eq!(db.settings().get().await.unwrap(), ShopSettings::default());
    }

    #[tokio::test]
    async fn test_malformed_file_leaves_data_untouched() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed(&db).await;

        let err = BackupRepository::parse("{not valid json").unwrap_err();
        assert!(matches!(err, DbError::InvalidBackup(_)));

        // Seeded data still present
        assert_eq!(db.products().count().await.unwrap(), 1);
        assert_eq!(db.users().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_export_to_file_is_date_stamped_and_readable() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed(&db).await;

        let dir = tempfile::tempdir().unwrap();
        let path = db.backup().export_to_file(dir.path()).await.unwrap();

        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("kadepos_backup_"));
        assert!(name.ends_with(".json"));

        // Round-trips through the file
        let other = Database::new(DbConfig::in_memory()).await.unwrap();
        other.backup().import_from_file(&path).await.unwrap();
        assert_eq!(other.products().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_full_reset_recreates_empty_schema() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed(&db).await;

        db.backup().full_reset().await.unwrap();

        // Schema exists and is empty
        assert_eq!(db.products().count().await.unwrap(), 0);
        assert_eq!(db.users().count().await.unwrap(), 0);
        assert!(db.health_check().await);

        // Still usable after reset
        db.products()
            .get_or_create("TS1", "T-Shirt", None)
            .await
            .unwrap();
        assert_eq!(db.products().count().await.unwrap(), 1);
    }
}
