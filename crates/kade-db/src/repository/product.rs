//! # Product Repository
//!
//! Database operations for the product collection.
//!
//! Products carry identity and display fields only; quantity and prices live
//! on the inventory units. The SKU is the business key: entering stock under
//! a known SKU attaches to the existing product via [`ProductRepository::get_by_sku`].

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use kade_core::Product;

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists all products.
    pub async fn list_all(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, sku, category, created_at
            FROM products
            ORDER BY name COLLATE NOCASE
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Gets a product by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, sku, category, created_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by SKU (trimmed, exact match).
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, sku, category, created_at
            FROM products
            WHERE sku = ?1
            "#,
        )
        .bind(sku.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a product.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, sku = %product.sku, "Inserting product");

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
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates a product's display fields.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE products SET name = ?2, sku = ?3, category = ?4
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.sku)
        .bind(&product.category)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(crate::error::DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Gets an existing product by SKU, or creates one with the given
    /// display fields.
    ///
    /// ## Returns
    /// The existing or newly created product.
    pub async fn get_or_create(
        &self,
        sku: &str,
        name: &str,
        category: Option<&str>,
    ) -> DbResult<Product> {
        if let Some(existing) = self.get_by_sku(sku).await? {
            return Ok(existing);
        }

        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            sku: sku.trim().to_string(),
            category: category.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()),
            created_at: Utc::now(),
        };

        self.insert(&product).await?;
        Ok(product)
    }

    /// Counts all products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_insert_and_get_by_sku() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let created = repo.get_or_create("TS1", "T-Shirt", None).await.unwrap();
        let found = repo.get_by_sku("TS1").await.unwrap().unwrap();

        assert_eq!(found.id, created.id);
        assert_eq!(found.name, "T-Shirt");
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_or_create_attaches_to_existing_sku() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let first = repo.get_or_create("TS1", "T-Shirt", None).await.unwrap();
        // Second entry under the same SKU must not create a duplicate,
        // even with a different display name.
        let second = repo.get_or_create("TS1", "Tee Shirt", None).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.name, "T-Shirt");
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_sku_insert_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let product = repo.get_or_create("TS1", "T-Shirt", None).await.unwrap();
        let mut dup = product.clone();
        dup.id = uuid::Uuid::new_v4().to_string();

        let err = repo.insert(&dup).await.unwrap_err();
        assert!(matches!(err, crate::DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_update_missing_product_is_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let ghost = kade_core::Product {
            id: "missing".to_string(),
            name: "Ghost".to_string(),
            sku: "GH1".to_string(),
            category: None,
            created_at: chrono::Utc::now(),
        };

        let err = repo.update(&ghost).await.unwrap_err();
        assert!(matches!(err, crate::DbError::NotFound { .. }));
    }
}
