//! # Settings Repository
//!
//! The settings collection is a singleton: one row with a fixed identity
//! ([`kade_core::SETTINGS_ROW_ID`]). Reads fall back to defaults when the
//! row doesn't exist yet; writes upsert it.

use sqlx::SqlitePool;

use crate::error::DbResult;
use kade_core::{ShopSettings, SETTINGS_ROW_ID};

/// Repository for the singleton shop settings record.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    /// Creates a new SettingsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    /// Gets the shop settings, or the built-in defaults on first run.
    pub async fn get(&self) -> DbResult<ShopSettings> {
        let settings = sqlx::query_as::<_, ShopSettings>(
            r#"
            SELECT id, shop_name, shop_address, shop_phone, logo, theme
            FROM settings
            WHERE id = ?1
            "#,
        )
        .bind(SETTINGS_ROW_ID)
        .fetch_optional(&self.pool)
        .await?;

        Ok(settings.unwrap_or_default())
    }

    /// Saves the shop settings, creating or replacing the singleton row.
    /// The caller-supplied id is ignored; the row identity is fixed.
    pub async fn put(&self, settings: &ShopSettings) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO settings (id, shop_name, shop_address, shop_phone, logo, theme)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT (id) DO UPDATE SET
                shop_name = excluded.shop_name,
                shop_address = excluded.shop_address,
                shop_phone = excluded.shop_phone,
                logo = excluded.logo,
                theme = excluded.theme
            "#,
        )
        .bind(SETTINGS_ROW_ID)
        .bind(&settings.shop_name)
        .bind(&settings.shop_address)
        .bind(&settings.shop_phone)
        .bind(&settings.logo)
        .bind(settings.theme)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
