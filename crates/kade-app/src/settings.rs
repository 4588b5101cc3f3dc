//! # Settings Commands
//!
//! Shop identity (name, address, phone, logo) and the UI theme. Reads are
//! open to any session; writes are admin only.

use tracing::info;

use kade_core::{ShopSettings, Theme};
use kade_db::Database;

use crate::error::{AppError, AppResult};
use crate::session::SessionState;

/// Loads the shop settings (defaults on first run).
pub async fn load_settings(db: &Database) -> AppResult<ShopSettings> {
    Ok(db.settings().get().await?)
}

/// Saves the shop settings.
pub async fn save_settings(
    db: &Database,
    session: &SessionState,
    settings: &ShopSettings,
) -> AppResult<()> {
    session.with_session(|s| s.require_admin().map(|_| ()))?;

    if settings.shop_name.trim().is_empty() {
        return Err(AppError::validation("Shop name is required"));
    }

    db.settings().put(settings).await?;
    info!(shop_name = %settings.shop_name, "Settings saved");
    Ok(())
}

/// Flips the persisted theme and returns the new value. Not admin-gated:
/// the theme toggle sits in the top bar for every operator.
pub async fn toggle_theme(db: &Database) -> AppResult<Theme> {
    let mut settings = db.settings().get().await?;
    settings.theme = settings.theme.toggled();
    db.settings().put(&settings).await?;

    Ok(settings.theme)
}

// =============================================================================
// Unit Tests
// =============================================================================
