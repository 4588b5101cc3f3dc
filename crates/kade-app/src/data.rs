//! # Data Management Commands
//!
//! Manual backup export, restore from file, and the factory reset. All
//! admin-gated; the destructive two also require an explicit confirmation
//! flag from the UI.
//!
//! After an import or reset the in-memory session no longer matches the
//! database (the operator's account may not even exist anymore), so both
//! invalidate the session and the operator logs in again.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use kade_db::Database;

use crate::auth;
use crate::error::{AppError, AppResult};
use crate::session::SessionState;

/// Exports a backup file into the given directory and returns its path.
/// The daily-close flow asks the operator first, so this too takes the
/// confirmation flag.
pub async fn export_backup(
    db: &Database,
    session: &SessionState,
    dir: impl AsRef<Path>,
    confirmed: bool,
) -> AppResult<PathBuf> {
    session.with_session(|s| s.require_admin().map(|_| ()))?;

    if !confirmed {
        return Err(AppError::needs_confirmation(
            "Run the daily close and export a backup now?",
        ));
    }

    let path = db.backup().export_to_file(dir).await?;
    info!(path = %path.display(), "Manual backup exported");
    Ok(path)
}

/// Restores the database from a backup file, replacing all current data.
///
/// The file is parsed before anything is written, so a malformed file fails
/// with `INVALID_BACKUP` and leaves the database untouched. On success the
/// session is invalidated; if the backup carried no users, the default
/// admin is re-seeded so the shop stays reachable.
pub async fn import_backup(
    db: &Database,
    session: &SessionState,
    path: impl AsRef<Path>,
    confirmed: bool,
) -> AppResult<()> {
    session.with_session(|s| s.require_admin().map(|_| ()))?;

    if !confirmed {
        return Err(AppError::needs_confirmation(
            "Importing a backup replaces ALL current data. Continue?",
        ));
    }

    db.backup().import_from_file(path.as_ref()).await?;
    auth::ensure_default_admin(db).await?;

    session.with_session_mut(|s| s.invalidate());
    warn!(path = %path.as_ref().display(), "Backup imported; session invalidated");
    Ok(())
}

/// Destroys all data and recreates the empty schema with the default admin.
pub async fn full_reset(db: &Database, session: &SessionState, confirmed: bool) -> AppResult<()> {
    session.with_session(|s| s.require_admin().map(|_| ()))?;

    if !confirmed {
        return Err(AppError::needs_confirmation(
            "This erases ALL products, sales, users, and settings. Continue?",
        ));
    }

    db.backup().full_reset().await?;
    auth::ensure_default_admin(db).await?;

    session.with_session_mut(|s| s.invalidate());
    warn!("Full data reset performed; session invalidated");
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::{inventory, pos};
    use kade_db::DbConfig;

    async fn setup_with_stock() -> (Database, SessionState) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        auth::ensure_default_admin(&db).await.unwrap();
        let session = SessionState::new();
        auth::login(&db, &session, "admin", "123").await.unwrap();

        inventory::save_item(
            &db,
            &session,
            &inventory::StockEntryForm {
                sku: "TS1".to_string(),
                name: "T-Shirt".to_string(),
                category: None,
                size: Some("M".to_string()),
                color: None,
                quantity: 10,
                buying_price_cents: 30000,
                retail_price_cents: 50000,
                wholesale_price_cents: 40000,
            },
            None,
        )
        .await
        .unwrap();

        (db, session)
    }

    #[tokio::test]
    async fn test_export_then_import_restores_state() {
        let (db, session) = setup_with_stock().await;
        let dir = tempfile::tempdir().unwrap();

        let path = export_backup(&db, &session, dir.path(), true).await.unwrap();

        // Sell everything, then restore
        let unit_id = db.inventory().list_all().await.unwrap()[0].id.clone();
        pos::add_to_cart(&db, &session, &unit_id).await.unwrap();
        pos::checkout(&db, &session, false, None).await.unwrap();
        assert_eq!(db.sales().count().await.unwrap(), 1);

        import_backup(&db, &session, &path, true).await.unwrap();

        // Back to the exported snapshot
        assert_eq!(db.sales().count().await.unwrap(), 0);
        let unit = db.inventory().get_by_id(&unit_id).await.unwrap().unwrap();
        assert_eq!(unit.quantity, 10);

        // Session was invalidated
        assert!(session.with_session(|s| s.user.is_none()));
    }

    #[tokio::test]
    async fn test_export_requires_confirmation() {
        let (db, session) = setup_with_stock().await;
        let dir = tempfile::tempdir().unwrap();

        let err = export_backup(&db, &session, dir.path(), false)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfirmationRequired);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_import_requires_confirmation() {
        let (db, session) = setup_with_stock().await;
        let dir = tempfile::tempdir().unwrap();
        let path = export_backup(&db, &session, dir.path(), true).await.unwrap();

        let err = import_backup(&db, &session, &path, false).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfirmationRequired);
        // Still logged in, nothing changed
        assert!(session.with_session(|s| s.user.is_some()));
    }

    #[tokio::test]
    async fn test_malformed_import_preserves_data_and_session() {
        let (db, session) = setup_with_stock().await;
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{broken").unwrap();

        let err = import_backup(&db, &session, &bad, true).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidBackup);

        assert_eq!(db.inventory().count().await.unwrap(), 1);
        assert!(session.with_session(|s| s.user.is_some()));
    }

    #[tokio::test]
    async fn test_full_reset_wipes_and_reseeds_admin() {
        let (db, session) = setup_with_stock().await;

        full_reset(&db, &session, true).await.unwrap();

        assert_eq!(db.inventory().count().await.unwrap(), 0);
        assert_eq!(db.products().count().await.unwrap(), 0);
        // Default admin reseeded, session logged out
        assert_eq!(db.users().count().await.unwrap(), 1);
        assert!(session.with_session(|s| s.user.is_none()));

        // And the shop is reachable again
        auth::login(&db, &session, "admin", "123").await.unwrap();
    }

    #[tokio::test]
    async fn test_reset_requires_confirmation() {
        let (db, session) = setup_with_stock().await;

        let err = full_reset(&db, &session, false).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfirmationRequired);
        assert_eq!(db.inventory().count().await.unwrap(), 1);
    }
}
