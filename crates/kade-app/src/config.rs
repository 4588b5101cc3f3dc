//! # Application Configuration
//!
//! File locations for the database and backup directory. Everything else
//! that configures the shop lives in the settings table, not here.

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::{AppError, AppResult};

/// File-system configuration for one KadePOS installation.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Directory where backup exports are written.
    pub backup_dir: PathBuf,
}

impl AppConfig {
    /// Builds the configuration from the platform app-data directory.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/com.kadepos.shop/`
    /// - **Windows**: `%APPDATA%\kadepos\shop\data\`
    /// - **Linux**: `~/.local/share/kadepos/`
    ///
    /// ## Development Override
    /// Set `KADE_DATA_DIR` to use a custom directory.
    pub fn from_platform_dirs() -> AppResult<Self> {
        let data_dir = if let Ok(dir) = std::env::var("KADE_DATA_DIR") {
            PathBuf::from(dir)
        } else {
            ProjectDirs::from("com", "kadepos", "shop")
                .ok_or_else(|| AppError::internal("Could not determine app data directory"))?
                .data_dir()
                .to_path_buf()
        };

        Ok(Self::in_dir(data_dir))
    }

    /// Builds the configuration rooted at an explicit directory.
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        AppConfig {
            database_path: data_dir.join("kade.db"),
            backup_dir: data_dir.join("backups"),
        }
    }

    /// Creates the data and backup directories if missing.
    pub fn ensure_dirs(&self) -> AppResult<()> {
        if let Some(parent) = self.database_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::internal(format!("Cannot create data dir: {}", e)))?;
        }
        std::fs::create_dir_all(&self.backup_dir)
            .map_err(|e| AppError::internal(format!("Cannot create backup dir: {}", e)))?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_dir_layout() {
        let config = AppConfig::in_dir("/tmp/kade-test");
        assert_eq!(config.database_path, PathBuf::from("/tmp/kade-test/kade.db"));
        assert_eq!(config.backup_dir, PathBuf::from("/tmp/kade-test/backups"));
    }

    #[test]
    fn test_ensure_dirs_creates_backup_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let config = AppConfig::in_dir(tmp.path().join("nested"));
        config.ensure_dirs().unwrap();
        assert!(config.backup_dir.is_dir());
    }
}
