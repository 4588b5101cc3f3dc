//! # kade-app: Session and Command Surface for KadePOS
//!
//! The headless application layer. Every user-facing action - login, adding
//! to the cart, checkout, backup - is a function here, taking the shared
//! [`kade_db::Database`] and the operator's [`session::SessionState`].
//!
//! ## Module Organization
//! ```text
//! kade_app/
//! ├── lib.rs        ◄─── You are here (setup, tracing)
//! ├── config.rs     ◄─── Data directory and file paths
//! ├── session.rs    ◄─── Per-operator state (user, cart, price mode)
//! ├── auth.rs       ◄─── Login / logout / default admin seeding
//! ├── pos.rs        ◄─── Catalog, cart, checkout commands
//! ├── inventory.rs  ◄─── Stock entry / edit / delete commands
//! ├── users.rs      ◄─── User management (admin only)
//! ├── settings.rs   ◄─── Shop settings and theme
//! ├── dashboard.rs  ◄─── Aggregate stats for the dashboard view
//! ├── data.rs       ◄─── Backup export / import / full reset
//! └── error.rs      ◄─── AppError for the UI boundary
//! ```
//!
//! ## Session Model
//! One session per running app instance. State that dies with the session
//! (cart, price mode, entry fields) lives in [`session::Session`]; everything
//! durable lives in the database.

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod inventory;
pub mod pos;
pub mod session;
pub mod settings;
pub mod users;

pub use config::AppConfig;
pub use error::{AppError, AppResult, ErrorCode};
pub use session::{Session, SessionState};

use tracing::info;
use tracing_subscriber::EnvFilter;

use kade_db::{Database, DbConfig};

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=kade=trace` - Show trace for kade crates only
/// - Default: INFO level, sqlx quieted to warnings
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kade=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Connects the database and seeds first-run state.
///
/// ## Startup Sequence
/// 1. Open (or create) the SQLite database and run migrations
/// 2. Seed the default admin account if no users exist
pub async fn init_database(config: &AppConfig) -> AppResult<Database> {
    info!(path = %config.database_path.display(), "Opening database");

    let db = Database::new(DbConfig::new(&config.database_path)).await?;
    auth::ensure_default_admin(&db).await?;

    Ok(db)
}
