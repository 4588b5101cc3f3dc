//! # kade-db: Database Layer for KadePOS
//!
//! This crate provides database access for the KadePOS system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        KadePOS Data Flow                                │
//! │                                                                         │
//! │  kade-app command (checkout, save_item, export_backup, ...)            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     kade-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌────────────────┐   ┌───────────────┐  │   │
//! │  │   │   Database    │   │  Repositories  │   │  Migrations   │  │   │
//! │  │   │   (pool.rs)   │   │ product, sale, │   │  (embedded)   │  │   │
//! │  │   │               │   │ inventory, ... │   │               │  │   │
//! │  │   │ SqlitePool    │◄──│ CheckoutRepo   │   │ 001_init.sql  │  │   │
//! │  │   │ Management    │   │ BackupRepo     │   │               │  │   │
//! │  │   └───────────────┘   └────────────────┘   └───────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (local, single shop)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (product, inventory, ...)
//! - [`checkout`] - The atomic sale + stock-decrement transaction
//! - [`backup`] - Full-database export, import, and reset

// =============================================================================
// Module Declarations
// =============================================================================

pub mod backup;
pub mod checkout;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use backup::{BackupDocument, BackupRepository};
pub use checkout::CheckoutRepository;
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::inventory::InventoryRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
pub use repository::settings::SettingsRepository;
pub use repository::user::UserRepository;
