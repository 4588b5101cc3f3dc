//! # kade-core: Pure Business Logic for KadePOS
//!
//! This crate is the heart of KadePOS. It contains all business logic as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        KadePOS Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    UI glue (external)                           │   │
//! │  │    Login ──► POS grid ──► Cart panel ──► Receipt / Share       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ typed commands                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    kade-app (session layer)                     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kade-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │  catalog  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐                                 │   │
//! │  │   │  receipt  │  │ validation│   NO I/O • PURE FUNCTIONS       │   │
//! │  │   └───────────┘  └───────────┘                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    kade-db (Database Layer)                     │   │
//! │  │         SQLite repositories, checkout tx, backup/restore        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, InventoryUnit, SaleRecord, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`catalog`] - Product × inventory join into flat sale-able items
//! - [`cart`] - In-memory cart with price-mode pricing and stock caps
//! - [`receipt`] - Print / PDF / message projections of a committed sale
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod error;
pub mod money;
pub mod receipt;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine};
pub use catalog::CatalogItem;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Fixed identity of the singleton settings record.
pub const SETTINGS_ROW_ID: i64 = 1;

/// Sentinel customer name when the operator leaves the field blank.
pub const DEFAULT_CUSTOMER_NAME: &str = "Cash Customer";

/// Every Nth sale (by raw count of sales ever recorded) triggers an
/// automatic full backup export. Coarse heuristic, no adjustable schedule.
pub const AUTO_BACKUP_EVERY: i64 = 50;

/// Units with quantity strictly below this count as "low stock" on the dashboard.
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// Upper bound on a single cart line's quantity.
pub const MAX_ITEM_QUANTITY: i64 = 999;
