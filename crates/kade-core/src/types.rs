//! # Domain Types
//!
//! Core domain types used throughout KadePOS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  InventoryUnit  │   │   SaleRecord    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄──│  product_id     │   │  id (UUID)      │       │
//! │  │  sku (business) │   │  size / color   │   │  total_cents    │       │
//! │  │  name, category │   │  quantity       │   │  items (frozen) │       │
//! │  └─────────────────┘   │  3 price tiers  │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   UserAccount   │   │  ShopSettings   │   │    PriceMode    │       │
//! │  │  username/role  │   │  singleton row  │   │ Retail/Wholesale│       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! `SaleRecord.items` is a frozen copy of the cart at time of sale, not a
//! set of live references. Receipts for old sales stay stable even if the
//! product or inventory data changes later.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog. One product may have many stocked variants
/// ([`InventoryUnit`]); the product itself carries no quantity or price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown on the POS grid and receipts.
    pub name: String,

    /// Stock Keeping Unit - business identifier. Entering stock under a
    /// known SKU attaches to the existing product (lookup-by-sku on create).
    pub sku: String,

    /// Optional category label.
    pub category: Option<String>,

    /// When the product was first entered.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Inventory Unit
// =============================================================================

/// A specific stocked variant (size/color) of a product, carrying its own
/// quantity and the three price tiers.
///
/// `product_id` is a weak back-reference: deleting a product does not
/// cascade here, and the catalog join drops units that no longer resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InventoryUnit {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owning product.
    pub product_id: String,

    /// Variant attributes.
    pub size: Option<String>,
    pub color: Option<String>,

    /// On-hand quantity. Mutated by checkout and manual edits; the checkout
    /// transaction's guarded decrement keeps it from going negative.
    pub quantity: i64,

    /// Price tiers, in cents.
    pub buying_price_cents: Money,
    pub retail_price_cents: Money,
    pub wholesale_price_cents: Money,
}

// =============================================================================
// Price Mode
// =============================================================================

/// Session-scoped toggle selecting which price tier applies when adding
/// items to the cart. Prices lock at add time; switching the mode never
/// reprices lines already in the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceMode {
    Retail,
    Wholesale,
}

impl Default for PriceMode {
    fn default() -> Self {
        PriceMode::Retail
    }
}

// =============================================================================
// Sale Record
// =============================================================================

/// Immutable record of a completed checkout.
///
/// Created once per checkout inside the atomic transaction; never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// When the sale was committed.
    pub date: DateTime<Utc>,

    /// Customer name as entered, or the "Cash Customer" sentinel.
    pub customer_name: String,

    /// Cart total at commit time.
    pub total_cents: Money,

    /// Cash tendered. Defaults to the total when the operator left the
    /// field blank, in which case the balance is zero.
    pub cash_given_cents: Money,

    /// cash_given - total. Negative for partial-payment/credit sales.
    pub balance_cents: Money,

    /// Username snapshot of the operator, not a live reference.
    pub processed_by: String,

    /// Frozen copy of the cart lines at time of sale.
    pub items: Vec<SaleLine>,
}

/// One line of a sale's embedded item snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleLine {
    /// The inventory unit this line was sold from. Informational only after
    /// the sale: the unit may be edited or deleted later.
    pub inventory_id: String,

    /// Display fields frozen at time of sale.
    pub name: String,
    pub sku: String,
    pub size: Option<String>,
    pub color: Option<String>,

    /// Unit price locked at add-to-cart time.
    pub unit_price_cents: Money,

    /// Quantity sold.
    pub quantity: i64,
}

impl SaleLine {
    /// Line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price_cents.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// User Account
// =============================================================================

/// Operator role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access: inventory, users, settings, data management.
    Admin,
    /// POS access only.
    Staff,
}

/// An operator account.
///
/// Passwords are stored as argon2 hashes; backups carry the hash, never the
/// cleartext.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct UserAccount {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Login name, unique.
    pub username: String,

    /// argon2 password hash.
    pub password_hash: String,

    pub role: Role,
}

// =============================================================================
// Shop Settings
// =============================================================================

/// UI theme preference, persisted with the shop settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    /// The opposite theme, for the toggle action.
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Light
    }
}

/// The singleton shop settings record (fixed id, see
/// [`crate::SETTINGS_ROW_ID`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ShopSettings {
    pub id: i64,
    pub shop_name: String,
    pub shop_address: String,
    pub shop_phone: String,
    /// Logo as a data URL, if one was uploaded.
    pub logo: Option<String>,
    pub theme: Theme,
}

impl Default for ShopSettings {
    /// Fallback used when no settings row exists yet (first run).
    fn default() -> Self {
        ShopSettings {
            id: crate::SETTINGS_ROW_ID,
            shop_name: "KadePOS Shop".to_string(),
            shop_address: String::new(),
            shop_phone: String::new(),
            logo: None,
            theme: Theme::Light,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
