//! # POS Commands
//!
//! The selling surface: catalog, cart, and checkout.
//!
//! ## Checkout Orchestration
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        checkout()                                       │
//! │                                                                         │
//! │  1. require a logged-in operator (processed_by snapshot)                │
//! │  2. reject an empty cart                                                │
//! │  3. default blank customer name → "Cash Customer"                       │
//! │  4. default blank cash field → total (exact payment, balance 0)         │
//! │  5. cash < total and not confirmed? → CONFIRMATION_REQUIRED             │
//! │  6. build the frozen SaleRecord from the cart                           │
//! │  7. kade-db checkout transaction (atomic sale + stock decrement)        │
//! │  8. clear the cart and entry fields                                     │
//! │  9. every 50th sale ever: write an automatic backup file                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Steps 1-5 touch only the session; nothing is written until step 7, and
//! step 7 is all-or-nothing.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use kade_core::{
    catalog, validation, CartLine, CatalogItem, CoreError, Money, PriceMode, SaleRecord,
    AUTO_BACKUP_EVERY, DEFAULT_CUSTOMER_NAME,
};
use kade_db::Database;

use crate::error::AppResult;
use crate::session::SessionState;

// =============================================================================
// Catalog
// =============================================================================

/// Loads the full joined catalog of sale-able items.
pub async fn load_catalog(db: &Database) -> AppResult<Vec<CatalogItem>> {
    let products = db.products().list_all().await?;
    let inventory = db.inventory().list_all().await?;

    Ok(catalog::join_catalog(&products, &inventory))
}

/// Loads the catalog filtered by a name/SKU substring query.
pub async fn search_catalog(db: &Database, query: &str) -> AppResult<Vec<CatalogItem>> {
    let query = validation::validate_search_query(query).map_err(CoreError::from)?;
    let items = load_catalog(db).await?;

    Ok(catalog::filter_catalog(&items, &query))
}

// =============================================================================
// Cart
// =============================================================================

/// Read-only snapshot of the cart for the UI.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub total_cents: Money,
    pub price_mode: PriceMode,
}

/// Returns the current cart contents and total.
pub fn cart_view(session: &SessionState) -> CartView {
    session.with_session(|s| CartView {
        lines: s.cart.lines().to_vec(),
        total_cents: s.cart.total(),
        price_mode: s.price_mode,
    })
}

/// Adds one unit of a catalog item to the cart, under the session's active
/// price mode. Re-reads the unit from the database so the add-time stock
/// check sees current quantities, not a stale grid.
pub async fn add_to_cart(
    db: &Database,
    session: &SessionState,
    inventory_id: &str,
) -> AppResult<CartView> {
    session.with_session(|s| s.require_user().map(|_| ()))?;

    let unit = db
        .inventory()
        .get_by_id(inventory_id)
        .await?
        .ok_or_else(|| CoreError::InventoryNotFound(inventory_id.to_string()))?;
    let product = db
        .products()
        .get_by_id(&unit.product_id)
        .await?
        .ok_or_else(|| CoreError::InventoryNotFound(inventory_id.to_string()))?;

    let items = catalog::join_catalog(std::slice::from_ref(&product), std::slice::from_ref(&unit));
    let item = items
        .into_iter()
        .next()
        .ok_or_else(|| CoreError::InventoryNotFound(inventory_id.to_string()))?;

    session.with_session_mut(|s| s.cart.add(&item, s.price_mode))?;
    Ok(cart_view(session))
}

/// Removes the cart line at the given position. Out-of-range is a no-op.
pub fn remove_from_cart(session: &SessionState, index: usize) -> CartView {
    session.with_session_mut(|s| s.cart.remove(index));
    cart_view(session)
}

/// Switches the active price tier. Lines already in the cart keep the price
/// they locked in when added.
pub fn set_price_mode(session: &SessionState, mode: PriceMode) {
    session.with_session_mut(|s| s.price_mode = mode);
}

/// Updates the customer-name entry field.
pub fn set_customer_name(session: &SessionState, name: &str) {
    session.with_session_mut(|s| s.customer_name = name.to_string());
}

/// Updates the cash-tendered entry field. `None` means left blank (exact
/// payment assumed at checkout). Negative amounts are rejected; the field
/// keeps its previous value.
pub fn set_cash_given(session: &SessionState, cash: Option<Money>) -> AppResult<()> {
    if let Some(cash) = cash {
        validation::validate_cash_given_cents(cash.cents()).map_err(CoreError::from)?;
    }
    session.with_session_mut(|s| s.cash_given = cash);
    Ok(())
}

// =============================================================================
// Checkout
// =============================================================================

/// What a committed checkout hands back to the UI.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutOutcome {
    /// The committed sale, ready for the receipt projections.
    pub sale: SaleRecord,

    /// Path of the automatic backup, when this sale was the Nth.
    pub auto_backup: Option<PathBuf>,
}

/// Commits the current cart as a sale.
///
/// `confirm_short_payment` re-issues a checkout the operator has approved
/// after a `CONFIRMATION_REQUIRED` response; a first attempt passes `false`.
///
/// `backup_dir`, when set, enables the every-Nth-sale automatic backup. A
/// failed auto-backup is logged but never fails the already-committed sale.
pub async fn checkout(
    db: &Database,
    session: &SessionState,
    confirm_short_payment: bool,
    backup_dir: Option<&Path>,
) -> AppResult<CheckoutOutcome> {
    // Build the frozen record under the session lock, without touching I/O.
    let sale = session.with_session_mut(|s| -> AppResult<SaleRecord> {
        let operator = s.require_user()?.username.clone();

        if s.cart.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }

        let total = s.cart.total();
        let cash_given = s.cash_given.unwrap_or(total);

        if cash_given < total && !confirm_short_payment {
            return Err(CoreError::ShortPaymentNeedsConfirmation {
                total,
                cash_given,
            }
            .into());
        }

        let customer = s.customer_name.trim();
        let customer_name = if customer.is_empty() {
            DEFAULT_CUSTOMER_NAME.to_string()
        } else {
            customer.to_string()
        };

        Ok(SaleRecord {
            id: Uuid::new_v4().to_string(),
            date: Utc::now(),
            customer_name,
            total_cents: total,
            cash_given_cents: cash_given,
            balance_cents: cash_given - total,
            processed_by: operator,
            items: s.cart.to_sale_lines(),
        })
    })?;

    db.checkout().process(&sale).await?;

    session.with_session_mut(|s| {
        s.cart.clear();
        s.reset_entry_fields();
    });

    info!(id = %sale.id, total = %sale.total_cents, "Checkout complete");

    let auto_backup = maybe_auto_backup(db, backup_dir).await;

    Ok(CheckoutOutcome { sale, auto_backup })
}

/// Writes the automatic backup when the all-time sale count hits a multiple
/// of [`AUTO_BACKUP_EVERY`]. Best effort: failures are logged, not raised.
async fn maybe_auto_backup(db: &Database, backup_dir: Option<&Path>) -> Option<PathBuf> {
    let dir = backup_dir?;

    let count = match db.sales().count().await {
        Ok(c) => c,
        Err(e) => {
            warn!("Auto-backup sale count failed: {}", e);
            return None;
        }
    };

    if count == 0 || count % AUTO_BACKUP_EVERY != 0 {
        return None;
    }

    match db.backup().export_to_file(dir).await {
        Ok(path) => {
            info!(path = %path.display(), sales = count, "Automatic backup written");
            Some(path)
        }
        Err(e) => {
            warn!("Automatic backup failed: {}", e);
            None
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
