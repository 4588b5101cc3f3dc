//! # Inventory Commands
//!
//! Stock entry, editing, and deletion. Admin only.
//!
//! ## SKU Attach Semantics
//! Entering stock under a SKU that already exists attaches the new unit to
//! the existing product (and refreshes its display fields) instead of
//! creating a duplicate product. An unknown SKU creates the product.

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use kade_core::{validation, CoreError, InventoryUnit, Money};
use kade_db::Database;

use crate::error::{AppError, AppResult};
use crate::session::SessionState;

/// Input form for creating or editing a stocked unit.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockEntryForm {
    pub sku: String,
    pub name: String,
    pub category: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub quantity: i64,
    pub buying_price_cents: i64,
    pub retail_price_cents: i64,
    pub wholesale_price_cents: i64,
}

impl StockEntryForm {
    fn validate(&self) -> Result<(), CoreError> {
        validation::validate_sku(&self.sku)?;
        validation::validate_product_name(&self.name)?;
        validation::validate_quantity(self.quantity)?;
        validation::validate_price_cents(self.buying_price_cents)?;
        validation::validate_price_cents(self.retail_price_cents)?;
        validation::validate_price_cents(self.wholesale_price_cents)?;
        Ok(())
    }
}

/// Creates a new stocked unit, or updates `existing_unit_id` in place.
///
/// Either way the product side is resolved by SKU: found products get their
/// display fields refreshed from the form, unknown SKUs create a product.
pub async fn save_item(
    db: &Database,
    session: &SessionState,
    form: &StockEntryForm,
    existing_unit_id: Option<&str>,
) -> AppResult<InventoryUnit> {
    session.with_session(|s| s.require_admin().map(|_| ()))?;
    form.validate()?;

    let mut product = db
        .products()
        .get_or_create(&form.sku, &form.name, form.category.as_deref())
        .await?;

    // Refresh display fields when the form renames an existing product.
    let category = form
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(String::from);
    if product.name != form.name.trim() || product.category != category {
        product.name = form.name.trim().to_string();
        product.category = category;
        db.products().update(&product).await?;
    }

    let unit = InventoryUnit {
        id: existing_unit_id
            .map(String::from)
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        product_id: product.id,
        size: form.size.clone().filter(|s| !s.trim().is_empty()),
        color: form.color.clone().filter(|c| !c.trim().is_empty()),
        quantity: form.quantity,
        buying_price_cents: Money::from_cents(form.buying_price_cents),
        retail_price_cents: Money::from_cents(form.retail_price_cents),
        wholesale_price_cents: Money::from_cents(form.wholesale_price_cents),
    };

    match existing_unit_id {
        Some(_) => db.inventory().update(&unit).await?,
        None => db.inventory().insert(&unit).await?,
    }

    info!(id = %unit.id, sku = %form.sku, "Stock entry saved");
    Ok(unit)
}

/// Deletes a stocked unit. Requires an explicit confirmation flag; past
/// sales keep their frozen snapshot of this unit.
pub async fn delete_item(
    db: &Database,
    session: &SessionState,
    unit_id: &str,
    confirmed: bool,
) -> AppResult<()> {
    session.with_session(|s| s.require_admin().map(|_| ()))?;

    if !confirmed {
        return Err(AppError::needs_confirmation(
            "Delete this inventory item? This cannot be undone.",
        ));
    }

    db.inventory().delete(unit_id).await?;
    info!(id = %unit_id, "Inventory unit deleted");
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
