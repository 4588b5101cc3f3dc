//! # Catalog Join Layer
//!
//! Combines the product and inventory collections into flat, searchable
//! sale-able items for the POS grid.
//!
//! ## Join Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  products                inventory                 catalog items        │
//! │  ─────────               ─────────                 ─────────────        │
//! │  T-Shirt (TS1) ◄───────  unit A (M/Red,  qty 10)   T-Shirt M/Red        │
//! │                ◄───────  unit B (L/Blue, qty  4)   T-Shirt L/Blue       │
//! │  (missing)     ◄── ✗ ──  unit C (orphan)           (silently dropped)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Orphan tolerance is deliberate: a unit whose `product_id` no longer
//! resolves is excluded, not reported.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{InventoryUnit, PriceMode, Product};

/// A flat sale-able item: all product fields plus all inventory-unit fields,
/// with the unit's own identity exposed as `inventory_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub inventory_id: String,
    pub product_id: String,
    pub name: String,
    pub sku: String,
    pub category: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    /// On-hand quantity as of the join. This is the value the cart's
    /// add-time stock check reads.
    pub quantity: i64,
    pub buying_price_cents: Money,
    pub retail_price_cents: Money,
    pub wholesale_price_cents: Money,
}

impl CatalogItem {
    /// Resolves the unit price for the given price mode.
    pub fn price_for(&self, mode: PriceMode) -> Money {
        match mode {
            PriceMode::Retail => self.retail_price_cents,
            PriceMode::Wholesale => self.wholesale_price_cents,
        }
    }
}

/// Joins the full product and inventory collections into sale-able items.
///
/// Units whose `product_id` does not resolve are silently dropped. Does not
/// mutate the inputs.
pub fn join_catalog(products: &[Product], inventory: &[InventoryUnit]) -> Vec<CatalogItem> {
    let by_id: HashMap<&str, &Product> = products.iter().map(|p| (p.id.as_str(), p)).collect();

    inventory
        .iter()
        .filter_map(|unit| {
            let product = by_id.get(unit.product_id.as_str())?;
            Some(CatalogItem {
                inventory_id: unit.id.clone(),
                product_id: product.id.clone(),
                name: product.name.clone(),
                sku: product.sku.clone(),
                category: product.category.clone(),
                size: unit.size.clone(),
                color: unit.color.clone(),
                quantity: unit.quantity,
                buying_price_cents: unit.buying_price_cents,
                retail_price_cents: unit.retail_price_cents,
                wholesale_price_cents: unit.wholesale_price_cents,
            })
        })
        .collect()
}

/// Case-insensitive substring filter by name or SKU.
///
/// Produces a new sequence; cheap enough to run on every keystroke, so no
/// debouncing is needed upstream.
pub fn filter_catalog(items: &[CatalogItem], query: &str) -> Vec<CatalogItem> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return items.to_vec();
    }

    items
        .iter()
        .filter(|item| {
            item.name.to_lowercase().contains(&query) || item.sku.to_lowercase().contains(&query)
        })
        .cloned()
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(id: &str, name: &str, sku: &str) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            sku: sku.to_string(),
            category: None,
            created_at: Utc::now(),
        }
    }

    fn unit(id: &str, product_id: &str, qty: i64) -> InventoryUnit {
        InventoryUnit {
            id: id.to_string(),
            product_id: product_id.to_string(),
            size: Some("M".to_string()),
            color: None,
            quantity: qty,
            buying_price_cents: Money::from_cents(30000),
            retail_price_cents: Money::from_cents(50000),
            wholesale_price_cents: Money::from_cents(40000),
        }
    }

    #[test]
    fn test_join_carries_both_sides() {
        let products = vec![product("p1", "T-Shirt", "TS1")];
        let inventory = vec![unit("u1", "p1", 10)];

        let items = join_catalog(&products, &inventory);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].inventory_id, "u1");
        assert_eq!(items[0].product_id, "p1");
        assert_eq!(items[0].name, "T-Shirt");
        assert_eq!(items[0].quantity, 10);
    }

    #[test]
    fn test_join_drops_orphans() {
        let products = vec![product("p1", "T-Shirt", "TS1")];
        let inventory = vec![unit("u1", "p1", 10), unit("u2", "missing", 3)];

        let items = join_catalog(&products, &inventory);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].inventory_id, "u1");
    }

    #[test]
    fn test_filter_case_insensitive_name_and_sku() {
        let products = vec![
            product("p1", "T-Shirt", "TS1"),
            product("p2", "Denim Jeans", "DJ9"),
        ];
        let inventory = vec![unit("u1", "p1", 10), unit("u2", "p2", 5)];
        let items = join_catalog(&products, &inventory);

        assert_eq!(filter_catalog(&items, "shirt").len(), 1);
        assert_eq!(filter_catalog(&items, "SHIRT").len(), 1);
        assert_eq!(filter_catalog(&items, "dj9").len(), 1);
        assert_eq!(filter_catalog(&items, "zzz").len(), 0);
    }

    #[test]
    fn test_filter_empty_query_returns_all() {
        let products = vec![product("p1", "T-Shirt", "TS1")];
        let inventory = vec![unit("u1", "p1", 10)];
        let items = join_catalog(&products, &inventory);

        assert_eq!(filter_catalog(&items, "").len(), 1);
        assert_eq!(filter_catalog(&items, "   ").len(), 1);
    }

    #[test]
    fn test_filter_does_not_mutate_source() {
        let products = vec![product("p1", "T-Shirt", "TS1")];
        let inventory = vec![unit("u1", "p1", 10)];
        let items = join_catalog(&products, &inventory);

        let _ = filter_catalog(&items, "nothing");
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_price_for_mode() {
        let products = vec![product("p1", "T-Shirt", "TS1")];
        let inventory = vec![unit("u1", "p1", 10)];
        let items = join_catalog(&products, &inventory);

        assert_eq!(items[0].price_for(PriceMode::Retail).cents(), 50000);
        assert_eq!(items[0].price_for(PriceMode::Wholesale).cents(), 40000);
    }
}
