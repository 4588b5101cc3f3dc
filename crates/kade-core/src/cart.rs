//! # Cart
//!
//! In-memory ordered list of selected items with quantity and locked-in
//! price. Exists only for the duration of building one sale; destroyed on
//! checkout or explicit clear.
//!
//! ## Price Locking
//! The unit price is resolved from the active price mode when the item is
//! added. Switching the price mode afterwards does NOT retroactively
//! reprice existing cart lines - this is an explicit policy choice, not a
//! bug. A second add of the same unit under a different mode therefore
//! creates a second line rather than merging.
//!
//! ## Stock Check
//! The add-time check reads the on-hand quantity observed on the catalog
//! item. The checkout transaction re-guards every decrement at the storage
//! layer, so an interleaving that drains stock between add and checkout
//! fails the whole checkout instead of driving stock negative.

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogItem;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{PriceMode, SaleLine};

/// One line of the cart: a snapshot of the catalog item plus the locked
/// price and quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub inventory_id: String,
    pub name: String,
    pub sku: String,
    pub size: Option<String>,
    pub color: Option<String>,

    /// Unit price locked at add time.
    pub unit_price: Money,

    /// Quantity in the cart.
    pub quantity: i64,

    /// On-hand quantity observed when the line was first added. The cart
    /// never lets `quantity` exceed this.
    pub available: i64,
}

impl CartLine {
    fn from_item(item: &CatalogItem, unit_price: Money) -> Self {
        CartLine {
            inventory_id: item.inventory_id.clone(),
            name: item.name.clone(),
            sku: item.sku.clone(),
            size: item.size.clone(),
            color: item.color.clone(),
            unit_price,
            quantity: 1,
            available: item.quantity,
        }
    }

    /// Line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// Converts this line into the frozen snapshot embedded in a sale.
    pub fn to_sale_line(&self) -> SaleLine {
        SaleLine {
            inventory_id: self.inventory_id.clone(),
            name: self.name.clone(),
            sku: self.sku.clone(),
            size: self.size.clone(),
            color: self.color.clone(),
            unit_price_cents: self.unit_price,
            quantity: self.quantity,
        }
    }
}

/// The in-memory cart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds a catalog item under the given price mode.
    ///
    /// ## Behavior
    /// - A line matching the same `inventory_id` AND the same resolved
    ///   price has its quantity incremented, provided the new quantity
    ///   would not exceed the unit's on-hand quantity observed at add time.
    /// - Otherwise a new line is appended with quantity 1, subject to the
    ///   same stock check.
    /// - On insufficient stock the cart is left unchanged.
    pub fn add(&mut self, item: &CatalogItem, mode: PriceMode) -> CoreResult<()> {
        let price = item.price_for(mode);

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.inventory_id == item.inventory_id && l.unit_price == price)
        {
            if line.quantity + 1 > item.quantity {
                return Err(CoreError::InsufficientStock {
                    sku: item.sku.clone(),
                    available: item.quantity,
                    requested: line.quantity + 1,
                });
            }
            line.quantity += 1;
            return Ok(());
        }

        if item.quantity < 1 {
            return Err(CoreError::InsufficientStock {
                sku: item.sku.clone(),
                available: item.quantity,
                requested: 1,
            });
        }

        self.lines.push(CartLine::from_item(item, price));
        Ok(())
    }

    /// Removes the line at the given position.
    ///
    /// Ordering is positional, not by stable line identity: a rapid double
    /// removal can hit the wrong line, and an out-of-range index is a
    /// silent no-op. Known hazard, kept as documented behavior.
    pub fn remove(&mut self, index: usize) {
        if index < self.lines.len() {
            self.lines.remove(index);
        }
    }

    /// Sum of `price × qty` over all lines. Pure, no side effects.
    pub fn total(&self) -> Money {
        self.lines
            .iter()
            .fold(Money::zero(), |acc, line| acc + line.line_total())
    }

    /// Empties the cart. Invoked after a successful checkout.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Deep copy of the lines as frozen sale snapshots.
    pub fn to_sale_lines(&self) -> Vec<SaleLine> {
        self.lines.iter().map(CartLine::to_sale_line).collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(inventory_id: &str, sku: &str, qty: i64, retail: i64, wholesale: i64) -> CatalogItem {
        CatalogItem {
            inventory_id: inventory_id.to_string(),
            product_id: "p1".to_string(),
            name: format!("Item {}", sku),
            sku: sku.to_string(),
            category: None,
            size: None,
            color: None,
            quantity: qty,
            buying_price_cents: Money::from_cents(retail / 2),
            retail_price_cents: Money::from_cents(retail),
            wholesale_price_cents: Money::from_cents(wholesale),
        }
    }

    #[test]
    fn test_add_new_line_starts_at_one() {
        let mut cart = Cart::new();
        cart.add(&item("u1", "TS1", 10, 50000, 40000), PriceMode::Retail)
            .unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines()[0].quantity, 1);
        assert_eq!(cart.lines()[0].unit_price.cents(), 50000);
    }

    #[test]
    fn test_add_same_unit_same_price_merges() {
        let mut cart = Cart::new();
        let it = item("u1", "TS1", 10, 50000, 40000);
        cart.add(&it, PriceMode::Retail).unwrap();
        cart.add(&it, PriceMode::Retail).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn test_mode_switch_does_not_reprice_existing_lines() {
        let mut cart = Cart::new();
        let it = item("u1", "TS1", 10, 10000, 8000);
        cart.add(&it, PriceMode::Retail).unwrap();

        // Same unit under wholesale is a different resolved price, so it
        // becomes a separate line; the retail line keeps its price.
        cart.add(&it, PriceMode::Wholesale).unwrap();

        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.lines()[0].unit_price.cents(), 10000);
        assert_eq!(cart.lines()[1].unit_price.cents(), 8000);
        assert_eq!(cart.total().cents(), 18000);
    }

    #[test]
    fn test_add_respects_observed_stock() {
        let mut cart = Cart::new();
        let it = item("u1", "TS1", 2, 50000, 40000);
        cart.add(&it, PriceMode::Retail).unwrap();
        cart.add(&it, PriceMode::Retail).unwrap();

        let err = cart.add(&it, PriceMode::Retail).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientStock { available: 2, requested: 3, .. }));
        // Cart unchanged by the failed add
        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn test_add_out_of_stock_item_rejected() {
        let mut cart = Cart::new();
        let err = cart
            .add(&item("u1", "TS1", 0, 50000, 40000), PriceMode::Retail)
            .unwrap_err();
        assert!(matches!(err, CoreError::InsufficientStock { .. }));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_total_tracks_lines_at_every_point() {
        let mut cart = Cart::new();
        assert_eq!(cart.total().cents(), 0);

        cart.add(&item("u1", "TS1", 10, 50000, 40000), PriceMode::Retail)
            .unwrap();
        assert_eq!(cart.total().cents(), 50000);

        cart.add(&item("u2", "DJ9", 5, 30000, 25000), PriceMode::Retail)
            .unwrap();
        assert_eq!(cart.total().cents(), 80000);

        cart.remove(0);
        assert_eq!(cart.total().cents(), 30000);
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let mut cart = Cart::new();
        cart.add(&item("u1", "TS1", 10, 50000, 40000), PriceMode::Retail)
            .unwrap();

        cart.remove(5);
        assert_eq!(cart.line_count(), 1);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add(&item("u1", "TS1", 10, 50000, 40000), PriceMode::Retail)
            .unwrap();
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total().cents(), 0);
    }

    #[test]
    fn test_to_sale_lines_is_deep_copy() {
        let mut cart = Cart::new();
        let it = item("u1", "TS1", 10, 50000, 40000);
        cart.add(&it, PriceMode::Retail).unwrap();
        cart.add(&it, PriceMode::Retail).unwrap();

        let lines = cart.to_sale_lines();
        cart.clear();

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[0].unit_price_cents.cents(), 50000);
    }
}
