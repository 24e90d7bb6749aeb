//! Shopping cart
//!
//! Totals are computed with `Decimal` internally and returned as `f64`
//! rounded to 2 decimal places.

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::DisplayProduct;

/// Sales tax applied at checkout (8%)
pub const CART_TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

const DECIMAL_PLACES: u32 = 2;

#[inline]
fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

#[inline]
fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Cart line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: DisplayProduct,
    pub quantity: u32,
}

impl CartItem {
    fn line_total(&self) -> Decimal {
        to_decimal(self.product.price) * Decimal::from(self.quantity)
    }
}

/// In-session cart, one line per product id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add a product; an existing line for the same id is merged
    pub fn add(&mut self, product: DisplayProduct, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self.items.iter_mut().find(|i| i.product.id == product.id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(quantity),
            None => self.items.push(CartItem { product, quantity }),
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.items.retain(|i| i.product.id != id);
    }

    /// Adjust a line by `delta`. Changes that would drop the quantity to
    /// zero or below are ignored; use [`Cart::remove`] instead.
    pub fn update_quantity(&mut self, id: &str, delta: i64) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == id) {
            if let Some(next) = i64::from(item.quantity).checked_add(delta)
                && let Ok(next) = u32::try_from(next)
                && next > 0
            {
                item.quantity = next;
            }
        }
    }

    /// Total number of units, saturating at `u32::MAX`
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |count, i| count.saturating_add(i.quantity))
    }

    pub fn subtotal(&self) -> f64 {
        to_f64(self.subtotal_decimal())
    }

    pub fn tax(&self) -> f64 {
        to_f64(self.subtotal_decimal() * CART_TAX_RATE)
    }

    /// Subtotal plus tax
    pub fn total(&self) -> f64 {
        let subtotal = self.subtotal_decimal();
        to_f64(subtotal + subtotal * CART_TAX_RATE)
    }

    fn subtotal_decimal(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CatalogEntry;

    fn product(id: &str, price: f64) -> DisplayProduct {
        DisplayProduct::hydrate(CatalogEntry {
            id: id.to_string(),
            name: format!("Product {id}"),
            price,
            ..Default::default()
        })
    }

    #[test]
    fn test_add_merges_same_product() {
        let mut cart = Cart::new();
        cart.add(product("a", 10.0), 1);
        cart.add(product("a", 10.0), 2);
        cart.add(product("b", 5.0), 1);

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.items()[0].quantity, 3);
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn test_update_quantity_never_drops_to_zero() {
        let mut cart = Cart::new();
        cart.add(product("a", 10.0), 2);

        cart.update_quantity("a", -1);
        assert_eq!(cart.items()[0].quantity, 1);

        cart.update_quantity("a", -1);
        assert_eq!(cart.items()[0].quantity, 1);

        cart.update_quantity("a", 4);
        assert_eq!(cart.items()[0].quantity, 5);

        cart.remove("a");
        assert!(cart.is_empty());
    }

    #[test]
    fn test_quantities_saturate_instead_of_overflowing() {
        let mut cart = Cart::new();
        cart.add(product("a", 1.0), u32::MAX - 1);
        cart.add(product("a", 1.0), 5);
        cart.add(product("b", 1.0), 3);

        assert_eq!(cart.items()[0].quantity, u32::MAX);
        assert_eq!(cart.item_count(), u32::MAX);

        // Out-of-range deltas are ignored
        cart.update_quantity("b", i64::MAX);
        assert_eq!(cart.items()[1].quantity, 3);
    }

    #[test]
    fn test_totals_include_tax() {
        let mut cart = Cart::new();
        cart.add(product("a", 19.99), 2);
        cart.add(product("b", 0.10), 3);

        assert_eq!(cart.subtotal(), 40.28);
        assert_eq!(cart.tax(), 3.22);
        assert_eq!(cart.total(), 43.5);
    }
}
