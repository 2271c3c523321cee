//! Cart aggregate.
//!
//! Holds one line per distinct product, in insertion order. Adding a product
//! that is already present bumps its quantity instead of appending a second
//! line, and a line whose quantity drops to zero is removed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::types::ProductId;

/// A product snapshot and how many units of it are in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    /// Always at least 1 while the line is in a cart.
    pub quantity: u32,
}

impl CartLine {
    /// Effective unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.effective_price() * Decimal::from(self.quantity)
    }
}

/// The shopper's cart.
///
/// Serializes as a plain array of lines. Deserializing merges duplicate
/// product ids and drops zero-quantity lines, so a hand-edited file cannot
/// break the one-line-per-product invariant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add one unit of `product`.
    pub fn add_item(&mut self, product: Product) {
        self.add_items(product, 1);
    }

    /// Add `quantity` units of `product`, merging with an existing line.
    ///
    /// A quantity of zero leaves the cart untouched.
    pub fn add_items(&mut self, product: Product, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self.position(product.id) {
            Some(index) => {
                if let Some(line) = self.lines.get_mut(index) {
                    line.quantity = line.quantity.saturating_add(quantity);
                }
            }
            None => self.lines.push(CartLine { product, quantity }),
        }
    }

    /// Remove the line for `product_id`. Returns whether a line was removed.
    pub fn remove_item(&mut self, product_id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.product.id != product_id);
        self.lines.len() != before
    }

    /// Set the quantity for `product_id`.
    ///
    /// Zero or less removes the line. Quantities past `u32::MAX` saturate.
    /// Unknown ids are ignored. Returns whether the cart changed.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove_item(product_id);
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        match self.lines.iter_mut().find(|l| l.product.id == product_id) {
            Some(line) if line.quantity != quantity => {
                line.quantity = quantity;
                true
            }
            _ => false,
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Sum of effective price times quantity over all lines.
    ///
    /// Recomputed on every call from the line snapshots.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Quantity held for `product_id`, or 0.
    #[must_use]
    pub fn item_quantity(&self, product_id: ProductId) -> u32 {
        self.lines
            .iter()
            .find(|l| l.product.id == product_id)
            .map_or(0, |l| l.quantity)
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.lines.iter().position(|l| l.product.id == product_id)
    }
}

impl From<Vec<CartLine>> for Cart {
    fn from(lines: Vec<CartLine>) -> Self {
        let mut cart = Self::new();
        for line in lines {
            cart.add_items(line.product, line.quantity);
        }
        cart
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}
