//! Wishlist aggregate: a deduplicated, insertion-ordered set of products.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::types::ProductId;

/// Products the shopper has saved for later.
///
/// Membership checks go through a hash index; the product list keeps the
/// order in which items were liked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Product>", into = "Vec<Product>")]
pub struct Wishlist {
    products: Vec<Product>,
    index: HashSet<ProductId>,
}

impl Wishlist {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Save `product`. Returns `false` if it was already saved.
    pub fn add(&mut self, product: Product) -> bool {
        if !self.index.insert(product.id) {
            return false;
        }
        self.products.push(product);
        true
    }

    /// Forget `product_id`. Returns `false` if it was not saved.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        if !self.index.remove(&product_id) {
            return false;
        }
        self.products.retain(|p| p.id != product_id);
        true
    }

    /// Remove when present, add otherwise. Returns the new membership.
    pub fn toggle(&mut self, product: Product) -> bool {
        if self.contains(product.id) {
            self.remove(product.id);
            false
        } else {
            self.add(product)
        }
    }

    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.index.contains(&product_id)
    }

    pub fn clear(&mut self) {
        self.products.clear();
        self.index.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Saved products, oldest first.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }
}

impl From<Vec<Product>> for Wishlist {
    fn from(products: Vec<Product>) -> Self {
        let mut wishlist = Self::new();
        for product in products {
            wishlist.add(product);
        }
        wishlist
    }
}

impl From<Wishlist> for Vec<Product> {
    fn from(wishlist: Wishlist) -> Self {
        wishlist.products
    }
}
