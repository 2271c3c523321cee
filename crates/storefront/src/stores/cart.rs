//! Persisted cart store.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use aurora_core::{Cart, Product, ProductId};
use rust_decimal::Decimal;
use tracing::instrument;

use super::{load_or_default, persist};
use crate::persistence::{StateStore, keys};

/// Handle to the shopper's cart.
///
/// Clones share the same cart. Operations never fail: unknown ids are
/// ignored and persistence errors are only logged.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<RwLock<Cart>>,
    persistence: Arc<dyn StateStore>,
}

impl CartStore {
    /// Restore the cart from `persistence`, or start empty.
    #[must_use]
    pub fn load(persistence: Arc<dyn StateStore>) -> Self {
        let cart: Cart = load_or_default(persistence.as_ref(), keys::CART);
        Self {
            inner: Arc::new(RwLock::new(cart)),
            persistence,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Cart> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Cart> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` against the cart and save if it reports a change.
    fn mutate(&self, f: impl FnOnce(&mut Cart) -> bool) -> bool {
        let mut cart = self.write();
        let changed = f(&mut cart);
        if changed {
            persist(self.persistence.as_ref(), keys::CART, &*cart);
        }
        changed
    }

    /// Add one unit of `product`, merging with an existing line.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_item(&self, product: Product) {
        self.add_items(product, 1);
    }

    /// Add `quantity` units of `product`. Zero is a no-op.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_items(&self, product: Product, quantity: u32) {
        self.mutate(|cart| {
            cart.add_items(product, quantity);
            quantity > 0
        });
    }

    /// Remove the line for `product_id`, if any.
    #[instrument(skip(self))]
    pub fn remove_item(&self, product_id: ProductId) -> bool {
        self.mutate(|cart| cart.remove_item(product_id))
    }

    /// Set a line's quantity. Zero or less removes it; unknown ids are ignored.
    #[instrument(skip(self))]
    pub fn update_quantity(&self, product_id: ProductId, quantity: i64) -> bool {
        self.mutate(|cart| cart.update_quantity(product_id, quantity))
    }

    /// Empty the cart.
    #[instrument(skip(self))]
    pub fn clear_cart(&self) {
        self.mutate(|cart| {
            cart.clear();
            true
        });
    }

    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.read().total_items()
    }

    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.read().total_price()
    }

    #[must_use]
    pub fn item_quantity(&self, product_id: ProductId) -> u32 {
        self.read().item_quantity(product_id)
    }

    /// Copy of the current cart.
    #[must_use]
    pub fn snapshot(&self) -> Cart {
        self.read().clone()
    }

    /// Clear the cart and return what it held, under one lock.
    ///
    /// Used by checkout so nothing can be added between reading the cart
    /// and emptying it.
    pub fn take(&self) -> Cart {
        let mut cart = self.write();
        let taken = std::mem::take(&mut *cart);
        persist(self.persistence.as_ref(), keys::CART, &*cart);
        taken
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use aurora_core::Rating;
    use tempfile::TempDir;

    use super::*;
    use crate::persistence::{JsonFileStore, MemoryStore};

    fn product(id: i32, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            description: String::new(),
            price: Decimal::new(price, 0),
            category: "electronics".to_string(),
            image: String::new(),
            rating: Rating::default(),
            brand: None,
            discounted_price: None,
        }
    }

    fn memory() -> Arc<dyn StateStore> {
        Arc::new(MemoryStore::new())
    }

    #[test]
    fn test_totals_scenario() {
        let store = CartStore::load(memory());
        store.add_item(product(1, 10));
        store.add_item(product(1, 10));
        store.add_item(product(2, 5));

        assert_eq!(store.total_items(), 3);
        assert_eq!(store.total_price(), Decimal::new(25, 0));
        assert_eq!(store.snapshot().lines().len(), 2);
    }

    #[test]
    fn test_clones_share_state() {
        let store = CartStore::load(memory());
        let other = store.clone();
        store.add_items(product(7, 3), 4);

        assert_eq!(other.item_quantity(ProductId::new(7)), 4);
    }

    #[test]
    fn test_every_mutation_is_saved() {
        let persistence = memory();
        let store = CartStore::load(Arc::clone(&persistence));

        store.add_items(product(1, 10), 2);
        let saved: Cart = persistence.load(keys::CART).unwrap().unwrap();
        assert_eq!(saved.total_items(), 2);

        store.update_quantity(ProductId::new(1), 0);
        let saved: Cart = persistence.load(keys::CART).unwrap().unwrap();
        assert!(saved.is_empty());
    }

    #[test]
    fn test_restores_from_disk() {
        let tmp = TempDir::new().unwrap();
        {
            let store = CartStore::load(Arc::new(JsonFileStore::new(tmp.path())));
            store.add_items(product(1, 10), 2);
            store.add_item(product(2, 5));
        }

        let reloaded = CartStore::load(Arc::new(JsonFileStore::new(tmp.path())));
        assert_eq!(reloaded.total_items(), 3);
        assert_eq!(reloaded.total_price(), Decimal::new(25, 0));
    }

    #[test]
    fn test_unreadable_record_starts_empty() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("cart.json"), b"[{\"oops\": true}]").unwrap();

        let store = CartStore::load(Arc::new(JsonFileStore::new(tmp.path())));
        assert_eq!(store.total_items(), 0);
    }

    #[test]
    fn test_take_empties_and_returns_contents() {
        let store = CartStore::load(memory());
        store.add_items(product(1, 10), 2);

        let taken = store.take();
        assert_eq!(taken.total_items(), 2);
        assert_eq!(store.total_items(), 0);
    }
}
