//! Persisted wishlist store.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use aurora_core::{Product, ProductId, Wishlist};
use tracing::instrument;

use super::{load_or_default, persist};
use crate::persistence::{StateStore, keys};

/// Handle to the shopper's wishlist. Clones share the same list.
#[derive(Clone)]
pub struct WishlistStore {
    inner: Arc<RwLock<Wishlist>>,
    persistence: Arc<dyn StateStore>,
}

impl WishlistStore {
    /// Restore the wishlist from `persistence`, or start empty.
    #[must_use]
    pub fn load(persistence: Arc<dyn StateStore>) -> Self {
        let wishlist: Wishlist = load_or_default(persistence.as_ref(), keys::WISHLIST);
        Self {
            inner: Arc::new(RwLock::new(wishlist)),
            persistence,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Wishlist> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Wishlist> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn mutate(&self, f: impl FnOnce(&mut Wishlist) -> bool) -> bool {
        let mut wishlist = self.write();
        let changed = f(&mut wishlist);
        if changed {
            persist(self.persistence.as_ref(), keys::WISHLIST, &*wishlist);
        }
        changed
    }

    /// Save `product`. Already-saved products are left as they are.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_to_wishlist(&self, product: Product) -> bool {
        self.mutate(|w| w.add(product))
    }

    /// Forget `product_id`. Absent ids are ignored.
    #[instrument(skip(self))]
    pub fn remove_from_wishlist(&self, product_id: ProductId) -> bool {
        self.mutate(|w| w.remove(product_id))
    }

    /// Flip membership for `product`. Returns whether it is now saved.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn toggle(&self, product: Product) -> bool {
        let mut wishlist = self.write();
        let saved = wishlist.toggle(product);
        persist(self.persistence.as_ref(), keys::WISHLIST, &*wishlist);
        saved
    }

    #[must_use]
    pub fn is_in_wishlist(&self, product_id: ProductId) -> bool {
        self.read().contains(product_id)
    }

    #[instrument(skip(self))]
    pub fn clear_wishlist(&self) {
        self.mutate(|w| {
            let had_items = !w.is_empty();
            w.clear();
            had_items
        });
    }

    #[must_use]
    pub fn wishlist_count(&self) -> usize {
        self.read().len()
    }

    /// Copy of the current wishlist.
    #[must_use]
    pub fn snapshot(&self) -> Wishlist {
        self.read().clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use aurora_core::Rating;
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    use super::*;
    use crate::persistence::{JsonFileStore, MemoryStore};

    fn product(id: i32) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Saved {id}"),
            description: String::new(),
            price: Decimal::new(20, 0),
            category: "jewelery".to_string(),
            image: String::new(),
            rating: Rating::default(),
            brand: None,
            discounted_price: None,
        }
    }

    #[test]
    fn test_add_twice_counts_once() {
        let store = WishlistStore::load(Arc::new(MemoryStore::new()));
        assert!(store.add_to_wishlist(product(1)));
        assert!(!store.add_to_wishlist(product(1)));
        assert_eq!(store.wishlist_count(), 1);
        assert!(store.is_in_wishlist(ProductId::new(1)));
    }

    #[test]
    fn test_remove_absent_does_not_error() {
        let store = WishlistStore::load(Arc::new(MemoryStore::new()));
        store.add_to_wishlist(product(1));

        assert!(!store.remove_from_wishlist(ProductId::new(42)));
        assert_eq!(store.wishlist_count(), 1);
    }

    #[test]
    fn test_toggle_and_clear() {
        let store = WishlistStore::load(Arc::new(MemoryStore::new()));
        assert!(store.toggle(product(3)));
        assert!(store.toggle(product(4)));
        assert!(!store.toggle(product(3)));
        assert_eq!(store.wishlist_count(), 1);

        store.clear_wishlist();
        assert_eq!(store.wishlist_count(), 0);
    }

    #[test]
    fn test_restores_from_disk() {
        let tmp = TempDir::new().unwrap();
        {
            let store = WishlistStore::load(Arc::new(JsonFileStore::new(tmp.path())));
            store.add_to_wishlist(product(1));
            store.add_to_wishlist(product(2));
            store.remove_from_wishlist(ProductId::new(1));
        }

        let reloaded = WishlistStore::load(Arc::new(JsonFileStore::new(tmp.path())));
        assert_eq!(reloaded.wishlist_count(), 1);
        assert!(reloaded.is_in_wishlist(ProductId::new(2)));
    }
}
