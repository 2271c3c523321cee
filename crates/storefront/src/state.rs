//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::{CatalogError, FakeStoreClient, ProductCatalog};
use crate::config::StorefrontConfig;
use crate::persistence::{JsonFileStore, MemoryStore, StateStore};
use crate::stores::{AuthStore, CartStore, LocalAccounts, WishlistStore};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The stores are built once at
/// startup and handed to handlers through here; nothing is global.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Arc<dyn ProductCatalog>,
    cart: CartStore,
    wishlist: WishlistStore,
    auth: AuthStore,
}

impl AppState {
    /// Create the application state from configuration.
    ///
    /// Restores the cart, wishlist, session and accounts from the data
    /// directory (or keeps them in memory when `ephemeral` is set) and
    /// connects the catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, CatalogError> {
        let persistence: Arc<dyn StateStore> = if config.ephemeral {
            tracing::info!("Keeping shopper state in memory only");
            Arc::new(MemoryStore::new())
        } else {
            tracing::info!(data_dir = %config.data_dir.display(), "Persisting shopper state");
            Arc::new(JsonFileStore::new(&config.data_dir))
        };
        let catalog = Arc::new(FakeStoreClient::new(&config.catalog)?);

        Ok(Self::from_parts(config, catalog, persistence))
    }

    /// Assemble state from an explicit catalog and persistence backend.
    #[must_use]
    pub fn from_parts(
        config: StorefrontConfig,
        catalog: Arc<dyn ProductCatalog>,
        persistence: Arc<dyn StateStore>,
    ) -> Self {
        let identity = Arc::new(LocalAccounts::load(Arc::clone(&persistence)));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                cart: CartStore::load(Arc::clone(&persistence)),
                wishlist: WishlistStore::load(Arc::clone(&persistence)),
                auth: AuthStore::load(persistence, identity),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &dyn ProductCatalog {
        self.inner.catalog.as_ref()
    }

    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    #[must_use]
    pub fn wishlist(&self) -> &WishlistStore {
        &self.inner.wishlist
    }

    #[must_use]
    pub fn auth(&self) -> &AuthStore {
        &self.inner.auth
    }
}
