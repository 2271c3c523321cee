//! Persisted shopper-state stores.
//!
//! Each store owns one aggregate from `aurora-core` behind a lock and a
//! handle to the shared [`StateStore`]. Handles are cheap to clone and are
//! injected through [`AppState`](crate::state::AppState); there is no global
//! state.
//!
//! # Persistence contract
//!
//! - Load once on construction. A missing record starts empty; an unreadable
//!   one is logged and also starts empty.
//! - Save after every operation that changed the aggregate, while still
//!   holding the write lock, so saves land in mutation order.
//! - Save failures are logged and swallowed. In-memory state stays
//!   authoritative for the rest of the process.

pub mod auth;
pub mod cart;
pub mod wishlist;

pub use auth::{AuthError, AuthStore, IdentityProvider, LocalAccounts};
pub use cart::CartStore;
pub use wishlist::WishlistStore;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::persistence::StateStore;

/// Load a record, falling back to `T::default()` when absent or unreadable.
fn load_or_default<T: DeserializeOwned + Default>(store: &dyn StateStore, key: &str) -> T {
    match store.load::<T>(key) {
        Ok(Some(value)) => {
            tracing::debug!(key, "Restored persisted record");
            value
        }
        Ok(None) => T::default(),
        Err(e) => {
            tracing::warn!(key, error = %e, "Ignoring unreadable persisted record");
            T::default()
        }
    }
}

/// Save a record, logging instead of failing.
fn persist<T: Serialize + ?Sized>(store: &dyn StateStore, key: &str, value: &T) {
    if let Err(e) = store.save(key, value) {
        tracing::error!(key, error = %e, "Failed to persist record");
    }
}
