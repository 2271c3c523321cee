//! Product catalog clients.
//!
//! # Architecture
//!
//! - The remote catalog is the source of truth for products; nothing is
//!   synced locally apart from the snapshots the cart and wishlist keep
//! - Plain JSON over HTTP GET via `reqwest`, no retries
//! - In-memory caching via `moka` for API responses (5 minute TTL)
//!
//! Handlers depend on the [`ProductCatalog`] trait so tests and offline runs
//! can swap in [`StaticCatalog`].
//!
//! # Example
//!
//! ```rust,ignore
//! use aurora_storefront::catalog::{FakeStoreClient, ProductCatalog};
//!
//! let client = FakeStoreClient::new(&config.catalog)?;
//! let product = client.product(ProductId::new(1)).await?;
//! let jewelery = client.products_in_category("jewelery").await?;
//! ```

mod cache;
mod fakestore;
mod memory;

pub use fakestore::FakeStoreClient;
pub use memory::StaticCatalog;

use async_trait::async_trait;
use aurora_core::{Product, ProductId};
use thiserror::Error;

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("catalog returned HTTP {0}")]
    Status(u16),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A request URL could not be built from the configured base URL.
    #[error("invalid catalog URL: {0}")]
    Url(String),
}

/// Read-only access to the product catalog.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// All products, or the first `limit` of them.
    async fn products(&self, limit: Option<usize>) -> Result<Vec<Product>, CatalogError>;

    /// One product by id.
    async fn product(&self, id: ProductId) -> Result<Product, CatalogError>;

    /// Category names, in catalog order.
    async fn categories(&self) -> Result<Vec<String>, CatalogError>;

    /// Products in one category.
    async fn products_in_category(&self, category: &str) -> Result<Vec<Product>, CatalogError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::NotFound("product 42".to_string());
        assert_eq!(err.to_string(), "Not found: product 42");

        let err = CatalogError::Status(503);
        assert_eq!(err.to_string(), "catalog returned HTTP 503");
    }
}
