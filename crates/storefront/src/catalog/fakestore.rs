//! HTTP client for the Fake Store product API.
//!
//! Caches every successful response using `moka` (5-minute TTL). Failures
//! are never cached, so the next page load simply tries again.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use aurora_core::{Product, ProductId};
use moka::future::Cache;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::cache::{CacheKey, CacheValue};
use super::{CatalogError, ProductCatalog};
use crate::config::CatalogConfig;

/// Client for the catalog's REST endpoints:
///
/// ```text
/// GET /products[?limit=N]
/// GET /products/{id}
/// GET /products/categories
/// GET /products/category/{name}
/// ```
#[derive(Clone)]
pub struct FakeStoreClient {
    inner: Arc<FakeStoreClientInner>,
}

struct FakeStoreClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl FakeStoreClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Http` if the HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("aurora-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(FakeStoreClientInner {
                client,
                base_url: config.base_url.clone(),
                cache,
            }),
        })
    }

    /// Build `<base_url>/<segments..>`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, CatalogError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| CatalogError::Url(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET a JSON document. Returns `None` for 404 and for the empty or
    /// `null` bodies the API sends for unknown ids.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, CatalogError> {
        let response = self.inner.client.get(url.clone()).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                url = %url,
                body = %body.chars().take(200).collect::<String>(),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Status(status.as_u16()));
        }

        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(None);
        }

        match serde_json::from_str(trimmed) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    url = %url,
                    body = %body.chars().take(500).collect::<String>(),
                    "Failed to parse catalog response"
                );
                Err(CatalogError::Parse(e))
            }
        }
    }

    async fn cached_products(
        &self,
        key: CacheKey,
        url: Url,
    ) -> Result<Vec<Product>, CatalogError> {
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for product list");
            return Ok(products);
        }

        let Some(products) = self.get_json::<Vec<Product>>(url).await? else {
            debug!("Catalog has no such listing");
            return Ok(Vec::new());
        };

        self.inner
            .cache
            .insert(key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }
}

#[async_trait]
impl ProductCatalog for FakeStoreClient {
    #[instrument(skip(self))]
    async fn products(&self, limit: Option<usize>) -> Result<Vec<Product>, CatalogError> {
        let mut url = self.endpoint(&["products"])?;
        if let Some(limit) = limit {
            url.query_pairs_mut()
                .append_pair("limit", &limit.to_string());
        }
        self.cached_products(CacheKey::Products { limit }, url).await
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let key = CacheKey::Product(id);
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let url = self.endpoint(&["products", &id.to_string()])?;
        let product: Product = self
            .get_json(url)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("Product not found: {id}")))?;

        self.inner
            .cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    #[instrument(skip(self))]
    async fn categories(&self) -> Result<Vec<String>, CatalogError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let url = self.endpoint(&["products", "categories"])?;
        let Some(categories) = self.get_json::<Vec<String>>(url).await? else {
            debug!("Catalog has no category listing");
            return Ok(Vec::new());
        };

        self.inner
            .cache
            .insert(CacheKey::Categories, CacheValue::Categories(categories.clone()))
            .await;

        Ok(categories)
    }

    #[instrument(skip(self))]
    async fn products_in_category(&self, category: &str) -> Result<Vec<Product>, CatalogError> {
        let url = self.endpoint(&["products", "category", category])?;
        self.cached_products(CacheKey::Category(category.to_string()), url)
            .await
    }
}
