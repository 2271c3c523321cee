//! In-process catalog backed by a fixed product list.

use async_trait::async_trait;
use aurora_core::{Product, ProductId};

use super::{CatalogError, ProductCatalog};

/// Serves a fixed set of products. Used for offline runs and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    products: Vec<Product>,
}

impl StaticCatalog {
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }
}

#[async_trait]
impl ProductCatalog for StaticCatalog {
    async fn products(&self, limit: Option<usize>) -> Result<Vec<Product>, CatalogError> {
        let limit = limit.unwrap_or(usize::MAX);
        Ok(self.products.iter().take(limit).cloned().collect())
    }

    async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("Product not found: {id}")))
    }

    async fn categories(&self) -> Result<Vec<String>, CatalogError> {
        let mut categories: Vec<String> = Vec::new();
        for product in &self.products {
            if !categories.contains(&product.category) {
                categories.push(product.category.clone());
            }
        }
        Ok(categories)
    }

    async fn products_in_category(&self, category: &str) -> Result<Vec<Product>, CatalogError> {
        Ok(self
            .products
            .iter()
            .filter(|p| p.category == category)
            .cloned()
            .collect())
    }
}
