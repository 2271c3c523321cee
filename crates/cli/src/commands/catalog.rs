//! Live catalog queries.

use aurora_core::catalog::format_category_name;
use aurora_core::{Price, Product, ProductId};
use aurora_storefront::catalog::{FakeStoreClient, ProductCatalog};
use aurora_storefront::config::CatalogConfig;

use super::{CommandError, Format, emit};

fn client() -> Result<FakeStoreClient, CommandError> {
    let config = CatalogConfig::from_env()?;
    tracing::debug!(base_url = %config.base_url, "Using catalog");
    Ok(FakeStoreClient::new(&config)?)
}

fn product_summary(product: &Product) -> String {
    let mut line = format!(
        "#{:<4} {:<50} {:>10}",
        product.id,
        product.title,
        Price::usd(product.effective_price()).to_string()
    );
    if product.is_discounted() {
        line.push_str(&format!("  -{}%", product.discount_percent()));
    }
    line
}

/// List products.
///
/// # Errors
///
/// Returns an error if the catalog cannot be reached.
pub async fn products(limit: Option<usize>, format: Format) -> Result<(), CommandError> {
    let products = client()?.products(limit).await?;
    emit(format, &products, || {
        products.iter().map(product_summary).collect()
    })
}

/// List categories.
///
/// # Errors
///
/// Returns an error if the catalog cannot be reached.
pub async fn categories(format: Format) -> Result<(), CommandError> {
    let categories = client()?.categories().await?;
    emit(format, &categories, || {
        categories
            .iter()
            .map(|c| format!("{:<20} {c}", format_category_name(c)))
            .collect()
    })
}

/// Show one product.
///
/// # Errors
///
/// Returns an error if the catalog cannot be reached or has no such product.
pub async fn product(id: i32, format: Format) -> Result<(), CommandError> {
    let product = client()?.product(ProductId::new(id)).await?;
    emit(format, &product, || {
        vec![
            product_summary(&product),
            format!("Category: {}", format_category_name(&product.category)),
            format!(
                "Rating:   {:.1} ({} reviews)",
                product.rating.rate, product.rating.count
            ),
            String::new(),
            product.description.clone(),
        ]
    })
}
