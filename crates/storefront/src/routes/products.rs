//! Catalog route handlers.
//!
//! Listing endpoints never fail: when the catalog is unreachable they log
//! the error and answer with an empty list. Product detail answers 404 for
//! unknown ids and 502 when the catalog is down.

use aurora_core::catalog::{DEFAULT_MAX_PRICE, format_category_name, hot_deals};
use aurora_core::{Deal, Product, ProductFilter, ProductId, SortOrder};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::catalog::CatalogError;
use crate::error::Result;
use crate::state::AppState;

/// Deals shown when no limit is given.
const DEFAULT_DEALS_LIMIT: usize = 50;

/// Product detail with the shopper's own state for it.
#[derive(Debug, Serialize)]
pub struct ProductDetailView {
    #[serde(flatten)]
    pub product: Product,
    pub effective_price: Decimal,
    pub discount_percent: u32,
    pub in_wishlist: bool,
    pub cart_quantity: u32,
}

/// Category name plus a display label.
#[derive(Debug, Serialize)]
pub struct CategoryView {
    pub name: String,
    pub label: String,
}

/// Search response.
#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub count: usize,
    pub products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

/// Search page query string. Everything is optional.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub category: Option<String>,
    pub sort: Option<String>,
}

impl SearchQuery {
    fn into_filter(self) -> ProductFilter {
        ProductFilter {
            query: self.q.unwrap_or_default(),
            min_price: self.min_price.unwrap_or(Decimal::ZERO),
            max_price: self.max_price.unwrap_or(DEFAULT_MAX_PRICE),
            category: self
                .category
                .filter(|c| !c.trim().is_empty() && !c.eq_ignore_ascii_case("all")),
            sort: self.sort.as_deref().map(SortOrder::parse).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DealsQuery {
    pub limit: Option<usize>,
    pub category: Option<String>,
    pub sort: Option<String>,
}

/// Log a listing failure and fall back to an empty list.
fn or_empty<T>(result: std::result::Result<Vec<T>, CatalogError>, what: &str) -> Vec<T> {
    result.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to fetch {what}");
        Vec::new()
    })
}

/// List products.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<Product>> {
    Json(or_empty(
        state.catalog().products(query.limit).await,
        "products",
    ))
}

/// Product detail.
#[instrument(skip(state), fields(product_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductDetailView>> {
    let product = state.catalog().product(id).await?;

    Ok(Json(ProductDetailView {
        effective_price: product.effective_price(),
        discount_percent: product.discount_percent(),
        in_wishlist: state.wishlist().is_in_wishlist(id),
        cart_quantity: state.cart().item_quantity(id),
        product,
    }))
}

/// List categories.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Json<Vec<CategoryView>> {
    let categories = or_empty(state.catalog().categories().await, "categories");

    Json(
        categories
            .into_iter()
            .map(|name| CategoryView {
                label: format_category_name(&name),
                name,
            })
            .collect(),
    )
}

/// Products in one category.
#[instrument(skip(state))]
pub async fn category(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Json<Vec<Product>> {
    Json(or_empty(
        state.catalog().products_in_category(&name).await,
        "category products",
    ))
}

/// Search the whole catalog.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<SearchResults> {
    let all = or_empty(state.catalog().products(None).await, "products");
    let products = query.into_filter().apply(&all);

    Json(SearchResults {
        count: products.len(),
        products,
    })
}

/// Hot deals: the first `limit` catalog products with their advertised
/// "was" price, in catalog order unless a sort is given.
#[instrument(skip(state))]
pub async fn deals(
    State(state): State<AppState>,
    Query(query): Query<DealsQuery>,
) -> Json<Vec<Deal>> {
    let all = or_empty(state.catalog().products(None).await, "products");
    let mut deals = hot_deals(&all, query.limit.unwrap_or(DEFAULT_DEALS_LIMIT));

    if let Some(category) = query
        .category
        .as_deref()
        .filter(|c| !c.eq_ignore_ascii_case("all"))
    {
        deals.retain(|d| d.product.category.eq_ignore_ascii_case(category));
    }

    if let Some(sort) = query.sort.as_deref() {
        SortOrder::parse(sort).sort_deals(&mut deals);
    }

    Json(deals)
}
