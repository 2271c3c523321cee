//! Catalog browsing over an in-memory product list.
//!
//! The catalog is small (tens of products), so search, category filtering
//! and sorting are plain linear scans over what the API returned.

use std::cmp::{Ordering, Reverse};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::product::{Product, percent_off};
use crate::types::price::round_cents;

/// Upper bound of the default price filter.
pub const DEFAULT_MAX_PRICE: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// Result ordering for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Keep the order the catalog returned.
    #[default]
    Relevance,
    PriceLow,
    PriceHigh,
    /// Highest rated first.
    Rating,
    /// Title, A to Z.
    Name,
    /// Largest discount first.
    Discount,
}

impl SortOrder {
    /// Parse a query-string value. Unknown values fall back to relevance.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "price-low" => Self::PriceLow,
            "price-high" => Self::PriceHigh,
            "rating" => Self::Rating,
            "name" => Self::Name,
            "discount" => Self::Discount,
            _ => Self::Relevance,
        }
    }

    /// Stable in-place sort.
    pub fn sort(self, products: &mut [Product]) {
        self.sort_with(products, |p| p, Product::discount_percent);
    }

    /// Stable in-place sort of deals. `Discount` uses the displayed percent.
    pub fn sort_deals(self, deals: &mut [Deal]) {
        self.sort_with(deals, |d| &d.product, |d| d.discount_percent);
    }

    fn sort_with<T>(
        self,
        items: &mut [T],
        product: impl Fn(&T) -> &Product,
        discount: impl Fn(&T) -> u32,
    ) {
        match self {
            Self::Relevance => {}
            Self::PriceLow => items.sort_by(|a, b| product(a).price.cmp(&product(b).price)),
            Self::PriceHigh => items.sort_by(|a, b| product(b).price.cmp(&product(a).price)),
            Self::Rating => items.sort_by(|a, b| {
                product(b)
                    .rating
                    .rate
                    .total_cmp(&product(a).rating.rate)
            }),
            Self::Name => items.sort_by(|a, b| compare_titles(&product(a).title, &product(b).title)),
            Self::Discount => items.sort_by_key(|item| Reverse(discount(item))),
        }
    }
}

fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Search-page filter state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilter {
    pub query: String,
    pub min_price: Decimal,
    pub max_price: Decimal,
    /// Exact category, compared case-insensitively.
    pub category: Option<String>,
    pub sort: SortOrder,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            query: String::new(),
            min_price: Decimal::ZERO,
            max_price: DEFAULT_MAX_PRICE,
            category: None,
            sort: SortOrder::Relevance,
        }
    }
}

impl ProductFilter {
    /// Whether `product` passes the query, category and price-range checks.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        product.matches_query(&self.query)
            && self
                .category
                .as_deref()
                .is_none_or(|c| product.category.eq_ignore_ascii_case(c.trim()))
            && product.price >= self.min_price
            && product.price <= self.max_price
    }

    /// Filter then sort a copy of `products`.
    #[must_use]
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let mut matched: Vec<Product> = products
            .iter()
            .filter(|p| self.matches(p))
            .cloned()
            .collect();
        self.sort.sort(&mut matched);
        matched
    }
}

/// Markup applied to the list price to show a "was" price for products the
/// catalog sells without a discount (30%).
pub const SIMULATED_MARKUP: Decimal = Decimal::from_parts(13, 0, 0, false, 1);

/// A product on the hot-deals page, with the prices it is advertised at.
///
/// The advertised prices are for display only. The cart charges
/// [`Product::effective_price`] whatever a deal shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    #[serde(flatten)]
    pub product: Product,
    /// The "was" price.
    pub original_price: Decimal,
    pub sale_price: Decimal,
    pub discount_percent: u32,
    /// True when the catalog has no real discount and the "was" price is
    /// the list price marked up by [`SIMULATED_MARKUP`].
    pub simulated: bool,
}

impl From<Product> for Deal {
    fn from(product: Product) -> Self {
        let sale = product.effective_price();
        let (original, simulated) = if product.is_discounted() {
            (product.price, false)
        } else {
            (product.price * SIMULATED_MARKUP, true)
        };

        Self {
            original_price: round_cents(original),
            sale_price: round_cents(sale),
            discount_percent: percent_off(original, sale),
            simulated,
            product,
        }
    }
}

/// The first `limit` products as deals, in catalog order.
#[must_use]
pub fn hot_deals(products: &[Product], limit: usize) -> Vec<Deal> {
    products
        .iter()
        .take(limit)
        .cloned()
        .map(Deal::from)
        .collect()
}

/// Title-case a category slug: `"men's clothing"` becomes `"Men's Clothing"`.
#[must_use]
pub fn format_category_name(category: &str) -> String {
    category
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
