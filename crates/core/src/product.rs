//! Catalog product snapshot.
//!
//! Products come from the remote catalog and are never mutated locally. The
//! cart and wishlist store a copy taken when the shopper acted, so later
//! catalog price changes do not affect an existing cart.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// A product as reported by the catalog API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// List price.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub category: String,
    /// Image URL.
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub rating: Rating,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Sale price. Ignored unless strictly lower than `price`.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub discounted_price: Option<Decimal>,
}

/// Aggregate customer rating.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rating {
    /// Average score, 0-5.
    pub rate: f64,
    /// Number of ratings.
    pub count: u32,
}

impl Product {
    /// The price used for totals: the discounted price when present and
    /// lower than the list price, otherwise the list price.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        match self.discounted_price {
            Some(discounted) if discounted < self.price => discounted,
            _ => self.price,
        }
    }

    /// Whether a real discount applies.
    #[must_use]
    pub fn is_discounted(&self) -> bool {
        self.effective_price() < self.price
    }

    /// Whole percent saved against the list price.
    #[must_use]
    pub fn discount_percent(&self) -> u32 {
        if !self.is_discounted() {
            return 0;
        }
        percent_off(self.price, self.effective_price())
    }

    /// Case-insensitive substring match on title, description or category.
    ///
    /// A blank query matches every product.
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
            || self.category.to_lowercase().contains(&needle)
    }
}

/// Whole percent `sale` saves against `original`, rounded half up.
/// Zero when `original` is not positive or `sale` is not lower.
pub(crate) fn percent_off(original: Decimal, sale: Decimal) -> u32 {
    if original <= Decimal::ZERO || sale >= original {
        return 0;
    }
    ((original - sale) / original * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(0)
}
