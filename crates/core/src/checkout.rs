//! Simulated checkout: totals, form validation and the order confirmation.
//!
//! No payment is taken and nothing is recorded. A confirmation is built from
//! the cart snapshot and handed back to the caller.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::cart::{Cart, CartLine};
use crate::types::price::round_cents;

/// Sales tax applied to the cart subtotal (8%).
pub const TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// Subtotal from which an order qualifies for free shipping.
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Number of digits on an accepted card.
const CARD_DIGITS: usize = 16;

/// Reasons a checkout attempt is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,
    #[error("shipping information is incomplete")]
    InvalidShipping,
    #[error("payment information is invalid")]
    InvalidPayment,
}

/// Money breakdown shown on the cart, checkout and confirmation pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub item_count: u64,
    pub subtotal: Decimal,
    pub tax: Decimal,
    /// Always zero; shipping is not charged.
    pub shipping: Decimal,
    pub total: Decimal,
    pub free_shipping: bool,
}

impl OrderSummary {
    /// Compute the summary for the cart's current contents.
    #[must_use]
    pub fn from_cart(cart: &Cart) -> Self {
        let subtotal = round_cents(cart.total_price());
        let tax = round_cents(subtotal * TAX_RATE);
        Self {
            item_count: cart.total_items(),
            subtotal,
            tax,
            shipping: Decimal::ZERO,
            total: subtotal + tax,
            free_shipping: subtotal >= FREE_SHIPPING_THRESHOLD,
        }
    }
}

/// Delivery details from the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    "US".to_string()
}

impl ShippingInfo {
    /// Every field must be filled in.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        [
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.phone,
            &self.address,
            &self.city,
            &self.state,
            &self.zip_code,
            &self.country,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }
}

/// Card details from the checkout form. Never stored or echoed back in full.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PaymentInfo {
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
    pub card_name: String,
}

impl std::fmt::Debug for PaymentInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentInfo")
            .field("card_number", &mask_card(&self.card_number))
            .field("expiry_date", &self.expiry_date)
            .field("cvv", &"[REDACTED]")
            .field("card_name", &self.card_name)
            .finish()
    }
}

impl PaymentInfo {
    /// The form as the checkout page formats it while typing: card digits
    /// grouped in fours and an `MM/YY` expiry. Nothing is dropped, so an
    /// over-long entry still fails [`is_valid`](Self::is_valid).
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            card_number: format_card_number(&self.card_number),
            expiry_date: format_expiry(&self.expiry_date),
            cvv: self.cvv.trim().to_string(),
            card_name: self.card_name.trim().to_string(),
        }
    }

    /// 16 card digits, `MM/YY` expiry, 3-digit CVV and a cardholder name.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let digits: String = self
            .card_number
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let expiry = self.expiry_date.trim();

        digits.len() == CARD_DIGITS
            && digits.chars().all(|c| c.is_ascii_digit())
            && is_expiry_shape(expiry)
            && self.cvv.len() == 3
            && self.cvv.chars().all(|c| c.is_ascii_digit())
            && !self.card_name.trim().is_empty()
    }
}

fn is_expiry_shape(expiry: &str) -> bool {
    let bytes = expiry.as_bytes();
    bytes.len() == 5
        && bytes.get(2) == Some(&b'/')
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 2 || b.is_ascii_digit())
}

/// Keep the digits of a card number and group them in fours.
///
/// ```
/// use aurora_core::checkout::format_card_number;
/// assert_eq!(format_card_number("4242-4242 42424242"), "4242 4242 4242 4242");
/// ```
#[must_use]
pub fn format_card_number(raw: &str) -> String {
    let digits: Vec<char> = raw.chars().filter(char::is_ascii_digit).collect();
    digits
        .chunks(4)
        .map(|group| group.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Keep the digits of an expiry date and insert the slash: `"1227"` → `"12/27"`.
#[must_use]
pub fn format_expiry(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() >= 2 {
        let (month, year) = digits.split_at(2);
        format!("{month}/{year}")
    } else {
        digits
    }
}

fn mask_card(card_number: &str) -> String {
    let digits: Vec<char> = card_number.chars().filter(char::is_ascii_digit).collect();
    let last_four: String = digits.iter().skip(digits.len().saturating_sub(4)).collect();
    format!("**** **** **** {last_four}")
}

/// What the shopper sees after a successful (simulated) payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    pub order_number: String,
    pub placed_at: DateTime<Utc>,
    pub lines: Vec<CartLine>,
    pub summary: OrderSummary,
    pub shipping: ShippingInfo,
    /// Card number with everything but the last four digits hidden.
    pub card: String,
}

impl OrderConfirmation {
    /// Validate the forms and build a confirmation from the cart.
    ///
    /// The cart itself is not touched; clearing it is the caller's job.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` for an empty cart, otherwise
    /// `InvalidShipping` or `InvalidPayment` for incomplete forms.
    pub fn place(
        cart: &Cart,
        shipping: ShippingInfo,
        payment: &PaymentInfo,
    ) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        if !shipping.is_valid() {
            return Err(CheckoutError::InvalidShipping);
        }
        let payment = payment.normalized();
        if !payment.is_valid() {
            return Err(CheckoutError::InvalidPayment);
        }

        Ok(Self {
            order_number: new_order_number(),
            placed_at: Utc::now(),
            lines: cart.lines().to_vec(),
            summary: OrderSummary::from_cart(cart),
            shipping,
            card: mask_card(&payment.card_number),
        })
    }
}

/// `ORD-` followed by eight uppercase hex characters.
fn new_order_number() -> String {
    let simple = Uuid::new_v4().simple().to_string();
    let suffix: String = simple.chars().take(8).collect();
    format!("ORD-{}", suffix.to_uppercase())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::product::{Product, Rating};
    use crate::types::ProductId;

    fn cart_with(price_cents: i64, quantity: u32) -> Cart {
        let mut cart = Cart::new();
        cart.add_items(
            Product {
                id: ProductId::new(1),
                title: "Monitor".to_string(),
                description: String::new(),
                price: Decimal::new(price_cents, 2),
                category: "electronics".to_string(),
                image: String::new(),
                rating: Rating::default(),
                brand: None,
                discounted_price: None,
            },
            quantity,
        );
        cart
    }

    fn shipping() -> ShippingInfo {
        ShippingInfo {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@aurora.test".to_string(),
            phone: "555-0100".to_string(),
            address: "1 Market St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip_code: "62701".to_string(),
            country: "US".to_string(),
        }
    }

    fn payment() -> PaymentInfo {
        PaymentInfo {
            card_number: "4242 4242 4242 4242".to_string(),
            expiry_date: "12/29".to_string(),
            cvv: "123".to_string(),
            card_name: "Jane Doe".to_string(),
        }
    }

    #[test]
    fn test_summary_applies_eight_percent_tax() {
        let summary = OrderSummary::from_cart(&cart_with(11000, 1));
        assert_eq!(summary.subtotal, Decimal::new(110, 0));
        assert_eq!(summary.tax, Decimal::new(880, 2));
        assert_eq!(summary.total, Decimal::new(11880, 2));
        assert_eq!(summary.shipping, Decimal::ZERO);
        assert!(summary.free_shipping);
    }

    #[test]
    fn test_summary_rounds_tax_to_cents() {
        // 19.99 * 0.08 = 1.5992
        let summary = OrderSummary::from_cart(&cart_with(1999, 1));
        assert_eq!(summary.tax, Decimal::new(160, 2));
        assert!(!summary.free_shipping);
    }

    #[test]
    fn test_summary_empty_cart() {
        let summary = OrderSummary::from_cart(&Cart::new());
        assert_eq!(summary.item_count, 0);
        assert_eq!(summary.total, Decimal::ZERO);
    }

    #[test]
    fn test_shipping_requires_every_field() {
        assert!(shipping().is_valid());
        let mut missing = shipping();
        missing.city = "  ".to_string();
        assert!(!missing.is_valid());
    }

    #[test]
    fn test_payment_validation() {
        assert!(payment().is_valid());

        let mut short = payment();
        short.card_number = "4242 4242".to_string();
        assert!(!short.is_valid());

        let mut bad_expiry = payment();
        bad_expiry.expiry_date = "1229".to_string();
        assert!(!bad_expiry.is_valid());

        let mut bad_cvv = payment();
        bad_cvv.cvv = "12a".to_string();
        assert!(!bad_cvv.is_valid());
    }

    #[test]
    fn test_format_helpers() {
        assert_eq!(format_card_number("4242424242424242"), "4242 4242 4242 4242");
        assert_eq!(format_card_number("42424242424242429"), "4242 4242 4242 4242 9");
        assert_eq!(format_card_number("123"), "123");
        assert_eq!(format_expiry("1"), "1");
        assert_eq!(format_expiry("12"), "12/");
        assert_eq!(format_expiry("12/29"), "12/29");
        assert_eq!(format_expiry("12 / 295"), "12/295");
    }

    #[test]
    fn test_place_order_normalizes_payment() {
        let loose = PaymentInfo {
            card_number: "4242-4242-4242-1881".to_string(),
            expiry_date: "1229".to_string(),
            cvv: " 123 ".to_string(),
            card_name: "Jane Doe".to_string(),
        };
        let confirmation = OrderConfirmation::place(&cart_with(100, 1), shipping(), &loose).unwrap();
        assert_eq!(confirmation.card, "**** **** **** 1881");

        let too_long = PaymentInfo {
            card_number: "4242 4242 4242 4242 9".to_string(),
            ..loose.clone()
        };
        assert_eq!(
            OrderConfirmation::place(&cart_with(100, 1), shipping(), &too_long),
            Err(CheckoutError::InvalidPayment)
        );

        let long_expiry = PaymentInfo {
            expiry_date: "12/295".to_string(),
            ..loose
        };
        assert_eq!(
            OrderConfirmation::place(&cart_with(100, 1), shipping(), &long_expiry),
            Err(CheckoutError::InvalidPayment)
        );
    }

    #[test]
    fn test_place_order() {
        let cart = cart_with(2500, 2);
        let confirmation = OrderConfirmation::place(&cart, shipping(), &payment()).unwrap();

        assert!(confirmation.order_number.starts_with("ORD-"));
        assert_eq!(confirmation.order_number.len(), 12);
        assert_eq!(confirmation.card, "**** **** **** 4242");
        assert_eq!(confirmation.lines.len(), 1);
        assert_eq!(confirmation.summary.subtotal, Decimal::new(50, 0));
    }

    #[test]
    fn test_place_order_errors() {
        assert_eq!(
            OrderConfirmation::place(&Cart::new(), shipping(), &payment()),
            Err(CheckoutError::EmptyCart)
        );
        assert_eq!(
            OrderConfirmation::place(&cart_with(100, 1), ShippingInfo::default(), &payment()),
            Err(CheckoutError::InvalidShipping)
        );
        assert_eq!(
            OrderConfirmation::place(&cart_with(100, 1), shipping(), &PaymentInfo::default()),
            Err(CheckoutError::InvalidPayment)
        );
    }

    #[test]
    fn test_payment_debug_is_masked() {
        let debug = format!("{:?}", payment());
        assert!(!debug.contains("4242 4242 4242 4242"));
        assert!(!debug.contains("123"));
    }
}
