//! Persisted shopper-state commands.
//!
//! These open the same JSON records the storefront writes, through the same
//! store types, so a file the storefront would ignore is ignored here too.
//! Run them while the storefront is stopped: a running server keeps its own
//! copy in memory and will overwrite the files on its next change.

use std::path::Path;
use std::sync::Arc;

use aurora_core::{Cart, OrderSummary, Price, Product, User, Wishlist};
use aurora_storefront::persistence::{JsonFileStore, StateStore};
use aurora_storefront::stores::{AuthStore, CartStore, LocalAccounts, WishlistStore};

use super::{CommandError, Format, emit};

fn open(dir: &Path) -> Arc<dyn StateStore> {
    Arc::new(JsonFileStore::new(dir))
}

fn auth_store(dir: &Path) -> AuthStore {
    let persistence = open(dir);
    let identity = Arc::new(LocalAccounts::load(Arc::clone(&persistence)));
    AuthStore::load(persistence, identity)
}

/// Text rendering of a cart.
pub fn cart_lines(cart: &Cart) -> Vec<String> {
    if cart.is_empty() {
        return vec!["Cart is empty".to_string()];
    }

    let summary = OrderSummary::from_cart(cart);
    let mut lines: Vec<String> = cart
        .lines()
        .iter()
        .map(|line| {
            format!(
                "{:>3} x {:<40} {:>10}",
                line.quantity,
                line.product.title,
                Price::usd(line.line_total()).to_string()
            )
        })
        .collect();
    lines.push(format!(
        "{} items, subtotal {}, tax {}, total {}",
        summary.item_count,
        Price::usd(summary.subtotal),
        Price::usd(summary.tax),
        Price::usd(summary.total)
    ));
    lines
}

fn product_line(product: &Product) -> String {
    format!(
        "#{:<4} {:<40} {:>10}  ({})",
        product.id,
        product.title,
        Price::usd(product.effective_price()).to_string(),
        product.category
    )
}

/// Text rendering of a wishlist.
pub fn wishlist_lines(wishlist: &Wishlist) -> Vec<String> {
    if wishlist.is_empty() {
        return vec!["Wishlist is empty".to_string()];
    }
    let mut lines: Vec<String> = wishlist.products().iter().map(product_line).collect();
    lines.push(format!("{} saved", wishlist.len()));
    lines
}

/// Text rendering of the session.
pub fn account_lines(user: Option<&User>) -> Vec<String> {
    user.map_or_else(
        || vec!["Not signed in".to_string()],
        |user| vec![format!("Signed in as {} <{}> (id {})", user.name, user.email, user.id)],
    )
}

/// Print the cart.
///
/// # Errors
///
/// Returns an error if JSON output cannot be encoded.
pub fn show_cart(dir: &Path, format: Format) -> Result<(), CommandError> {
    let cart = CartStore::load(open(dir)).snapshot();
    emit(format, &cart, || cart_lines(&cart))
}

/// Empty the cart.
pub fn clear_cart(dir: &Path) {
    let store = CartStore::load(open(dir));
    let removed = store.total_items();
    store.clear_cart();
    tracing::info!(removed, "Cart cleared");
}

/// Print the wishlist.
///
/// # Errors
///
/// Returns an error if JSON output cannot be encoded.
pub fn show_wishlist(dir: &Path, format: Format) -> Result<(), CommandError> {
    let wishlist = WishlistStore::load(open(dir)).snapshot();
    emit(format, &wishlist, || wishlist_lines(&wishlist))
}

/// Forget every saved product.
pub fn clear_wishlist(dir: &Path) {
    let store = WishlistStore::load(open(dir));
    let removed = store.wishlist_count();
    store.clear_wishlist();
    tracing::info!(removed, "Wishlist cleared");
}

/// Print the signed-in user.
///
/// # Errors
///
/// Returns an error if JSON output cannot be encoded.
pub fn show_account(dir: &Path, format: Format) -> Result<(), CommandError> {
    let user = auth_store(dir).current_user();
    emit(format, &user, || account_lines(user.as_ref()))
}

/// End the saved session.
pub fn logout(dir: &Path) {
    let auth = auth_store(dir);
    if auth.is_authenticated() {
        auth.logout();
        tracing::info!("Signed out");
    } else {
        tracing::info!("No one was signed in");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use aurora_core::{ProductId, Rating};
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    use super::*;

    fn product(id: i32, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Thing {id}"),
            description: String::new(),
            price: Decimal::new(price, 0),
            category: "electronics".to_string(),
            image: String::new(),
            rating: Rating::default(),
            brand: None,
            discounted_price: None,
        }
    }

    #[test]
    fn test_clear_cart_persists() {
        let tmp = TempDir::new().unwrap();
        CartStore::load(open(tmp.path())).add_items(product(1, 10), 2);

        clear_cart(tmp.path());

        assert_eq!(CartStore::load(open(tmp.path())).total_items(), 0);
    }

    #[test]
    fn test_cart_lines_include_totals() {
        let mut cart = Cart::new();
        cart.add_items(product(1, 10), 2);
        cart.add_item(product(2, 5));

        let lines = cart_lines(&cart);
        assert_eq!(lines.len(), 3);
        assert!(lines.last().unwrap().contains("total $27.00"));
        assert_eq!(cart_lines(&Cart::new()), vec!["Cart is empty"]);
    }

    #[test]
    fn test_logout_clears_saved_session() {
        let tmp = TempDir::new().unwrap();
        assert!(auth_store(tmp.path()).register("Jane", "jane@aurora.test", "hunter22"));

        logout(tmp.path());

        assert!(!auth_store(tmp.path()).is_authenticated());
        assert_eq!(account_lines(None), vec!["Not signed in"]);
    }

    #[test]
    fn test_wishlist_lines() {
        let mut wishlist = Wishlist::new();
        wishlist.add(product(4, 20));
        let lines = wishlist_lines(&wishlist);
        assert!(lines.first().unwrap().contains("Thing 4"));
        assert_eq!(lines.last().unwrap(), "1 saved");
    }
}
