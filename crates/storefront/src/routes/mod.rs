//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                          - Health check
//!
//! # Catalog
//! GET    /api/products?limit=N            - Product listing
//! GET    /api/products/{id}               - Product detail with cart/wishlist state
//! GET    /api/categories                  - Category names and labels
//! GET    /api/categories/{name}/products  - Products in one category
//! GET    /api/search?q=&min_price=&max_price=&category=&sort=
//! GET    /api/deals?limit=&category=&sort=
//!
//! # Cart
//! GET    /api/cart                        - Lines and order summary
//! POST   /api/cart/items                  - Add a product (quantity 1-10)
//! PATCH  /api/cart/items/{id}             - Set a line's quantity (0 removes)
//! DELETE /api/cart/items/{id}             - Remove a line
//! DELETE /api/cart                        - Clear the cart
//! GET    /api/cart/count                  - Item count badge
//!
//! # Wishlist
//! GET    /api/wishlist                    - Saved products
//! POST   /api/wishlist/items              - Save a product
//! GET    /api/wishlist/items/{id}         - Whether a product is saved
//! DELETE /api/wishlist/items/{id}         - Forget a product
//! POST   /api/wishlist/items/{id}/toggle  - Flip a product's membership
//! DELETE /api/wishlist                    - Clear the wishlist
//!
//! # Account
//! GET    /api/account                     - Signed-in user (401 if none)
//! PATCH  /api/account                     - Update profile
//! POST   /api/account/login               - Sign in
//! POST   /api/account/register            - Create account and sign in
//! POST   /api/account/logout              - Sign out
//!
//! # Checkout
//! POST   /api/checkout                    - Simulated payment, clears the cart
//! ```

pub mod account;
pub mod cart;
pub mod checkout;
pub mod products;
pub mod wishlist;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, patch, post},
};
use tower_http::trace::TraceLayer;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/products/{id}", get(products::show))
        .route("/categories", get(products::categories))
        .route("/categories/{name}/products", get(products::category))
        .route("/search", get(products::search))
        .route("/deals", get(products::deals))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add))
        .route("/items/{id}", patch(cart::update).delete(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show).delete(wishlist::clear))
        .route("/items", post(wishlist::add))
        .route(
            "/items/{id}",
            get(wishlist::contains).delete(wishlist::remove),
        )
        .route("/items/{id}/toggle", post(wishlist::toggle))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::show).patch(account::update))
        .route("/login", post(account::login))
        .route("/register", post(account::register))
        .route("/logout", post(account::logout))
}

/// Create all API routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(catalog_routes())
        .nest("/cart", cart_routes())
        .nest("/wishlist", wishlist_routes())
        .nest("/account", account_routes())
        .route("/checkout", post(checkout::place_order))
}

/// Build the full application: health check, API and request tracing.
///
/// Sentry and CORS layers are added by the binary.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", routes())
        .with_state(state)
        .layer(axum_middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::{Method, StatusCode};

    use super::test_support::{send, state};

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&state(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (status, _) = send(&state(), Method::GET, "/api/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
