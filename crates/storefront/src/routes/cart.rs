//! Cart route handlers.
//!
//! Every mutating endpoint answers with the updated cart so a client never
//! has to re-fetch. Unknown line ids are ignored rather than reported.

use aurora_core::{Cart, CartLine, OrderSummary, Product, ProductId};
use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// Most units the product page lets a shopper add at once.
pub const MAX_ADD_QUANTITY: u32 = 10;

/// One cart line for display.
#[derive(Debug, Serialize)]
pub struct CartLineView {
    pub product: Product,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            product: line.product.clone(),
            quantity: line.quantity,
            unit_price: line.product.effective_price(),
            line_total: line.line_total(),
        }
    }
}

/// Cart display data.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub summary: OrderSummary,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart.lines().iter().map(CartLineView::from).collect(),
            summary: OrderSummary::from_cart(cart),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u64,
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub quantity: Option<u32>,
}

/// Update quantity request body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

fn view(state: &AppState) -> Json<CartView> {
    Json(CartView::from(&state.cart().snapshot()))
}

/// Display the cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartView> {
    view(&state)
}

/// Add a product to the cart.
///
/// The product is looked up in the catalog so the cart keeps a snapshot of
/// it as it was when added.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let quantity = request.quantity.unwrap_or(1);
    if !(1..=MAX_ADD_QUANTITY).contains(&quantity) {
        return Err(AppError::BadRequest(format!(
            "quantity must be between 1 and {MAX_ADD_QUANTITY}"
        )));
    }

    let product = state.catalog().product(request.product_id).await?;
    state.cart().add_items(product, quantity);

    let product_id = request.product_id.to_string();
    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", product_id.as_str())]),
    );

    Ok(view(&state))
}

/// Set a line's quantity. Zero or less removes the line.
#[instrument(skip(state), fields(product_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(request): Json<UpdateQuantityRequest>,
) -> Json<CartView> {
    state.cart().update_quantity(id, request.quantity);
    view(&state)
}

/// Remove a line.
#[instrument(skip(state), fields(product_id = %id))]
pub async fn remove(State(state): State<AppState>, Path(id): Path<ProductId>) -> Json<CartView> {
    state.cart().remove_item(id);
    view(&state)
}

/// Empty the cart.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Json<CartView> {
    state.cart().clear_cart();
    view(&state)
}

/// Cart count badge.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> Json<CartCount> {
    Json(CartCount {
        count: state.cart().total_items(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::routes::test_support::{send, state};

    #[tokio::test]
    async fn test_add_merges_and_totals() {
        let state = state();
        for id in [1, 1, 2] {
            let (status, _) = send(
                &state,
                Method::POST,
                "/api/cart/items",
                Some(json!({ "product_id": id })),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (_, body) = send(&state, Method::GET, "/api/cart", None).await;
        assert_eq!(body["lines"].as_array().unwrap().len(), 2);
        assert_eq!(body["lines"][0]["quantity"], 2);
        assert_eq!(body["summary"]["item_count"], 3);
        assert_eq!(body["summary"]["subtotal"], "25.00");
        assert_eq!(body["summary"]["tax"], "2.00");
        assert_eq!(body["summary"]["total"], "27.00");
        assert_eq!(body["summary"]["free_shipping"], false);

        let (_, body) = send(&state, Method::GET, "/api/cart/count", None).await;
        assert_eq!(body["count"], 3);
    }

    #[tokio::test]
    async fn test_add_rejects_out_of_range_quantity() {
        let state = state();
        for quantity in [0, 11] {
            let (status, _) = send(
                &state,
                Method::POST,
                "/api/cart/items",
                Some(json!({ "product_id": 1, "quantity": quantity })),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
        assert_eq!(state.cart().total_items(), 0);
    }

    #[tokio::test]
    async fn test_add_unknown_product_is_404() {
        let state = state();
        let (status, _) = send(
            &state,
            Method::POST,
            "/api/cart/items",
            Some(json!({ "product_id": 77 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(state.cart().total_items(), 0);
    }

    #[tokio::test]
    async fn test_update_remove_and_clear() {
        let state = state();
        send(
            &state,
            Method::POST,
            "/api/cart/items",
            Some(json!({ "product_id": 1, "quantity": 3 })),
        )
        .await;
        send(
            &state,
            Method::POST,
            "/api/cart/items",
            Some(json!({ "product_id": 2 })),
        )
        .await;

        let (_, body) = send(
            &state,
            Method::PATCH,
            "/api/cart/items/1",
            Some(json!({ "quantity": 0 })),
        )
        .await;
        assert_eq!(body["lines"].as_array().unwrap().len(), 1);

        // Unknown ids are a no-op.
        let (status, body) = send(&state, Method::DELETE, "/api/cart/items/99", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"]["item_count"], 1);

        let (status, body) = send(
            &state,
            Method::PATCH,
            "/api/cart/items/2",
            Some(json!({ "quantity": -1 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"]["item_count"], 0);
        assert_eq!(state.cart().total_items(), 0);

        let (_, body) = send(&state, Method::DELETE, "/api/cart", None).await;
        assert!(body["lines"].as_array().unwrap().is_empty());
        assert_eq!(body["summary"]["total"], "0.00");
    }
}
