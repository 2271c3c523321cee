//! Wishlist route handlers.

use aurora_core::{Product, ProductId};
use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct WishlistView {
    pub count: usize,
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct Membership {
    pub product_id: ProductId,
    pub in_wishlist: bool,
}

#[derive(Debug, Deserialize)]
pub struct AddToWishlistRequest {
    pub product_id: ProductId,
}

fn view(state: &AppState) -> Json<WishlistView> {
    let wishlist = state.wishlist().snapshot();
    Json(WishlistView {
        count: wishlist.len(),
        products: wishlist.products().to_vec(),
    })
}

/// List saved products.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<WishlistView> {
    view(&state)
}

/// Save a product. Saving it twice keeps one entry.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(request): Json<AddToWishlistRequest>,
) -> Result<Json<WishlistView>> {
    let product = state.catalog().product(request.product_id).await?;
    state.wishlist().add_to_wishlist(product);
    Ok(view(&state))
}

/// Whether a product is saved.
#[instrument(skip(state), fields(product_id = %id))]
pub async fn contains(State(state): State<AppState>, Path(id): Path<ProductId>) -> Json<Membership> {
    Json(Membership {
        product_id: id,
        in_wishlist: state.wishlist().is_in_wishlist(id),
    })
}

/// Forget a product. Absent ids are ignored.
#[instrument(skip(state), fields(product_id = %id))]
pub async fn remove(State(state): State<AppState>, Path(id): Path<ProductId>) -> Json<WishlistView> {
    state.wishlist().remove_from_wishlist(id);
    view(&state)
}

/// Heart button: save the product if absent, otherwise forget it.
///
/// Removing needs no catalog lookup, so a saved product can be dropped
/// even while the catalog is down.
#[instrument(skip(state), fields(product_id = %id))]
pub async fn toggle(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Membership>> {
    let in_wishlist = if state.wishlist().is_in_wishlist(id) {
        state.wishlist().remove_from_wishlist(id);
        false
    } else {
        let product = state.catalog().product(id).await?;
        state.wishlist().toggle(product)
    };

    Ok(Json(Membership {
        product_id: id,
        in_wishlist,
    }))
}

/// Forget every saved product.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Json<WishlistView> {
    state.wishlist().clear_wishlist();
    view(&state)
}
