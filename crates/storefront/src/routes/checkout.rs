//! Simulated checkout.
//!
//! No payment provider is involved: the forms are validated, the configured
//! processing delay elapses, and the cart is turned into a confirmation and
//! emptied. The confirmation is returned to the client and not stored.
//!
//! Only a signed-in shopper can check out.

use aurora_core::{OrderConfirmation, PaymentInfo, ShippingInfo};
use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// Checkout form submission.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub shipping: ShippingInfo,
    pub payment: PaymentInfo,
}

/// Place the order.
///
/// The forms are checked against the current cart before the delay so a
/// bad submission fails fast and leaves the cart alone. After the delay the
/// cart is taken under its lock, so the confirmation lists exactly what was
/// cleared.
#[instrument(skip(state, request))]
pub async fn place_order(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<OrderConfirmation>> {
    if !state.auth().is_authenticated() {
        return Err(AppError::Unauthorized("Sign in to check out".to_string()));
    }

    let CheckoutRequest { shipping, payment } = request;

    OrderConfirmation::place(&state.cart().snapshot(), shipping.clone(), &payment)?;

    add_breadcrumb("checkout", "Processing payment", None);
    tokio::time::sleep(state.config().checkout_delay).await;

    let cart = state.cart().take();
    let confirmation = OrderConfirmation::place(&cart, shipping, &payment)?;

    tracing::info!(
        order_number = %confirmation.order_number,
        items = confirmation.summary.item_count,
        total = %confirmation.summary.total,
        "Order placed"
    );

    Ok(Json(confirmation))
}
