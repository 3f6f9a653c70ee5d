//! Checkout submission: validate the form, price the cart snapshot, assemble
//! the order and submit it upstream. At most one submission per session is in
//! flight at a time; the slot is released whatever the outcome. The cart and
//! coupon are cleared only after the order API accepts the order.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    checkout::{self, CheckoutForm},
    dto::checkout::CheckoutReceipt,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{NewOrder, NewOrderItem, OrderRequest},
    pricing,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn submit(
    state: &AppState,
    user: &AuthUser,
    form: CheckoutForm,
) -> AppResult<ApiResponse<CheckoutReceipt>> {
    submit_at(state, user, form, Utc::now()).await
}

/// Submission with an injected clock, so expiry freshness is testable.
pub async fn submit_at(
    state: &AppState,
    user: &AuthUser,
    form: CheckoutForm,
    now: DateTime<Utc>,
) -> AppResult<ApiResponse<CheckoutReceipt>> {
    // Claim the session's checkout slot first; the guard releases it on every
    // exit path, so a rejected submission never wedges the session.
    let _guard = state.sessions.begin_checkout(user.user_id)?;

    let (lines, coupon) = state.sessions.snapshot(user.user_id);
    if lines.is_empty() {
        return Err(AppError::EmptyCart);
    }

    let valid = checkout::validate(&form, now).map_err(AppError::Validation)?;

    let products = state.catalog.product_map().await;
    let subtotal = pricing::cart_subtotal(&lines, &products);
    let breakdown = pricing::compute_pricing(subtotal, coupon.as_ref());

    // The order ships to the shipping section unconditionally; billing only
    // ever matters to the payment processor, which is out of scope here.
    let request = OrderRequest {
        order: NewOrder {
            user_id: user.user_id,
            total: pricing::round_money(breakdown.total),
            status: "pending".to_string(),
            shipping_address: valid.shipping,
        },
        items: lines
            .iter()
            .map(|line| NewOrderItem {
                order_id: String::new(),
                product_id: line.product_id,
                design_id: line.design_id,
                quantity: line.quantity,
                size: line.size.clone(),
                color: line.color.clone(),
                price: pricing::round_money(pricing::unit_price(line, &products)),
            })
            .collect(),
    };

    let created = state.orders.create_order(&request).await?;

    tracing::info!(order_id = %created.id, user_id = %user.user_id, "order placed");
    state.sessions.clear(user.user_id);

    let receipt = CheckoutReceipt {
        order_id: created.id,
        total: request.order.total,
        pricing: rounded(breakdown),
    };
    Ok(ApiResponse::success(
        "Order placed successfully",
        receipt,
        Some(Meta::empty()),
    ))
}

/// Looks up a created order for the confirmation view; a plain pass-through
/// of the upstream payload.
pub async fn get_order(
    state: &AppState,
    _user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let order = state.orders.get_order(id).await?;
    Ok(ApiResponse::success("OK", order, Some(Meta::empty())))
}

fn rounded(mut breakdown: crate::models::PricingBreakdown) -> crate::models::PricingBreakdown {
    breakdown.subtotal = pricing::round_money(breakdown.subtotal);
    breakdown.discount = pricing::round_money(breakdown.discount);
    breakdown.tax = pricing::round_money(breakdown.tax);
    breakdown.shipping = pricing::round_money(breakdown.shipping);
    breakdown.total = pricing::round_money(breakdown.total);
    breakdown
}
