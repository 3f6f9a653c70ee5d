//! Cart operations: line mutation, coupon application and the projected
//! cart view. Every mutation returns the freshly projected view so the UI
//! never renders stale totals; pricing is recomputed from current state on
//! each call, never cached.

use std::collections::HashMap;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    coupon,
    dto::cart::{AddLineRequest, ApplyCouponRequest, CartLineDto, CartView},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{CartLine, Product},
    pricing,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Display fallbacks for lines whose product cannot be resolved.
const FALLBACK_PRODUCT_NAME: &str = "Custom Design";
const FALLBACK_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1521572163474-6864f9cf17ab?ixlib=rb-4.0.3&auto=format&fit=crop&w=120&h=120";

pub async fn view_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartView>> {
    let view = project_cart(state, user.user_id).await;
    let meta = Meta::new(i64::from(view.cart_count));
    Ok(ApiResponse::success("OK", view, Some(meta)))
}

pub async fn add_line(
    state: &AppState,
    user: &AuthUser,
    payload: AddLineRequest,
) -> AppResult<ApiResponse<CartView>> {
    let Ok(quantity) = u32::try_from(payload.quantity) else {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".to_string(),
        ));
    };
    if quantity == 0 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".to_string(),
        ));
    }

    let line = CartLine {
        id: Uuid::new_v4(),
        product_id: payload.product_id,
        design_id: payload.design_id,
        size: payload.size,
        color: payload.color,
        quantity,
        custom_price: payload.custom_price,
    };
    state.sessions.add_line(user.user_id, line);

    let view = project_cart(state, user.user_id).await;
    Ok(ApiResponse::success("Added to cart", view, None))
}

pub async fn update_quantity(
    state: &AppState,
    user: &AuthUser,
    line_id: Uuid,
    quantity: i32,
) -> AppResult<ApiResponse<CartView>> {
    if !state.sessions.set_quantity(user.user_id, line_id, quantity) {
        return Err(AppError::NotFound);
    }
    let view = project_cart(state, user.user_id).await;
    Ok(ApiResponse::success("Cart updated", view, None))
}

pub async fn remove_line(
    state: &AppState,
    user: &AuthUser,
    line_id: Uuid,
) -> AppResult<ApiResponse<CartView>> {
    state.sessions.remove_line(user.user_id, line_id);
    let view = project_cart(state, user.user_id).await;
    Ok(ApiResponse::success("Removed from cart", view, None))
}

pub async fn clear_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartView>> {
    state.sessions.clear(user.user_id);
    let view = project_cart(state, user.user_id).await;
    Ok(ApiResponse::success("Cart cleared", view, None))
}

pub async fn apply_coupon(
    state: &AppState,
    user: &AuthUser,
    payload: ApplyCouponRequest,
) -> AppResult<ApiResponse<CartView>> {
    let coupon = coupon::resolve(&payload.code)?;
    state.sessions.apply_coupon(user.user_id, coupon);
    let view = project_cart(state, user.user_id).await;
    Ok(ApiResponse::success("Coupon applied", view, None))
}

pub async fn remove_coupon(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartView>> {
    state.sessions.remove_coupon(user.user_id);
    let view = project_cart(state, user.user_id).await;
    Ok(ApiResponse::success("Coupon removed", view, None))
}

/// Projects the user's session into the displayed cart: catalog lookup (with
/// degraded fallback), per-line prices, and the full breakdown.
async fn project_cart(state: &AppState, user_id: Uuid) -> CartView {
    let (lines, coupon) = state.sessions.snapshot(user_id);
    let products = state.catalog.product_map().await;
    build_view(&lines, coupon, &products)
}

pub(crate) fn build_view(
    lines: &[CartLine],
    coupon: Option<coupon::Coupon>,
    products: &HashMap<Uuid, Product>,
) -> CartView {
    let subtotal = pricing::cart_subtotal(lines, products);
    let mut breakdown = pricing::compute_pricing(subtotal, coupon.as_ref());
    breakdown.subtotal = pricing::round_money(breakdown.subtotal);
    breakdown.discount = pricing::round_money(breakdown.discount);
    breakdown.tax = pricing::round_money(breakdown.tax);
    breakdown.shipping = pricing::round_money(breakdown.shipping);
    breakdown.total = pricing::round_money(breakdown.total);

    let items: Vec<CartLineDto> = lines
        .iter()
        .map(|line| {
            let product = line.product_id.and_then(|id| products.get(&id));
            let unit_price = pricing::unit_price(line, products);
            CartLineDto {
                id: line.id,
                product_id: line.product_id,
                design_id: line.design_id,
                product_name: product
                    .map_or_else(|| FALLBACK_PRODUCT_NAME.to_string(), |p| p.name.clone()),
                image_url: product
                    .and_then(|p| p.image_url.clone())
                    .unwrap_or_else(|| FALLBACK_IMAGE_URL.to_string()),
                size: line.size.clone(),
                color: line.color.clone(),
                quantity: line.quantity,
                unit_price,
                line_total: pricing::round_money(unit_price * Decimal::from(line.quantity)),
            }
        })
        .collect();

    let cart_count = lines.iter().map(|l| l.quantity).sum();

    CartView {
        items,
        cart_count,
        coupon,
        pricing: breakdown,
    }
}
