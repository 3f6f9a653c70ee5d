//! Pure pricing arithmetic: unit-price resolution, subtotal projection and
//! the subtotal -> breakdown calculation. Everything here is deterministic;
//! the same inputs always produce the same breakdown.

use std::collections::HashMap;

use rust_decimal::{Decimal, RoundingStrategy, dec};
use uuid::Uuid;

use crate::coupon::Coupon;
use crate::models::{CartLine, PricingBreakdown, Product};

/// Sales tax, applied to the post-discount amount.
pub const TAX_RATE: Decimal = dec!(0.08);
/// Orders with a pre-discount subtotal strictly above this ship free.
pub const FREE_SHIPPING_THRESHOLD: Decimal = dec!(50.00);
pub const FLAT_SHIPPING_FEE: Decimal = dec!(5.99);
/// Price used when a line's product cannot be resolved from the catalog.
pub const DEFAULT_UNIT_PRICE: Decimal = dec!(25.99);

/// Resolves the unit price of a cart line: an explicit custom price wins,
/// then the catalog base price, then the fallback constant.
///
/// Both the cart view and the order assembler price lines through this one
/// function so displayed totals and submitted line prices cannot diverge.
pub fn unit_price(line: &CartLine, products: &HashMap<Uuid, Product>) -> Decimal {
    if let Some(price) = line.custom_price {
        return price;
    }
    line.product_id
        .and_then(|id| products.get(&id))
        .map_or(DEFAULT_UNIT_PRICE, |p| p.base_price)
}

/// Sum of `unit_price * quantity` over all lines.
pub fn cart_subtotal(lines: &[CartLine], products: &HashMap<Uuid, Product>) -> Decimal {
    lines
        .iter()
        .map(|line| unit_price(line, products) * Decimal::from(line.quantity))
        .sum()
}

/// Derives the full monetary breakdown from a subtotal and an optional
/// coupon. Tax applies after the discount; the free-shipping test uses the
/// pre-discount subtotal.
pub fn compute_pricing(subtotal: Decimal, coupon: Option<&Coupon>) -> PricingBreakdown {
    let discount = coupon.map_or(Decimal::ZERO, |c| subtotal * c.discount_rate);
    let tax = (subtotal - discount) * TAX_RATE;
    let shipping = if subtotal > FREE_SHIPPING_THRESHOLD {
        Decimal::ZERO
    } else {
        FLAT_SHIPPING_FEE
    };
    let total = subtotal - discount + tax + shipping;

    PricingBreakdown {
        subtotal,
        discount,
        tax,
        shipping,
        total,
    }
}

/// Two-decimal rounding for presentation and the order wire. Half-away-from-
/// zero, matching how the storefront formats currency.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
