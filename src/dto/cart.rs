//! Wire shapes for the cart endpoints. Field names are camelCase to match
//! the storefront client; monetary amounts are serialized as strings and
//! rounded to two decimals for display.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::coupon::Coupon;
use crate::models::PricingBreakdown;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddLineRequest {
    pub product_id: Option<Uuid>,
    #[serde(default)]
    pub design_id: Option<Uuid>,
    pub size: String,
    pub color: String,
    pub quantity: i32,
    #[serde(default)]
    pub custom_price: Option<Decimal>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuantityRequest {
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplyCouponRequest {
    pub code: String,
}

/// One cart line with its product resolved for display. Unresolved products
/// fall back to the stock design name, image and price.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartLineDto {
    pub id: Uuid,
    pub product_id: Option<Uuid>,
    pub design_id: Option<Uuid>,
    pub product_name: String,
    pub image_url: String,
    pub size: String,
    pub color: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// The whole cart as the UI renders it: lines, applied coupon, derived
/// counts and the monetary breakdown.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartLineDto>,
    pub cart_count: u32,
    pub coupon: Option<Coupon>,
    pub pricing: PricingBreakdown,
}
