use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::PricingBreakdown;

/// Returned after a successful checkout so the UI can route to the
/// confirmation page for the upstream-assigned order id.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    pub order_id: Uuid,
    pub total: Decimal,
    pub pricing: PricingBreakdown,
}
