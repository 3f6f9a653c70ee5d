use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Catalog product as served by the storefront backend. Read-only here;
/// monetary fields travel as strings on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub base_price: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// One cart entry: a product configuration plus quantity. Quantity is always
/// >= 1; a decrement to zero removes the line instead.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: Uuid,
    pub product_id: Option<Uuid>,
    pub design_id: Option<Uuid>,
    pub size: String,
    pub color: String,
    pub quantity: u32,
    pub custom_price: Option<Decimal>,
}

impl CartLine {
    /// Two lines are the same configuration when product, design, size and
    /// color all match; adding such a line merges quantities.
    pub fn same_configuration(&self, other: &Self) -> bool {
        self.product_id == other.product_id
            && self.design_id == other.design_id
            && self.size == other.size
            && self.color == other.color
    }
}

/// Monetary decomposition of the cart. Amounts are kept at full precision
/// internally and rounded to two decimals only when presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PricingBreakdown {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Credit,
    Paypal,
    Bank,
}

/// Shipping address block copied verbatim into the order header. The order
/// always ships to this address, never to the billing one.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BillingAddress {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// Order header sent to the order API.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub user_id: Uuid,
    pub total: Decimal,
    pub status: String,
    pub shipping_address: ShippingAddress,
}

/// Order line sent to the order API. `order_id` is assigned server-side and
/// travels empty, matching the storefront wire contract.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderItem {
    pub order_id: String,
    pub product_id: Option<Uuid>,
    pub design_id: Option<Uuid>,
    pub quantity: u32,
    pub size: String,
    pub color: String,
    pub price: Decimal,
}

/// Full order-creation request body: `{order: {...}, items: [...]}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderRequest {
    pub order: NewOrder,
    pub items: Vec<NewOrderItem>,
}

/// The slice of the order API's creation response this engine cares about.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedOrder {
    pub id: Uuid,
}
