use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    checkout::{CheckoutForm, FieldError},
    coupon::Coupon,
    dto::{
        cart::{AddLineRequest, ApplyCouponRequest, CartLineDto, CartView, UpdateQuantityRequest},
        checkout::CheckoutReceipt,
    },
    models::{PaymentMethod, PricingBreakdown, Product, ShippingAddress},
    response::{ApiResponse, Meta},
    routes::{cart, checkout as checkout_routes, health, orders},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        cart::view_cart,
        cart::add_to_cart,
        cart::update_quantity,
        cart::remove_from_cart,
        cart::clear_cart,
        cart::apply_coupon,
        cart::remove_coupon,
        checkout_routes::submit_checkout,
        orders::get_order,
    ),
    components(
        schemas(
            Product,
            Coupon,
            PaymentMethod,
            PricingBreakdown,
            ShippingAddress,
            CheckoutForm,
            FieldError,
            CheckoutReceipt,
            AddLineRequest,
            UpdateQuantityRequest,
            ApplyCouponRequest,
            CartLineDto,
            CartView,
            Meta,
            ApiResponse<CartView>,
            ApiResponse<CheckoutReceipt>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Cart", description = "Cart lines, coupon and pricing breakdown"),
        (name = "Checkout", description = "Checkout validation and order submission"),
        (name = "Orders", description = "Order confirmation lookup"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
