//! Integration flow tests at the service layer, with wiremock standing in
//! for the external catalog and order APIs.

use axum_checkout_engine::{
    checkout::CheckoutForm,
    clients::{CatalogClient, OrderClient},
    dto::cart::{AddLineRequest, ApplyCouponRequest},
    error::AppError,
    middleware::auth::AuthUser,
    models::PaymentMethod,
    services::{cart_service, checkout_service},
    session::SessionStore,
    state::AppState,
};
use chrono::{TimeZone, Utc};
use rust_decimal::dec;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn setup_state(catalog_uri: &str, order_uri: &str) -> AppState {
    AppState {
        sessions: SessionStore::new(),
        catalog: CatalogClient::new(catalog_uri, 5).expect("catalog client"),
        orders: OrderClient::new(order_uri, 5).expect("order client"),
    }
}

fn auth_user() -> AuthUser {
    AuthUser {
        user_id: Uuid::new_v4(),
    }
}

fn add_request(product_id: Option<Uuid>, quantity: i32) -> AddLineRequest {
    AddLineRequest {
        product_id,
        design_id: None,
        size: "M".into(),
        color: "Black".into(),
        quantity,
        custom_price: None,
    }
}

fn valid_form() -> CheckoutForm {
    CheckoutForm {
        first_name: "John".into(),
        last_name: "Doe".into(),
        email: "john@example.com".into(),
        phone: "5551234567".into(),
        address: "123 Main Street".into(),
        city: "New York".into(),
        state: "NY".into(),
        zip_code: "10001".into(),
        country: "United States".into(),
        payment_method: Some(PaymentMethod::Credit),
        card_name: Some("John Doe".into()),
        card_number: Some("4532 0151 1283 0366".into()),
        expiry_date: Some("06/25".into()),
        cvv: Some("123".into()),
        same_as_shipping: true,
        billing_first_name: None,
        billing_last_name: None,
        billing_address: None,
        billing_city: None,
        billing_state: None,
        billing_zip_code: None,
        billing_country: None,
    }
}

fn test_now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
}

async fn mount_catalog(server: &MockServer, product_id: Uuid) {
    let body = serde_json::json!([{
        "id": product_id,
        "name": "Classic Tee",
        "basePrice": "25.99",
        "imageUrl": "https://example.com/tee.jpg",
        "description": "A plain classic tee"
    }]);
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(server)
        .await;
}

// Full flow: add to cart -> apply coupon -> priced view -> checkout submits
// the assembled order upstream and clears the session.
#[tokio::test]
async fn checkout_flow_places_order_and_clears_cart() {
    let catalog = MockServer::start().await;
    let orders = MockServer::start().await;
    let state = setup_state(&catalog.uri(), &orders.uri());
    let user = auth_user();
    let product_id = Uuid::new_v4();
    let order_id = Uuid::new_v4();

    mount_catalog(&catalog, product_id).await;
    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .and(body_partial_json(serde_json::json!({
            "order": {
                "userId": user.user_id,
                "total": "50.52",
                "status": "pending",
                "shippingAddress": { "city": "New York", "zipCode": "10001" }
            },
            "items": [{
                "productId": product_id,
                "quantity": 2,
                "size": "M",
                "color": "Black",
                "price": "25.99"
            }]
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(serde_json::json!({ "id": order_id })),
        )
        .expect(1)
        .mount(&orders)
        .await;

    cart_service::add_line(&state, &user, add_request(Some(product_id), 2))
        .await
        .expect("add line");
    cart_service::apply_coupon(
        &state,
        &user,
        ApplyCouponRequest {
            code: "save10".into(),
        },
    )
    .await
    .expect("apply coupon");

    let view = cart_service::view_cart(&state, &user)
        .await
        .expect("view cart")
        .data
        .unwrap();
    assert_eq!(view.cart_count, 2);
    assert_eq!(view.coupon.as_ref().unwrap().code, "SAVE10");
    assert_eq!(view.pricing.subtotal, dec!(51.98));
    assert_eq!(view.pricing.discount, dec!(5.20));
    assert_eq!(view.pricing.tax, dec!(3.74));
    assert_eq!(view.pricing.shipping, dec!(0));
    assert_eq!(view.pricing.total, dec!(50.52));
    assert_eq!(view.items[0].product_name, "Classic Tee");

    let receipt = checkout_service::submit_at(&state, &user, valid_form(), test_now())
        .await
        .expect("checkout")
        .data
        .unwrap();
    assert_eq!(receipt.order_id, order_id);
    assert_eq!(receipt.total, dec!(50.52));

    let after = cart_service::view_cart(&state, &user)
        .await
        .expect("view cart after checkout")
        .data
        .unwrap();
    assert!(after.items.is_empty());
    assert!(after.coupon.is_none());
}

// A design-priced line with sub-cent precision must hit the order wire
// rounded to two decimals, on the same regime as the header total.
#[tokio::test]
async fn custom_prices_are_rounded_on_the_order_wire() {
    let catalog = MockServer::start().await;
    let orders = MockServer::start().await;
    let state = setup_state(&catalog.uri(), &orders.uri());
    let user = auth_user();
    let order_id = Uuid::new_v4();

    mount_catalog(&catalog, Uuid::new_v4()).await;
    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .and(body_partial_json(serde_json::json!({
            "order": { "total": "16.80" },
            "items": [{ "price": "10.01" }]
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(serde_json::json!({ "id": order_id })),
        )
        .expect(1)
        .mount(&orders)
        .await;

    let mut request = add_request(None, 1);
    request.custom_price = Some(dec!(10.005));
    cart_service::add_line(&state, &user, request)
        .await
        .expect("add line");

    let receipt = checkout_service::submit_at(&state, &user, valid_form(), test_now())
        .await
        .expect("checkout")
        .data
        .unwrap();
    assert_eq!(receipt.order_id, order_id);
    assert_eq!(receipt.total, dec!(16.80));
}

#[tokio::test]
async fn below_threshold_cart_pays_flat_shipping() {
    let catalog = MockServer::start().await;
    let state = setup_state(&catalog.uri(), &catalog.uri());
    let user = auth_user();
    let product_id = Uuid::new_v4();
    mount_catalog(&catalog, product_id).await;

    cart_service::add_line(&state, &user, add_request(Some(product_id), 1))
        .await
        .expect("add line");
    let view = cart_service::view_cart(&state, &user)
        .await
        .expect("view cart")
        .data
        .unwrap();

    assert_eq!(view.pricing.subtotal, dec!(25.99));
    assert_eq!(view.pricing.shipping, dec!(5.99));
    assert_eq!(view.pricing.tax, dec!(2.08));
    assert_eq!(view.pricing.total, dec!(34.06));
}

#[tokio::test]
async fn upstream_rejection_is_surfaced_and_keeps_the_cart() {
    let catalog = MockServer::start().await;
    let orders = MockServer::start().await;
    let state = setup_state(&catalog.uri(), &orders.uri());
    let user = auth_user();
    let product_id = Uuid::new_v4();

    mount_catalog(&catalog, product_id).await;
    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "Insufficient stock"
        })))
        .mount(&orders)
        .await;

    cart_service::add_line(&state, &user, add_request(Some(product_id), 2))
        .await
        .expect("add line");

    let err = checkout_service::submit_at(&state, &user, valid_form(), test_now())
        .await
        .expect_err("upstream rejection");
    match err {
        AppError::Upstream(message) => assert_eq!(message, "Insufficient stock"),
        other => panic!("expected Upstream, got {other:?}"),
    }

    // The cart survives the failure and the submission slot is free again.
    let view = cart_service::view_cart(&state, &user)
        .await
        .expect("view cart")
        .data
        .unwrap();
    assert_eq!(view.cart_count, 2);
    assert!(matches!(
        checkout_service::submit_at(&state, &user, valid_form(), test_now()).await,
        Err(AppError::Upstream(_))
    ));
}

#[tokio::test]
async fn empty_cart_blocks_checkout() {
    let catalog = MockServer::start().await;
    let orders = MockServer::start().await;
    let state = setup_state(&catalog.uri(), &orders.uri());
    let user = auth_user();

    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&orders)
        .await;

    let err = checkout_service::submit_at(&state, &user, valid_form(), test_now())
        .await
        .expect_err("empty cart");
    assert!(matches!(err, AppError::EmptyCart));
}

#[tokio::test]
async fn invalid_form_never_reaches_the_order_api() {
    let catalog = MockServer::start().await;
    let orders = MockServer::start().await;
    let state = setup_state(&catalog.uri(), &orders.uri());
    let user = auth_user();
    let product_id = Uuid::new_v4();

    mount_catalog(&catalog, product_id).await;
    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&orders)
        .await;

    cart_service::add_line(&state, &user, add_request(Some(product_id), 1))
        .await
        .expect("add line");

    let mut form = valid_form();
    form.same_as_shipping = false;
    form.billing_first_name = Some("Jane".into());
    form.billing_last_name = Some("Doe".into());
    form.billing_address = Some("456 Oak Avenue".into());
    form.billing_state = Some("CA".into());
    form.billing_zip_code = Some("94105".into());
    form.billing_country = Some("United States".into());

    let err = checkout_service::submit_at(&state, &user, form, test_now())
        .await
        .expect_err("validation failure");
    match err {
        AppError::Validation(errors) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].field, "billingCity");
        }
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[tokio::test]
async fn catalog_outage_degrades_to_fallback_pricing() {
    // No catalog mock mounted: every product fetch fails.
    let catalog = MockServer::start().await;
    let state = setup_state(&catalog.uri(), &catalog.uri());
    let user = auth_user();

    cart_service::add_line(&state, &user, add_request(Some(Uuid::new_v4()), 1))
        .await
        .expect("add line");
    let view = cart_service::view_cart(&state, &user)
        .await
        .expect("view cart")
        .data
        .unwrap();

    assert_eq!(view.items[0].product_name, "Custom Design");
    assert_eq!(view.items[0].unit_price, dec!(25.99));
    assert_eq!(view.pricing.subtotal, dec!(25.99));
}

#[tokio::test]
async fn unknown_coupon_is_rejected_without_touching_totals() {
    let catalog = MockServer::start().await;
    let state = setup_state(&catalog.uri(), &catalog.uri());
    let user = auth_user();
    let product_id = Uuid::new_v4();
    mount_catalog(&catalog, product_id).await;

    cart_service::add_line(&state, &user, add_request(Some(product_id), 1))
        .await
        .expect("add line");
    cart_service::apply_coupon(
        &state,
        &user,
        ApplyCouponRequest {
            code: "SAVE10".into(),
        },
    )
    .await
    .expect("apply valid coupon");

    let err = cart_service::apply_coupon(
        &state,
        &user,
        ApplyCouponRequest {
            code: "bogus".into(),
        },
    )
    .await
    .expect_err("unknown coupon");
    assert!(matches!(err, AppError::InvalidCoupon(_)));

    // The previously applied coupon is untouched.
    let view = cart_service::view_cart(&state, &user)
        .await
        .expect("view cart")
        .data
        .unwrap();
    assert_eq!(view.coupon.unwrap().code, "SAVE10");
    assert_eq!(view.pricing.discount, dec!(2.60));
}

#[tokio::test]
async fn order_lookup_passes_the_upstream_payload_through() {
    let catalog = MockServer::start().await;
    let orders = MockServer::start().await;
    let state = setup_state(&catalog.uri(), &orders.uri());
    let user = auth_user();
    let order_id = Uuid::new_v4();

    let body = serde_json::json!({
        "id": order_id,
        "status": "pending",
        "orderItems": [{ "quantity": 2, "size": "M", "color": "Black" }]
    });
    Mock::given(method("GET"))
        .and(path(format!("/api/orders/{order_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&orders)
        .await;

    let order = checkout_service::get_order(&state, &user, order_id)
        .await
        .expect("order lookup")
        .data
        .unwrap();
    assert_eq!(order["status"], "pending");
    assert_eq!(order["orderItems"][0]["quantity"], 2);

    let missing = checkout_service::get_order(&state, &user, Uuid::new_v4())
        .await
        .expect_err("missing order");
    assert!(matches!(missing, AppError::NotFound));
}
