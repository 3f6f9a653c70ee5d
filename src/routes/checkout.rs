use axum::{Json, Router, extract::State, routing::post};

use crate::{
    checkout::CheckoutForm,
    dto::checkout::CheckoutReceipt,
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::checkout_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(submit_checkout))
}

#[utoipa::path(
    post,
    path = "/api/checkout",
    request_body = CheckoutForm,
    responses(
        (status = 200, description = "Order placed; cart cleared", body = ApiResponse<CheckoutReceipt>),
        (status = 400, description = "Cart is empty"),
        (status = 409, description = "A submission for this session is already in flight"),
        (status = 422, description = "One or more form fields violated a rule"),
        (status = 502, description = "Order API rejected or was unreachable"),
    ),
    security(("bearer_auth" = [])),
    tag = "Checkout"
)]
pub async fn submit_checkout(
    State(state): State<AppState>,
    user: AuthUser,
    Json(form): Json<CheckoutForm>,
) -> AppResult<Json<ApiResponse<CheckoutReceipt>>> {
    Ok(Json(checkout_service::submit(&state, &user, form).await?))
}
