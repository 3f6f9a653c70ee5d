use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::response::{ApiResponse, Meta};

#[derive(Serialize, ToSchema)]
pub struct HealthData {
    status: String,
    service: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Engine is up; says nothing about the upstream catalog/order APIs", body = ApiResponse<HealthData>),
    ),
    tag = "Health"
)]
pub async fn health_check() -> Json<ApiResponse<HealthData>> {
    let data = HealthData {
        status: "ok".to_string(),
        service: "checkout-engine".to_string(),
    };

    Json(ApiResponse::success(
        "Checkout engine up",
        data,
        Some(Meta::empty()),
    ))
}
