//! Request handlers, one module per resource.

pub mod activation;
pub mod medications;
pub mod patients;
pub mod prescriptions;
pub mod profile;
pub mod settings;

use crate::dto::HealthResponse;
use crate::AppState;
use axum::extract::State;
use axum::response::Json;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthResponse)
    )
)]
/// Health check endpoint, used for monitoring and load balancer probes.
#[axum::debug_handler]
pub async fn health(State(_state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        message: "Wasfa REST API is alive".into(),
    })
}
