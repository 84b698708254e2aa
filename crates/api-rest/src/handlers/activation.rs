//! License activation endpoints.

use crate::dto::{ActivationRequest, ActivationStatus, MessageResponse};
use crate::error::ApiError;
use crate::AppState;
use axum::extract::State;
use axum::response::Json;
use wasfa_core::DomainError;

#[utoipa::path(
    get,
    path = "/activation",
    responses(
        (status = 200, description = "Activation and setup state", body = ActivationStatus)
    )
)]
#[axum::debug_handler]
pub async fn status(State(state): State<AppState>) -> Result<Json<ActivationStatus>, ApiError> {
    Ok(Json(ActivationStatus {
        activated: state.license.is_activated(),
        profile_setup: state.license.is_profile_setup()?,
    }))
}

#[utoipa::path(
    post,
    path = "/activation",
    request_body = ActivationRequest,
    responses(
        (status = 200, description = "Application activated", body = MessageResponse),
        (status = 422, description = "License values do not match", body = crate::error::ErrorBody)
    )
)]
/// Validates the registration/serial pair and marks the application
/// activated. Idempotent once activated.
#[axum::debug_handler]
pub async fn activate(
    State(state): State<AppState>,
    Json(request): Json<ActivationRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !state
        .license
        .validate_license(&request.registration_number, &request.serial_number)
    {
        return Err(DomainError::business_rule("Invalid registration or serial number.").into());
    }

    state.license.mark_activated()?;

    Ok(Json(MessageResponse {
        message: "Application activated successfully.".into(),
    }))
}
