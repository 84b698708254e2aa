//! Per-doctor settings endpoints.

use crate::error::ApiError;
use crate::AppState;
use axum::extract::{Path, State};
use axum::response::Json;
use wasfa_core::services::UserSettings;

#[utoipa::path(
    get,
    path = "/settings/{doctor_id}",
    params(("doctor_id" = i64, Path, description = "Doctor id")),
    responses(
        (status = 200, description = "Settings, defaulted when unset", body = UserSettings),
        (status = 503, description = "Storage unavailable", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub async fn get(
    State(state): State<AppState>,
    Path(doctor_id): Path<i64>,
) -> Result<Json<UserSettings>, ApiError> {
    Ok(Json(state.settings.load(doctor_id)?))
}

#[utoipa::path(
    put,
    path = "/settings/{doctor_id}",
    params(("doctor_id" = i64, Path, description = "Doctor id")),
    request_body = UserSettings,
    responses(
        (status = 200, description = "Settings saved", body = UserSettings),
        (status = 503, description = "Storage unavailable", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub async fn save(
    State(state): State<AppState>,
    Path(doctor_id): Path<i64>,
    Json(settings): Json<UserSettings>,
) -> Result<Json<UserSettings>, ApiError> {
    state.settings.save(doctor_id, &settings)?;
    Ok(Json(settings))
}
