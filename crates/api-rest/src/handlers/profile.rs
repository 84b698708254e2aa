//! Doctor profile endpoints.

use crate::dto::ProfileResponse;
use crate::error::ApiError;
use crate::AppState;
use axum::extract::{Path, State};
use axum::response::Json;
use wasfa_core::models::Doctor;
use wasfa_core::services::DoctorProfile;

#[utoipa::path(
    get,
    path = "/profile",
    responses(
        (status = 200, description = "The profile, or null before setup", body = ProfileResponse)
    )
)]
#[axum::debug_handler]
pub async fn get(State(state): State<AppState>) -> Result<Json<ProfileResponse>, ApiError> {
    Ok(Json(ProfileResponse {
        profile: state.doctors.get_profile().await?,
    }))
}

#[utoipa::path(
    put,
    path = "/profile",
    request_body = DoctorProfile,
    responses(
        (status = 200, description = "Profile saved", body = Doctor),
        (status = 400, description = "Missing name or specialization", body = crate::error::ErrorBody)
    )
)]
/// Creates or updates the practice's doctor profile.
///
/// The first successful save also records the doctor id for prescription
/// issuing, completing first-run setup.
#[axum::debug_handler]
pub async fn save(
    State(state): State<AppState>,
    Json(profile): Json<DoctorProfile>,
) -> Result<Json<Doctor>, ApiError> {
    let doctor = state.doctors.save_profile(profile).await?;

    if !state.license.is_profile_setup()? {
        state.license.mark_profile_setup(doctor.id)?;
    }

    Ok(Json(doctor))
}

#[utoipa::path(
    put,
    path = "/profile/{id}",
    params(("id" = i64, Path, description = "Doctor id")),
    request_body = DoctorProfile,
    responses(
        (status = 200, description = "Profile updated", body = Doctor),
        (status = 400, description = "Missing name or specialization", body = crate::error::ErrorBody),
        (status = 404, description = "Unknown doctor id", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(profile): Json<DoctorProfile>,
) -> Result<Json<Doctor>, ApiError> {
    Ok(Json(state.doctors.update_profile(id, profile).await?))
}
