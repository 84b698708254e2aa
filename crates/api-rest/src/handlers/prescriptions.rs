//! Prescription endpoints.
//!
//! Creation never trusts a doctor id from the request body: the issuing
//! doctor is resolved from the license state, and a missing profile setup
//! rejects the request outright.

use crate::dto::{total_pages, PagedPrescriptions, PagedQuery};
use crate::error::ApiError;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use wasfa_core::models::Prescription;
use wasfa_core::services::PrescriptionDraft;
use wasfa_core::DomainError;

#[utoipa::path(
    get,
    path = "/prescriptions",
    params(PagedQuery),
    responses(
        (status = 200, description = "Paged prescription listing", body = PagedPrescriptions),
        (status = 503, description = "Storage unavailable", body = crate::error::ErrorBody)
    )
)]
/// Lists prescriptions, paged. Search matches the patient name; the default
/// sort is newest first.
#[axum::debug_handler]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PagedQuery>,
) -> Result<Json<PagedPrescriptions>, ApiError> {
    let page = query.page();
    let page_size = query.page_size();

    let items = state
        .prescriptions
        .get_paged(page, page_size, query.search.as_deref(), query.sort.as_deref())
        .await?;
    let total_count = state
        .prescriptions
        .get_count(query.search.as_deref())
        .await?;

    Ok(Json(PagedPrescriptions {
        items,
        total_count,
        page_number: page,
        page_size,
        total_pages: total_pages(total_count, page_size),
    }))
}

#[utoipa::path(
    get,
    path = "/prescriptions/{id}",
    params(("id" = i64, Path, description = "Prescription id")),
    responses(
        (status = 200, description = "Prescription with items", body = Prescription),
        (status = 404, description = "Unknown prescription id", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Prescription>, ApiError> {
    Ok(Json(state.prescriptions.get_by_id(id).await?))
}

#[utoipa::path(
    post,
    path = "/prescriptions",
    request_body = PrescriptionDraft,
    responses(
        (status = 201, description = "Prescription issued", body = Prescription),
        (status = 400, description = "Invalid draft", body = crate::error::ErrorBody),
        (status = 404, description = "Unknown patient id", body = crate::error::ErrorBody),
        (status = 422, description = "Doctor profile not set up", body = crate::error::ErrorBody)
    )
)]
/// Issues a new prescription as the configured doctor.
#[axum::debug_handler]
pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<PrescriptionDraft>,
) -> Result<(StatusCode, Json<Prescription>), ApiError> {
    let doctor_id = state
        .license
        .current_doctor_id()?
        .ok_or_else(|| DomainError::business_rule("Doctor profile has not been set up yet."))?;

    let prescription = state.prescriptions.create(draft, doctor_id).await?;
    Ok((StatusCode::CREATED, Json(prescription)))
}

#[utoipa::path(
    post,
    path = "/prescriptions/{id}/cancel",
    params(("id" = i64, Path, description = "Prescription id")),
    responses(
        (status = 200, description = "Prescription cancelled", body = Prescription),
        (status = 404, description = "Unknown prescription id", body = crate::error::ErrorBody),
        (status = 422, description = "Already cancelled or filled", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Prescription>, ApiError> {
    Ok(Json(state.prescriptions.cancel(id).await?))
}
