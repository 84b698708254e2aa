//! Patient CRUD endpoints.

use crate::dto::{total_pages, MessageResponse, PagedPatients, PagedQuery};
use crate::error::ApiError;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use wasfa_core::models::Patient;
use wasfa_core::services::PatientInput;

#[utoipa::path(
    get,
    path = "/patients",
    params(PagedQuery),
    responses(
        (status = 200, description = "Paged patient listing", body = PagedPatients),
        (status = 503, description = "Storage unavailable", body = crate::error::ErrorBody)
    )
)]
/// Lists patients, paged, with optional search and sort.
///
/// Search matches name or contact info case-insensitively. Sort keys:
/// `name_desc`, `Date`, `date_desc`, `VisitDate`, `visitdate_desc`;
/// anything else sorts by name ascending.
#[axum::debug_handler]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PagedQuery>,
) -> Result<Json<PagedPatients>, ApiError> {
    let page = query.page();
    let page_size = query.page_size();

    let items = state
        .patients
        .get_paged(page, page_size, query.search.as_deref(), query.sort.as_deref())
        .await?;
    let total_count = state.patients.get_count(query.search.as_deref()).await?;

    Ok(Json(PagedPatients {
        items,
        total_count,
        page_number: page,
        page_size,
        total_pages: total_pages(total_count, page_size),
    }))
}

#[utoipa::path(
    get,
    path = "/patients/{id}",
    params(("id" = i64, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Patient found", body = Patient),
        (status = 404, description = "Unknown patient id", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Patient>, ApiError> {
    Ok(Json(state.patients.get_by_id(id).await?))
}

#[utoipa::path(
    post,
    path = "/patients",
    request_body = PatientInput,
    responses(
        (status = 201, description = "Patient created", body = Patient),
        (status = 400, description = "Missing or invalid fields", body = crate::error::ErrorBody),
        (status = 422, description = "Duplicate name or contact info", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<PatientInput>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    let patient = state.patients.add(input).await?;
    Ok((StatusCode::CREATED, Json(patient)))
}

#[utoipa::path(
    put,
    path = "/patients/{id}",
    params(("id" = i64, Path, description = "Patient id")),
    request_body = PatientInput,
    responses(
        (status = 200, description = "Patient updated", body = Patient),
        (status = 400, description = "Missing or invalid fields", body = crate::error::ErrorBody),
        (status = 404, description = "Unknown patient id", body = crate::error::ErrorBody),
        (status = 422, description = "Duplicate name or contact info", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<PatientInput>,
) -> Result<Json<Patient>, ApiError> {
    Ok(Json(state.patients.update(id, input).await?))
}

#[utoipa::path(
    delete,
    path = "/patients/{id}",
    params(("id" = i64, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Patient deleted", body = MessageResponse),
        (status = 404, description = "Unknown patient id", body = crate::error::ErrorBody)
    )
)]
/// Deletes a patient and confirms with the patient's name.
#[axum::debug_handler]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let patient = state.patients.delete(id).await?;
    Ok(Json(MessageResponse {
        message: format!("Patient '{}' deleted successfully.", patient.name),
    }))
}
