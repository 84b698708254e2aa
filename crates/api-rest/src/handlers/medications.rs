//! Medication catalog endpoints. Same surface as patients.

use crate::dto::{total_pages, MessageResponse, PagedMedications, PagedQuery};
use crate::error::ApiError;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use wasfa_core::models::Medication;
use wasfa_core::services::MedicationInput;

#[utoipa::path(
    get,
    path = "/medications",
    params(PagedQuery),
    responses(
        (status = 200, description = "Paged medication listing", body = PagedMedications),
        (status = 503, description = "Storage unavailable", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PagedQuery>,
) -> Result<Json<PagedMedications>, ApiError> {
    let page = query.page();
    let page_size = query.page_size();

    let items = state
        .medications
        .get_paged(page, page_size, query.search.as_deref(), query.sort.as_deref())
        .await?;
    let total_count = state.medications.get_count(query.search.as_deref()).await?;

    Ok(Json(PagedMedications {
        items,
        total_count,
        page_number: page,
        page_size,
        total_pages: total_pages(total_count, page_size),
    }))
}

#[utoipa::path(
    get,
    path = "/medications/{id}",
    params(("id" = i64, Path, description = "Medication id")),
    responses(
        (status = 200, description = "Medication found", body = Medication),
        (status = 404, description = "Unknown medication id", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Medication>, ApiError> {
    Ok(Json(state.medications.get_by_id(id).await?))
}

#[utoipa::path(
    post,
    path = "/medications",
    request_body = MedicationInput,
    responses(
        (status = 201, description = "Medication created", body = Medication),
        (status = 400, description = "Missing name", body = crate::error::ErrorBody),
        (status = 422, description = "Duplicate name", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<MedicationInput>,
) -> Result<(StatusCode, Json<Medication>), ApiError> {
    let medication = state.medications.add(input).await?;
    Ok((StatusCode::CREATED, Json(medication)))
}

#[utoipa::path(
    put,
    path = "/medications/{id}",
    params(("id" = i64, Path, description = "Medication id")),
    request_body = MedicationInput,
    responses(
        (status = 200, description = "Medication updated", body = Medication),
        (status = 400, description = "Missing name", body = crate::error::ErrorBody),
        (status = 404, description = "Unknown medication id", body = crate::error::ErrorBody),
        (status = 422, description = "Duplicate name", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<MedicationInput>,
) -> Result<Json<Medication>, ApiError> {
    Ok(Json(state.medications.update(id, input).await?))
}

#[utoipa::path(
    delete,
    path = "/medications/{id}",
    params(("id" = i64, Path, description = "Medication id")),
    responses(
        (status = 200, description = "Medication deleted", body = MessageResponse),
        (status = 404, description = "Unknown medication id", body = crate::error::ErrorBody)
    )
)]
#[axum::debug_handler]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.medications.delete(id).await?;
    Ok(Json(MessageResponse {
        message: "Medication deleted successfully.".into(),
    }))
}
