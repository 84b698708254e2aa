//! Request and response bodies shared by the handlers.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use wasfa_core::models::{Medication, Patient, Prescription};

/// Query parameters accepted by the paged listing endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PagedQuery {
    /// 1-based page number (default 1).
    pub page: Option<i64>,
    /// Items per page (default 10).
    pub page_size: Option<i64>,
    /// Case-insensitive substring filter.
    pub search: Option<String>,
    /// Sort key, e.g. `name_desc` or `Date`.
    pub sort: Option<String>,
}

impl PagedQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1)
    }

    pub fn page_size(&self) -> i64 {
        self.page_size.unwrap_or(10)
    }
}

/// Total page count for a listing. An empty result set reports zero pages.
pub fn total_pages(total_count: i64, page_size: i64) -> i64 {
    let size = page_size.max(1);
    (total_count + size - 1) / size
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PagedPatients {
    pub items: Vec<Patient>,
    pub total_count: i64,
    pub page_number: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PagedMedications {
    pub items: Vec<Medication>,
    pub total_count: i64,
    pub page_number: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PagedPrescriptions {
    pub items: Vec<Prescription>,
    pub total_count: i64,
    pub page_number: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub ok: bool,
    pub message: String,
}

/// Generic `{"message": ...}` confirmation body.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// The doctor profile, or `null` when setup has not run yet.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub profile: Option<wasfa_core::models::Doctor>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ActivationRequest {
    pub registration_number: String,
    pub serial_number: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ActivationStatus {
    pub activated: bool,
    pub profile_setup: bool,
}
