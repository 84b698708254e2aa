//! # Wasfa REST API
//!
//! HTTP surface for the Wasfa prescription management system:
//!
//! - axum handlers over the `wasfa-core` services
//! - a single domain-error-to-status-code boundary (`error`)
//! - OpenAPI/Swagger documentation via utoipa
//! - CORS for browser clients
//!
//! The router is built here so the workspace runner and the standalone
//! `wasfa-api-rest` binary serve an identical API.

#![warn(rust_2018_idioms)]

pub mod dto;
pub mod error;
pub mod handlers;

use axum::routing::{delete, get, post, put};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use wasfa_core::repositories::{
    DoctorRepository, MedicationRepository, PatientRepository, PrescriptionRepository,
};
use wasfa_core::services::{
    DoctorIdCache, DoctorService, LicenseService, MedicationService, PatientService,
    PrescriptionService, SettingsService,
};
use wasfa_core::sqlx::SqlitePool;
use wasfa_core::CoreConfig;
use wasfa_files::FileStorage;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub doctors: DoctorService,
    pub patients: PatientService,
    pub medications: MedicationService,
    pub prescriptions: PrescriptionService,
    pub license: LicenseService,
    pub settings: SettingsService,
}

impl AppState {
    /// Wires the full service graph over an open pool and storage provider.
    pub fn new(pool: SqlitePool, storage: Arc<dyn FileStorage>, cfg: &CoreConfig) -> Self {
        let patient_repo = PatientRepository::new(pool.clone());
        let prescription_repo = PrescriptionRepository::new(pool.clone());

        Self {
            doctors: DoctorService::new(DoctorRepository::new(pool.clone())),
            patients: PatientService::new(patient_repo.clone()),
            medications: MedicationService::new(MedicationRepository::new(pool)),
            prescriptions: PrescriptionService::new(prescription_repo, patient_repo),
            license: LicenseService::new(
                cfg.expected_registration_number(),
                cfg.expected_serial_number(),
                storage.clone(),
                Arc::new(DoctorIdCache::new()),
            ),
            settings: SettingsService::new(storage),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::profile::get,
        handlers::profile::save,
        handlers::profile::update,
        handlers::patients::list,
        handlers::patients::get,
        handlers::patients::create,
        handlers::patients::update,
        handlers::patients::delete,
        handlers::medications::list,
        handlers::medications::get,
        handlers::medications::create,
        handlers::medications::update,
        handlers::medications::delete,
        handlers::prescriptions::list,
        handlers::prescriptions::get,
        handlers::prescriptions::create,
        handlers::prescriptions::cancel,
        handlers::activation::status,
        handlers::activation::activate,
        handlers::settings::get,
        handlers::settings::save,
    ),
    components(schemas(
        wasfa_core::models::Doctor,
        wasfa_core::models::Patient,
        wasfa_core::models::Medication,
        wasfa_core::models::Prescription,
        wasfa_core::models::PrescriptionItem,
        wasfa_core::models::PrescriptionStatus,
        wasfa_core::services::DoctorProfile,
        wasfa_core::services::PatientInput,
        wasfa_core::services::MedicationInput,
        wasfa_core::services::PrescriptionDraft,
        wasfa_core::services::PrescriptionItemDraft,
        wasfa_core::services::UserSettings,
        dto::PagedPatients,
        dto::PagedMedications,
        dto::PagedPrescriptions,
        dto::HealthResponse,
        dto::MessageResponse,
        dto::ProfileResponse,
        dto::ActivationRequest,
        dto::ActivationStatus,
        error::ErrorBody,
    ))
)]
pub struct ApiDoc;

/// Builds the application router with Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/profile", get(handlers::profile::get))
        .route("/profile", put(handlers::profile::save))
        .route("/profile/:id", put(handlers::profile::update))
        .route("/patients", get(handlers::patients::list))
        .route("/patients", post(handlers::patients::create))
        .route("/patients/:id", get(handlers::patients::get))
        .route("/patients/:id", put(handlers::patients::update))
        .route("/patients/:id", delete(handlers::patients::delete))
        .route("/medications", get(handlers::medications::list))
        .route("/medications", post(handlers::medications::create))
        .route("/medications/:id", get(handlers::medications::get))
        .route("/medications/:id", put(handlers::medications::update))
        .route("/medications/:id", delete(handlers::medications::delete))
        .route("/prescriptions", get(handlers::prescriptions::list))
        .route("/prescriptions", post(handlers::prescriptions::create))
        .route("/prescriptions/:id", get(handlers::prescriptions::get))
        .route(
            "/prescriptions/:id/cancel",
            post(handlers::prescriptions::cancel),
        )
        .route("/activation", get(handlers::activation::status))
        .route("/activation", post(handlers::activation::activate))
        .route("/settings/:doctor_id", get(handlers::settings::get))
        .route("/settings/:doctor_id", put(handlers::settings::save))
        .merge(
            SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
