//! Domain services.
//!
//! Services own validation, uniqueness enforcement and status transitions,
//! and orchestrate the repositories. They re-validate every input
//! independently of whatever the caller may have checked: no client-side
//! validation is trusted.

pub mod doctor;
pub mod license;
pub mod medication;
pub mod patient;
pub mod prescription;
pub mod settings;

pub use doctor::{DoctorProfile, DoctorService};
pub use license::{DoctorIdCache, LicenseService};
pub use medication::{MedicationInput, MedicationService};
pub use patient::{PatientInput, PatientService};
pub use prescription::{PrescriptionDraft, PrescriptionItemDraft, PrescriptionService};
pub use settings::{SettingsService, UserSettings};

use crate::{DomainError, DomainResult};
use wasfa_types::NonEmptyText;

/// Validates a required text field, producing the given user-facing message
/// on failure. Returns the trimmed value.
pub(crate) fn require_text(value: &str, message: &str) -> DomainResult<NonEmptyText> {
    NonEmptyText::new(value).map_err(|_| DomainError::validation(message))
}
