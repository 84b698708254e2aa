//! Domain entities and the prescription status machine.
//!
//! All entities are keyed by SQLite rowids and carry audit timestamps owned
//! by the persistence layer: repositories set `created_at` on insert and
//! refresh `updated_at` on every mutation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The doctor running the practice.
///
/// The schema permits many doctor rows but the application is single-tenant:
/// profile lookups always resolve to the first record. See
/// [`crate::services::DoctorService`].
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    pub specialization: String,
    pub license_number: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub is_subscribed: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A patient of the practice.
///
/// `name` and `contact_info` are unique case-insensitively across records
/// (trimmed), excluding the record itself during updates.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub contact_info: String,
    pub date_of_birth: Option<NaiveDate>,
    pub visit_count: i64,
    pub last_visit_date: Option<DateTime<Utc>>,
    pub has_outstanding_balance: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A medication in the practice catalog. `name` is unique under the same
/// normalisation rule as patient names.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Medication {
    pub id: i64,
    pub name: String,
    pub dosage: Option<String>,
    pub form: Option<String>,
    pub manufacturer: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle state of a prescription.
///
/// `Active` is the only state a prescription is created in. Cancellation is
/// one-directional: `Cancelled` and `Filled` are terminal for it. No
/// component transitions `Active` to `Expired` automatically; `expiry_date`
/// is display metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum PrescriptionStatus {
    Active,
    Expired,
    Filled,
    Cancelled,
}

impl PrescriptionStatus {
    /// Text form stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Expired => "Expired",
            Self::Filled => "Filled",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl std::str::FromStr for PrescriptionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(Self::Active),
            "Expired" => Ok(Self::Expired),
            "Filled" => Ok(Self::Filled),
            "Cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown prescription status: {other}")),
        }
    }
}

impl std::fmt::Display for PrescriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A prescription issued by the doctor for one patient.
///
/// Always owns at least one [`PrescriptionItem`] at creation time. Never
/// deleted; the only terminal user action is cancellation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Prescription {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub date_issued: DateTime<Utc>,
    pub expiry_date: Option<NaiveDate>,
    pub next_appointment_date: Option<NaiveDate>,
    pub status: PrescriptionStatus,
    /// Joined patient name, populated by list and detail queries for display.
    #[serde(default)]
    pub patient_name: Option<String>,
    /// Joined doctor name, populated by the detail query.
    #[serde(default)]
    pub doctor_name: Option<String>,
    /// Line items; populated by the detail query, empty in list rows.
    #[serde(default)]
    pub items: Vec<PrescriptionItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One medication line on a prescription.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PrescriptionItem {
    pub id: i64,
    pub prescription_id: i64,
    pub medication_id: i64,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub duration: Option<String>,
    pub quantity: String,
    pub instructions: String,
    pub refills: Option<i64>,
    pub notes: Option<String>,
    /// Joined medication name for display.
    #[serde(default)]
    pub medication_name: Option<String>,
}
