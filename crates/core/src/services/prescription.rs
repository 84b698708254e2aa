//! Prescription lifecycle service.
//!
//! Creation is fail-fast: the whole draft is rejected if any item is
//! invalid, rather than silently dropping bad items. The status machine is
//! `Active → {Cancelled, Expired, Filled}`, and cancellation is
//! one-directional: `Cancelled` and `Filled` prescriptions cannot be
//! cancelled (again). Nothing here drives `Active → Expired`; the expiry
//! date is display metadata only.

use crate::error::{DomainError, DomainResult};
use crate::models::{Prescription, PrescriptionItem, PrescriptionStatus};
use crate::repositories::{PatientRepository, PrescriptionRepository};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use utoipa::ToSchema;

/// A prescription as submitted by the caller. The issuing doctor id is
/// *not* part of the draft: it is derived from the license state by the
/// caller and passed separately, never trusted from client input.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PrescriptionDraft {
    pub patient_id: i64,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub next_appointment_date: Option<NaiveDate>,
    #[serde(default)]
    pub items: Vec<PrescriptionItemDraft>,
}

/// One medication line of a draft.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PrescriptionItemDraft {
    pub medication_id: i64,
    #[serde(default)]
    pub dosage: Option<String>,
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    pub quantity: String,
    pub instructions: String,
    #[serde(default)]
    pub refills: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Clone, Debug)]
pub struct PrescriptionService {
    prescriptions: PrescriptionRepository,
    patients: PatientRepository,
}

impl PrescriptionService {
    pub fn new(prescriptions: PrescriptionRepository, patients: PatientRepository) -> Self {
        Self {
            prescriptions,
            patients,
        }
    }

    fn validate(draft: &PrescriptionDraft) -> DomainResult<()> {
        if draft.items.is_empty() {
            return Err(DomainError::validation(
                "The prescription must contain at least one medication item.",
            ));
        }

        for item in &draft.items {
            if item.medication_id <= 0 {
                return Err(DomainError::validation(
                    "Each prescription item must reference a medication.",
                ));
            }
            if item.quantity.trim().is_empty() {
                return Err(DomainError::validation(
                    "Prescription item quantity is required.",
                ));
            }
            if item.instructions.trim().is_empty() {
                return Err(DomainError::validation(
                    "Prescription item instructions are required.",
                ));
            }
        }

        let today = Utc::now().date_naive();
        if let Some(expiry) = draft.expiry_date {
            if expiry <= today {
                return Err(DomainError::validation("Expiry date must be in the future."));
            }
        }
        if let Some(next_appointment) = draft.next_appointment_date {
            if next_appointment <= today {
                return Err(DomainError::validation(
                    "Next appointment date must be in the future.",
                ));
            }
        }

        Ok(())
    }

    /// Issues a new prescription for `doctor_id` with status `Active` and
    /// `date_issued` set to now.
    pub async fn create(
        &self,
        draft: PrescriptionDraft,
        doctor_id: i64,
    ) -> DomainResult<Prescription> {
        Self::validate(&draft)?;

        let patient_exists = self
            .patients
            .exists(draft.patient_id)
            .await
            .map_err(|e| DomainError::infrastructure("Failed to check patient existence.", e))?;
        if !patient_exists {
            return Err(DomainError::not_found("Patient", draft.patient_id));
        }

        let items = draft
            .items
            .into_iter()
            .map(|item| PrescriptionItem {
                id: 0,
                prescription_id: 0,
                medication_id: item.medication_id,
                dosage: item.dosage,
                frequency: item.frequency,
                duration: item.duration,
                quantity: item.quantity,
                instructions: item.instructions,
                refills: item.refills,
                notes: item.notes,
                medication_name: None,
            })
            .collect();

        let prescription = Prescription {
            id: 0,
            patient_id: draft.patient_id,
            doctor_id,
            date_issued: Utc::now(),
            expiry_date: draft.expiry_date,
            next_appointment_date: draft.next_appointment_date,
            status: PrescriptionStatus::Active,
            patient_name: None,
            doctor_name: None,
            items,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let created = self
            .prescriptions
            .add(prescription)
            .await
            .map_err(|e| DomainError::infrastructure("Failed to create prescription.", e))?;

        tracing::info!(
            prescription_id = created.id,
            patient_id = created.patient_id,
            "issued prescription"
        );
        Ok(created)
    }

    /// Cancels an active prescription.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the id is unknown
    /// - `BusinessRule` if the prescription is already `Cancelled` or is
    ///   `Filled`
    pub async fn cancel(&self, id: i64) -> DomainResult<Prescription> {
        let prescription = self.get_by_id(id).await?;

        match prescription.status {
            PrescriptionStatus::Cancelled => Err(DomainError::business_rule(
                "Cannot cancel a prescription that is already cancelled.",
            )),
            PrescriptionStatus::Filled => Err(DomainError::business_rule(
                "Cannot cancel a filled prescription.",
            )),
            // Expired prescriptions can still be cancelled explicitly; only
            // Cancelled and Filled are terminal for this operation.
            PrescriptionStatus::Active | PrescriptionStatus::Expired => {
                let updated = self
                    .prescriptions
                    .set_status(id, PrescriptionStatus::Cancelled)
                    .await
                    .map_err(|e| {
                        DomainError::infrastructure("Failed to cancel prescription.", e)
                    })?;
                if !updated {
                    return Err(DomainError::not_found("Prescription", id));
                }

                tracing::info!(prescription_id = id, "cancelled prescription");
                self.get_by_id(id).await
            }
        }
    }

    pub async fn get_all(&self) -> DomainResult<Vec<Prescription>> {
        self.prescriptions
            .get_all()
            .await
            .map_err(|e| DomainError::infrastructure("Failed to retrieve prescriptions.", e))
    }

    pub async fn search(&self, search_term: &str) -> DomainResult<Vec<Prescription>> {
        self.prescriptions
            .search(search_term)
            .await
            .map_err(|e| DomainError::infrastructure("Failed to search prescriptions.", e))
    }

    pub async fn get_by_id(&self, id: i64) -> DomainResult<Prescription> {
        self.prescriptions
            .get_by_id(id)
            .await
            .map_err(|e| DomainError::infrastructure("Failed to retrieve prescription.", e))?
            .ok_or(DomainError::not_found("Prescription", id))
    }

    pub async fn get_paged(
        &self,
        page_number: i64,
        page_size: i64,
        search_term: Option<&str>,
        sort_order: Option<&str>,
    ) -> DomainResult<Vec<Prescription>> {
        self.prescriptions
            .get_paged(page_number, page_size, search_term, sort_order)
            .await
            .map_err(|e| DomainError::infrastructure("Failed to retrieve paged prescriptions.", e))
    }

    pub async fn get_count(&self, search_term: Option<&str>) -> DomainResult<i64> {
        self.prescriptions
            .get_count(search_term)
            .await
            .map_err(|e| DomainError::infrastructure("Failed to count prescriptions.", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Patient;
    use crate::repositories::test_pool;

    struct Fixture {
        service: PrescriptionService,
        patients: PatientRepository,
        prescriptions: PrescriptionRepository,
    }

    async fn fixture() -> Fixture {
        let pool = test_pool().await;
        let patients = PatientRepository::new(pool.clone());
        let prescriptions = PrescriptionRepository::new(pool);
        Fixture {
            service: PrescriptionService::new(prescriptions.clone(), patients.clone()),
            patients,
            prescriptions,
        }
    }

    async fn seed_patient(patients: &PatientRepository, name: &str, contact: &str) -> Patient {
        patients
            .add(Patient {
                id: 0,
                name: name.into(),
                contact_info: contact.into(),
                date_of_birth: None,
                visit_count: 0,
                last_visit_date: None,
                has_outstanding_balance: false,
                is_active: true,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .await
            .unwrap()
    }

    fn item(medication_id: i64) -> PrescriptionItemDraft {
        PrescriptionItemDraft {
            medication_id,
            dosage: None,
            frequency: None,
            duration: None,
            quantity: "30 tablets".into(),
            instructions: "Take one daily".into(),
            refills: None,
            notes: None,
        }
    }

    fn draft(patient_id: i64, items: Vec<PrescriptionItemDraft>) -> PrescriptionDraft {
        PrescriptionDraft {
            patient_id,
            expiry_date: None,
            next_appointment_date: None,
            items,
        }
    }

    #[tokio::test]
    async fn create_with_no_items_fails_regardless_of_patient() {
        let fx = fixture().await;
        let patient = seed_patient(&fx.patients, "Ahmed Zewail", "ahmed@example.com").await;

        let err = fx
            .service
            .create(draft(patient.id, vec![]), 1)
            .await
            .unwrap_err();

        match err {
            DomainError::Validation(message) => assert_eq!(
                message,
                "The prescription must contain at least one medication item."
            ),
            other => panic!("expected Validation, got {other:?}"),
        }
        assert_eq!(fx.service.get_count(None).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn create_rejects_items_without_instructions() {
        let fx = fixture().await;
        let patient = seed_patient(&fx.patients, "Ahmed Zewail", "ahmed@example.com").await;

        let mut bad = item(2);
        bad.instructions = "  ".into();

        let err = fx
            .service
            .create(draft(patient.id, vec![item(1), bad]), 1)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        // Fail-fast: nothing was persisted, not even the valid item.
        assert_eq!(fx.service.get_count(None).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn create_rejects_unreferenced_medication_ids() {
        let fx = fixture().await;
        let patient = seed_patient(&fx.patients, "Ahmed Zewail", "ahmed@example.com").await;

        let err = fx
            .service
            .create(draft(patient.id, vec![item(0)]), 1)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn create_for_missing_patient_is_not_found() {
        let fx = fixture().await;

        let err = fx.service.create(draft(999, vec![item(2)]), 1).await.unwrap_err();

        assert!(matches!(
            err,
            DomainError::NotFound { entity: "Patient", id: 999 }
        ));
    }

    #[tokio::test]
    async fn create_rejects_past_expiry_date() {
        let fx = fixture().await;
        let patient = seed_patient(&fx.patients, "Ahmed Zewail", "ahmed@example.com").await;

        let mut d = draft(patient.id, vec![item(2)]);
        d.expiry_date = Some(Utc::now().date_naive());

        let err = fx.service.create(d, 1).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn create_issues_an_active_prescription_with_items() {
        let fx = fixture().await;
        let patient = seed_patient(&fx.patients, "Ahmed Zewail", "ahmed@example.com").await;

        let before = Utc::now();
        let created = fx
            .service
            .create(draft(patient.id, vec![item(2)]), 1)
            .await
            .unwrap();

        assert!(created.id > 0);
        assert_eq!(created.status, PrescriptionStatus::Active);
        assert_eq!(created.doctor_id, 1);
        assert!(created.date_issued >= before && created.date_issued <= Utc::now());
        assert_eq!(created.items.len(), 1);
        assert_eq!(created.items[0].medication_id, 2);
        assert_eq!(created.items[0].prescription_id, created.id);

        let fetched = fx.service.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched.items.len(), 1);
        assert_eq!(fetched.patient_name.as_deref(), Some("Ahmed Zewail"));
    }

    #[tokio::test]
    async fn cancel_succeeds_once_then_fails_with_business_rule() {
        let fx = fixture().await;
        let patient = seed_patient(&fx.patients, "Ahmed Zewail", "ahmed@example.com").await;
        let created = fx
            .service
            .create(draft(patient.id, vec![item(2)]), 1)
            .await
            .unwrap();

        let cancelled = fx.service.cancel(created.id).await.unwrap();
        assert_eq!(cancelled.status, PrescriptionStatus::Cancelled);
        assert!(cancelled.updated_at >= created.updated_at);

        let err = fx.service.cancel(created.id).await.unwrap_err();
        match err {
            DomainError::BusinessRule(message) => assert_eq!(
                message,
                "Cannot cancel a prescription that is already cancelled."
            ),
            other => panic!("expected BusinessRule, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn cancel_on_a_filled_prescription_always_fails() {
        let fx = fixture().await;
        let patient = seed_patient(&fx.patients, "Ahmed Zewail", "ahmed@example.com").await;
        let created = fx
            .service
            .create(draft(patient.id, vec![item(2)]), 1)
            .await
            .unwrap();

        fx.prescriptions
            .set_status(created.id, PrescriptionStatus::Filled)
            .await
            .unwrap();

        let err = fx.service.cancel(created.id).await.unwrap_err();
        match err {
            DomainError::BusinessRule(message) => {
                assert_eq!(message, "Cannot cancel a filled prescription.")
            }
            other => panic!("expected BusinessRule, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn cancel_missing_prescription_is_not_found() {
        let fx = fixture().await;

        let err = fx.service.cancel(404).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::NotFound { entity: "Prescription", id: 404 }
        ));
    }

    #[tokio::test]
    async fn paged_search_matches_patient_name() {
        let fx = fixture().await;
        let zewail = seed_patient(&fx.patients, "Ahmed Zewail", "ahmed@example.com").await;
        let kulthum = seed_patient(&fx.patients, "Umm Kulthum", "umm@example.com").await;

        fx.service
            .create(draft(zewail.id, vec![item(1)]), 1)
            .await
            .unwrap();
        fx.service
            .create(draft(kulthum.id, vec![item(2)]), 1)
            .await
            .unwrap();

        let page = fx
            .service
            .get_paged(1, 10, Some("kulthum"), None)
            .await
            .unwrap();

        assert_eq!(page.len(), 1);
        assert_eq!(page[0].patient_name.as_deref(), Some("Umm Kulthum"));
        assert_eq!(fx.service.get_count(Some("kulthum")).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn paged_listing_defaults_to_newest_first() {
        let fx = fixture().await;
        let patient = seed_patient(&fx.patients, "Ahmed Zewail", "ahmed@example.com").await;

        let first = fx
            .service
            .create(draft(patient.id, vec![item(1)]), 1)
            .await
            .unwrap();
        let second = fx
            .service
            .create(draft(patient.id, vec![item(2)]), 1)
            .await
            .unwrap();

        let page = fx.service.get_paged(1, 10, None, None).await.unwrap();
        let ids: Vec<_> = page.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);

        let page = fx
            .service
            .get_paged(1, 10, None, Some("Date"))
            .await
            .unwrap();
        let ids: Vec<_> = page.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }
}
