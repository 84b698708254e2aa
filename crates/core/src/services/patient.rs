//! Patient service: CRUD with required-field validation and the two
//! uniqueness dimensions (name, then contact info).

use crate::error::{DomainError, DomainResult};
use crate::models::Patient;
use crate::repositories::PatientRepository;
use crate::services::require_text;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use utoipa::ToSchema;

/// Caller-supplied patient fields. The repository owns ids, visit counters
/// and audit timestamps.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PatientInput {
    pub name: String,
    pub contact_info: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub last_visit_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub has_outstanding_balance: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug)]
pub struct PatientService {
    repo: PatientRepository,
}

impl PatientService {
    pub fn new(repo: PatientRepository) -> Self {
        Self { repo }
    }

    /// Validates input shape: required fields and date sanity. Runs before
    /// any repository access so invalid input never reaches the store.
    fn validate(input: &PatientInput) -> DomainResult<()> {
        require_text(&input.name, "Patient name is required.")?;
        require_text(&input.contact_info, "Patient contact information is required.")?;

        if let Some(date_of_birth) = input.date_of_birth {
            if date_of_birth >= Utc::now().date_naive() {
                return Err(DomainError::validation(
                    "Date of birth must be in the past.",
                ));
            }
        }

        if let Some(last_visit) = input.last_visit_date {
            if last_visit > Utc::now() {
                return Err(DomainError::validation(
                    "Last visit date cannot be in the future.",
                ));
            }
        }

        Ok(())
    }

    /// Enforces uniqueness of name and contact info. The name check runs
    /// first; whichever dimension conflicts first is reported.
    async fn check_uniqueness(
        &self,
        input: &PatientInput,
        exclude_id: Option<i64>,
    ) -> DomainResult<()> {
        let name_unique = self
            .repo
            .is_name_unique(&input.name, exclude_id)
            .await
            .map_err(|e| DomainError::infrastructure("Failed to validate name uniqueness.", e))?;
        if !name_unique {
            return Err(DomainError::business_rule(format!(
                "A patient with the name '{}' already exists.",
                input.name.trim()
            )));
        }

        let contact_unique = self
            .repo
            .is_contact_info_unique(&input.contact_info, exclude_id)
            .await
            .map_err(|e| {
                DomainError::infrastructure("Failed to validate contact info uniqueness.", e)
            })?;
        if !contact_unique {
            return Err(DomainError::business_rule(format!(
                "A patient with the contact info '{}' already exists.",
                input.contact_info.trim()
            )));
        }

        Ok(())
    }

    pub async fn get_all(&self) -> DomainResult<Vec<Patient>> {
        self.repo
            .get_all()
            .await
            .map_err(|e| DomainError::infrastructure("Failed to retrieve patients.", e))
    }

    pub async fn search(&self, search_term: &str) -> DomainResult<Vec<Patient>> {
        self.repo
            .search(search_term)
            .await
            .map_err(|e| DomainError::infrastructure("Failed to search patients.", e))
    }

    pub async fn get_by_id(&self, id: i64) -> DomainResult<Patient> {
        self.repo
            .get_by_id(id)
            .await
            .map_err(|e| DomainError::infrastructure("Failed to retrieve patient.", e))?
            .ok_or(DomainError::not_found("Patient", id))
    }

    pub async fn add(&self, input: PatientInput) -> DomainResult<Patient> {
        Self::validate(&input)?;
        self.check_uniqueness(&input, None).await?;

        let patient = Patient {
            id: 0,
            name: input.name,
            contact_info: input.contact_info,
            date_of_birth: input.date_of_birth,
            visit_count: 0,
            last_visit_date: input.last_visit_date,
            has_outstanding_balance: input.has_outstanding_balance,
            is_active: input.is_active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        self.repo
            .add(patient)
            .await
            .map_err(|e| DomainError::infrastructure("Failed to add patient.", e))
    }

    pub async fn update(&self, id: i64, input: PatientInput) -> DomainResult<Patient> {
        Self::validate(&input)?;

        let mut patient = self.get_by_id(id).await?;
        self.check_uniqueness(&input, Some(id)).await?;

        patient.name = input.name;
        patient.contact_info = input.contact_info;
        patient.date_of_birth = input.date_of_birth;
        patient.last_visit_date = input.last_visit_date;
        patient.has_outstanding_balance = input.has_outstanding_balance;
        patient.is_active = input.is_active;

        let updated = self
            .repo
            .update(&patient)
            .await
            .map_err(|e| DomainError::infrastructure("Failed to update patient.", e))?;
        if !updated {
            // Row disappeared between fetch and update.
            return Err(DomainError::not_found("Patient", id));
        }

        Ok(patient)
    }

    /// Fetch-then-delete so the deleted patient (and in particular their
    /// name) can be returned for caller messaging.
    pub async fn delete(&self, id: i64) -> DomainResult<Patient> {
        let patient = self.get_by_id(id).await?;

        self.repo
            .delete(id)
            .await
            .map_err(|e| DomainError::infrastructure("Failed to delete patient.", e))?;

        tracing::info!(patient_id = id, "deleted patient");
        Ok(patient)
    }

    pub async fn exists(&self, id: i64) -> DomainResult<bool> {
        self.repo
            .exists(id)
            .await
            .map_err(|e| DomainError::infrastructure("Failed to check patient existence.", e))
    }

    pub async fn is_name_unique(&self, name: &str, exclude_id: Option<i64>) -> DomainResult<bool> {
        self.repo
            .is_name_unique(name, exclude_id)
            .await
            .map_err(|e| DomainError::infrastructure("Failed to validate name uniqueness.", e))
    }

    pub async fn is_contact_info_unique(
        &self,
        contact_info: &str,
        exclude_id: Option<i64>,
    ) -> DomainResult<bool> {
        self.repo
            .is_contact_info_unique(contact_info, exclude_id)
            .await
            .map_err(|e| {
                DomainError::infrastructure("Failed to validate contact info uniqueness.", e)
            })
    }

    pub async fn get_paged(
        &self,
        page_number: i64,
        page_size: i64,
        search_term: Option<&str>,
        sort_order: Option<&str>,
    ) -> DomainResult<Vec<Patient>> {
        self.repo
            .get_paged(page_number, page_size, search_term, sort_order)
            .await
            .map_err(|e| DomainError::infrastructure("Failed to retrieve paged patients.", e))
    }

    pub async fn get_count(&self, search_term: Option<&str>) -> DomainResult<i64> {
        self.repo
            .get_count(search_term)
            .await
            .map_err(|e| DomainError::infrastructure("Failed to count patients.", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_pool;

    async fn service() -> PatientService {
        PatientService::new(PatientRepository::new(test_pool().await))
    }

    fn input(name: &str, contact: &str) -> PatientInput {
        PatientInput {
            name: name.into(),
            contact_info: contact.into(),
            date_of_birth: None,
            last_visit_date: None,
            has_outstanding_balance: false,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn add_rejects_empty_name_without_touching_the_store() {
        let service = service().await;

        let err = service.add(input("   ", "a@example.com")).await.unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(service.get_count(None).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn add_rejects_empty_contact_info() {
        let service = service().await;

        let err = service.add(input("Taha Hussein", "")).await.unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(service.get_count(None).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn add_rejects_future_date_of_birth() {
        let service = service().await;
        let mut patient = input("Taha Hussein", "taha@example.com");
        patient.date_of_birth = Some(Utc::now().date_naive() + chrono::Days::new(1));

        let err = service.add(patient).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn duplicate_name_fails_with_the_documented_message() {
        let service = service().await;
        service
            .add(input("Ahmed Zewail", "ahmed.zewail@example.com"))
            .await
            .unwrap();

        let err = service
            .add(input("  ahmed ZEWAIL ", "other@example.com"))
            .await
            .unwrap_err();

        match err {
            DomainError::BusinessRule(message) => {
                assert_eq!(message, "A patient with the name 'ahmed ZEWAIL' already exists.")
            }
            other => panic!("expected BusinessRule, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn exact_duplicate_reports_the_name_conflict_first() {
        let service = service().await;
        service
            .add(input("Ahmed Zewail", "ahmed.zewail@example.com"))
            .await
            .unwrap();

        // Both dimensions conflict; the name check must win.
        let err = service
            .add(input("Ahmed Zewail", "ahmed.zewail@example.com"))
            .await
            .unwrap_err();

        match err {
            DomainError::BusinessRule(message) => {
                assert_eq!(
                    message,
                    "A patient with the name 'Ahmed Zewail' already exists."
                )
            }
            other => panic!("expected BusinessRule, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn duplicate_contact_info_fails_when_name_differs() {
        let service = service().await;
        service
            .add(input("Ahmed Zewail", "shared@example.com"))
            .await
            .unwrap();

        let err = service
            .add(input("Umm Kulthum", " SHARED@example.com "))
            .await
            .unwrap_err();

        match err {
            DomainError::BusinessRule(message) => {
                assert!(message.contains("contact info"), "got: {message}")
            }
            other => panic!("expected BusinessRule, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_excludes_the_record_itself_from_uniqueness() {
        let service = service().await;
        let patient = service
            .add(input("Umm Kulthum", "umm.kulthum@example.com"))
            .await
            .unwrap();

        let mut changed = input("Umm Kulthum", "umm.kulthum@example.com");
        changed.has_outstanding_balance = true;

        let updated = service.update(patient.id, changed).await.unwrap();
        assert!(updated.has_outstanding_balance);
    }

    #[tokio::test]
    async fn update_missing_patient_is_not_found() {
        let service = service().await;

        let err = service
            .update(999, input("Nobody", "nobody@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DomainError::NotFound { entity: "Patient", id: 999 }
        ));
    }

    #[tokio::test]
    async fn delete_returns_the_removed_patient() {
        let service = service().await;
        let patient = service
            .add(input("Taha Hussein", "taha@example.com"))
            .await
            .unwrap();

        let deleted = service.delete(patient.id).await.unwrap();

        assert_eq!(deleted.name, "Taha Hussein");
        assert!(!service.exists(patient.id).await.unwrap());

        let err = service.delete(patient.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn paged_search_matches_name_substring_case_insensitively() {
        let service = service().await;
        for (name, contact) in [
            ("Ahmed Zewail", "ahmed.zewail@example.com"),
            ("Umm Kulthum", "umm.kulthum@example.com"),
            ("Taha Hussein", "taha.hussein@example.com"),
        ] {
            service.add(input(name, contact)).await.unwrap();
        }

        let page = service
            .get_paged(1, 10, Some("kulthum"), None)
            .await
            .unwrap();

        assert_eq!(page.len(), 1);
        assert_eq!(page[0].name, "Umm Kulthum");
        assert_eq!(service.get_count(Some("kulthum")).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn paged_sorting_defaults_to_name_ascending() {
        let service = service().await;
        for (name, contact) in [
            ("Umm Kulthum", "umm@example.com"),
            ("Ahmed Zewail", "ahmed@example.com"),
        ] {
            service.add(input(name, contact)).await.unwrap();
        }

        let page = service.get_paged(1, 10, None, None).await.unwrap();
        let names: Vec<_> = page.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Ahmed Zewail", "Umm Kulthum"]);

        let page = service
            .get_paged(1, 10, None, Some("name_desc"))
            .await
            .unwrap();
        let names: Vec<_> = page.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Umm Kulthum", "Ahmed Zewail"]);
    }

    #[tokio::test]
    async fn visit_date_sort_places_nulls_last_ascending_first_descending() {
        let service = service().await;

        let mut visited = input("Ahmed Zewail", "ahmed@example.com");
        visited.last_visit_date = Some(Utc::now() - chrono::Duration::days(7));
        service.add(visited).await.unwrap();
        service
            .add(input("Umm Kulthum", "umm@example.com"))
            .await
            .unwrap();

        let ascending = service
            .get_paged(1, 10, None, Some("VisitDate"))
            .await
            .unwrap();
        assert_eq!(ascending.last().unwrap().name, "Umm Kulthum");

        let descending = service
            .get_paged(1, 10, None, Some("visitdate_desc"))
            .await
            .unwrap();
        assert_eq!(descending.first().unwrap().name, "Umm Kulthum");
    }
}
