//! Medication catalog service. Same shape as the patient service with a
//! single uniqueness dimension; delete is existence-checked rather than
//! fetch-for-message.

use crate::error::{DomainError, DomainResult};
use crate::models::Medication;
use crate::repositories::MedicationRepository;
use crate::services::require_text;
use chrono::Utc;
use serde::Deserialize;
use utoipa::ToSchema;

/// Caller-supplied medication fields.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct MedicationInput {
    pub name: String,
    #[serde(default)]
    pub dosage: Option<String>,
    #[serde(default)]
    pub form: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
}

#[derive(Clone, Debug)]
pub struct MedicationService {
    repo: MedicationRepository,
}

impl MedicationService {
    pub fn new(repo: MedicationRepository) -> Self {
        Self { repo }
    }

    async fn check_name_unique(
        &self,
        name: &str,
        exclude_id: Option<i64>,
    ) -> DomainResult<()> {
        let unique = self
            .repo
            .is_name_unique(name, exclude_id)
            .await
            .map_err(|e| DomainError::infrastructure("Failed to validate name uniqueness.", e))?;

        if !unique {
            return Err(DomainError::business_rule(format!(
                "A medication with the name '{}' already exists.",
                name.trim()
            )));
        }

        Ok(())
    }

    pub async fn get_all(&self) -> DomainResult<Vec<Medication>> {
        self.repo
            .get_all()
            .await
            .map_err(|e| DomainError::infrastructure("Failed to retrieve medications.", e))
    }

    pub async fn search(&self, search_term: &str) -> DomainResult<Vec<Medication>> {
        self.repo
            .search(search_term)
            .await
            .map_err(|e| DomainError::infrastructure("Failed to search medications.", e))
    }

    pub async fn get_by_id(&self, id: i64) -> DomainResult<Medication> {
        self.repo
            .get_by_id(id)
            .await
            .map_err(|e| DomainError::infrastructure("Failed to retrieve medication.", e))?
            .ok_or(DomainError::not_found("Medication", id))
    }

    pub async fn add(&self, input: MedicationInput) -> DomainResult<Medication> {
        require_text(&input.name, "Medication name is required.")?;
        self.check_name_unique(&input.name, None).await?;

        let medication = Medication {
            id: 0,
            name: input.name,
            dosage: input.dosage,
            form: input.form,
            manufacturer: input.manufacturer,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        self.repo
            .add(medication)
            .await
            .map_err(|e| DomainError::infrastructure("Failed to add medication.", e))
    }

    pub async fn update(&self, id: i64, input: MedicationInput) -> DomainResult<Medication> {
        require_text(&input.name, "Medication name is required.")?;

        let exists = self
            .repo
            .exists(id)
            .await
            .map_err(|e| DomainError::infrastructure("Failed to check medication existence.", e))?;
        if !exists {
            return Err(DomainError::not_found("Medication", id));
        }

        self.check_name_unique(&input.name, Some(id)).await?;

        let mut medication = self.get_by_id(id).await?;
        medication.name = input.name;
        medication.dosage = input.dosage;
        medication.form = input.form;
        medication.manufacturer = input.manufacturer;

        self.repo
            .update(&medication)
            .await
            .map_err(|e| DomainError::infrastructure("Failed to update medication.", e))?;

        Ok(medication)
    }

    /// Existence-checked delete: NotFound if the id is unknown.
    pub async fn delete(&self, id: i64) -> DomainResult<()> {
        let exists = self
            .repo
            .exists(id)
            .await
            .map_err(|e| DomainError::infrastructure("Failed to check medication existence.", e))?;
        if !exists {
            return Err(DomainError::not_found("Medication", id));
        }

        self.repo
            .delete(id)
            .await
            .map_err(|e| DomainError::infrastructure("Failed to delete medication.", e))?;

        tracing::info!(medication_id = id, "deleted medication");
        Ok(())
    }

    pub async fn exists(&self, id: i64) -> DomainResult<bool> {
        self.repo
            .exists(id)
            .await
            .map_err(|e| DomainError::infrastructure("Failed to check medication existence.", e))
    }

    pub async fn is_name_unique(&self, name: &str, exclude_id: Option<i64>) -> DomainResult<bool> {
        self.repo
            .is_name_unique(name, exclude_id)
            .await
            .map_err(|e| DomainError::infrastructure("Failed to validate name uniqueness.", e))
    }

    pub async fn get_paged(
        &self,
        page_number: i64,
        page_size: i64,
        search_term: Option<&str>,
        sort_order: Option<&str>,
    ) -> DomainResult<Vec<Medication>> {
        self.repo
            .get_paged(page_number, page_size, search_term, sort_order)
            .await
            .map_err(|e| DomainError::infrastructure("Failed to retrieve paged medications.", e))
    }

    pub async fn get_count(&self, search_term: Option<&str>) -> DomainResult<i64> {
        self.repo
            .get_count(search_term)
            .await
            .map_err(|e| DomainError::infrastructure("Failed to count medications.", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_pool;

    async fn service() -> MedicationService {
        MedicationService::new(MedicationRepository::new(test_pool().await))
    }

    fn input(name: &str) -> MedicationInput {
        MedicationInput {
            name: name.into(),
            dosage: Some("500mg".into()),
            form: Some("Tablet".into()),
            manufacturer: None,
        }
    }

    #[tokio::test]
    async fn add_rejects_blank_name() {
        let service = service().await;

        let err = service.add(input("  ")).await.unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(service.get_count(None).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn duplicate_name_fails_with_the_documented_message() {
        let service = service().await;
        service.add(input("Amoxicillin")).await.unwrap();

        let err = service.add(input("AMOXICILLIN")).await.unwrap_err();

        match err {
            DomainError::BusinessRule(message) => {
                assert_eq!(
                    message,
                    "A medication with the name 'AMOXICILLIN' already exists."
                )
            }
            other => panic!("expected BusinessRule, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_keeps_the_name_when_unchanged() {
        let service = service().await;
        let medication = service.add(input("Panadol")).await.unwrap();

        let updated = service
            .update(
                medication.id,
                MedicationInput {
                    name: "Panadol".into(),
                    dosage: Some("1g".into()),
                    form: Some("Tablet".into()),
                    manufacturer: Some("GSK".into()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.dosage.as_deref(), Some("1g"));
        assert_eq!(updated.manufacturer.as_deref(), Some("GSK"));
    }

    #[tokio::test]
    async fn delete_missing_medication_is_not_found() {
        let service = service().await;

        let err = service.delete(55).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::NotFound { entity: "Medication", id: 55 }
        ));
    }

    #[tokio::test]
    async fn paged_listing_sorts_by_name() {
        let service = service().await;
        for name in ["Zinc", "Amoxicillin", "Ibuprofen"] {
            service.add(input(name)).await.unwrap();
        }

        let page = service.get_paged(1, 2, None, None).await.unwrap();
        let names: Vec<_> = page.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Amoxicillin", "Ibuprofen"]);

        let page = service
            .get_paged(1, 2, None, Some("name_desc"))
            .await
            .unwrap();
        let names: Vec<_> = page.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Zinc", "Ibuprofen"]);
    }
}
