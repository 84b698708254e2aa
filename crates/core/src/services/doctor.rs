//! Doctor profile service.
//!
//! The application is single-tenant: `save_profile` is a find-or-create
//! against the *first* doctor record in the store, not a general
//! multi-doctor upsert. The schema permits many doctor rows, but only the
//! first is ever treated as "the" profile. If multi-doctor support is ever
//! wanted, this keying must change.

use crate::error::{DomainError, DomainResult};
use crate::models::Doctor;
use crate::repositories::DoctorRepository;
use crate::services::require_text;
use chrono::Utc;
use serde::Deserialize;
use utoipa::ToSchema;

/// Caller-supplied profile fields, used both for the initial setup and for
/// subsequent edits.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DoctorProfile {
    pub name: String,
    pub specialization: String,
    #[serde(default)]
    pub license_number: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
}

#[derive(Clone, Debug)]
pub struct DoctorService {
    repo: DoctorRepository,
}

impl DoctorService {
    pub fn new(repo: DoctorRepository) -> Self {
        Self { repo }
    }

    fn validate(profile: &DoctorProfile) -> DomainResult<()> {
        require_text(&profile.name, "Doctor name is required.")?;
        require_text(&profile.specialization, "Doctor specialization is required.")?;
        Ok(())
    }

    /// Returns the installation's doctor profile, if one has been set up.
    pub async fn get_profile(&self) -> DomainResult<Option<Doctor>> {
        self.repo
            .get_profile()
            .await
            .map_err(|e| DomainError::infrastructure("Failed to retrieve doctor profile.", e))
    }

    pub async fn get_profile_by_id(&self, id: i64) -> DomainResult<Doctor> {
        self.repo
            .get_by_id(id)
            .await
            .map_err(|e| DomainError::infrastructure("Failed to retrieve doctor profile.", e))?
            .ok_or(DomainError::not_found("Doctor", id))
    }

    /// Creates the profile if none exists, otherwise merges the supplied
    /// fields onto the existing first record (preserving its id and flags).
    pub async fn save_profile(&self, profile: DoctorProfile) -> DomainResult<Doctor> {
        Self::validate(&profile)?;

        let existing = self.get_profile().await?;

        match existing {
            None => {
                let doctor = Doctor {
                    id: 0,
                    name: profile.name,
                    specialization: profile.specialization,
                    license_number: profile.license_number,
                    contact_phone: profile.contact_phone,
                    contact_email: profile.contact_email,
                    is_subscribed: false,
                    is_active: true,
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                };

                self.repo
                    .add(doctor)
                    .await
                    .map_err(|e| DomainError::infrastructure("Failed to save doctor profile.", e))
            }
            Some(mut doctor) => {
                doctor.name = profile.name;
                doctor.specialization = profile.specialization;
                doctor.license_number = profile.license_number;
                doctor.contact_phone = profile.contact_phone;
                doctor.contact_email = profile.contact_email;

                self.repo
                    .update(&doctor)
                    .await
                    .map_err(|e| DomainError::infrastructure("Failed to save doctor profile.", e))?;

                Ok(doctor)
            }
        }
    }

    /// Updates a specific doctor record by id. NotFound if absent.
    pub async fn update_profile(&self, id: i64, profile: DoctorProfile) -> DomainResult<Doctor> {
        Self::validate(&profile)?;

        let mut doctor = self.get_profile_by_id(id).await?;

        doctor.name = profile.name;
        doctor.specialization = profile.specialization;
        doctor.license_number = profile.license_number;
        doctor.contact_phone = profile.contact_phone;
        doctor.contact_email = profile.contact_email;

        self.repo
            .update(&doctor)
            .await
            .map_err(|e| DomainError::infrastructure("Failed to update doctor profile.", e))?;

        Ok(doctor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_pool;

    async fn service() -> DoctorService {
        DoctorService::new(DoctorRepository::new(test_pool().await))
    }

    fn profile(name: &str, specialization: &str) -> DoctorProfile {
        DoctorProfile {
            name: name.into(),
            specialization: specialization.into(),
            license_number: None,
            contact_phone: None,
            contact_email: None,
        }
    }

    #[tokio::test]
    async fn save_rejects_missing_name_and_specialization() {
        let service = service().await;

        let err = service.save_profile(profile("", "Cardiology")).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = service
            .save_profile(profile("Dr. Salma", "  "))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn save_creates_the_profile_when_none_exists() {
        let service = service().await;

        let doctor = service
            .save_profile(profile("Dr. Salma", "Cardiology"))
            .await
            .unwrap();

        assert!(doctor.id > 0);
        assert_eq!(doctor.name, "Dr. Salma");
        assert_eq!(
            service.get_profile().await.unwrap().unwrap().id,
            doctor.id
        );
    }

    #[tokio::test]
    async fn save_merges_onto_the_existing_record() {
        let service = service().await;
        let first = service
            .save_profile(profile("Dr. Salma", "Cardiology"))
            .await
            .unwrap();

        let mut changed = profile("Dr. Salma Hassan", "Cardiology");
        changed.license_number = Some("EG-12345".into());
        let second = service.save_profile(changed).await.unwrap();

        // Upsert keyed on the first record: the id must not change.
        assert_eq!(second.id, first.id);
        assert_eq!(second.name, "Dr. Salma Hassan");
        assert_eq!(second.license_number.as_deref(), Some("EG-12345"));
    }

    #[tokio::test]
    async fn update_profile_by_missing_id_is_not_found() {
        let service = service().await;

        let err = service
            .update_profile(7, profile("Dr. Salma", "Cardiology"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DomainError::NotFound { entity: "Doctor", id: 7 }
        ));
    }
}
