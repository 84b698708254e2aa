//! License activation and first-run state.
//!
//! Activation state lives in two flag files inside the data directory, not
//! in the database, so a fresh database does not reset activation:
//!
//! - `.activated` marks the license check as passed (contents ignored)
//! - `.doctorid` holds the id of the doctor profile created during setup
//!
//! The doctor id is read once and cached in [`DoctorIdCache`] for the life
//! of the process; `mark_profile_setup` refreshes the cache when it writes
//! the flag.

use crate::error::{DomainError, DomainResult};
use std::sync::{Arc, Mutex};
use wasfa_files::FileStorage;

const ACTIVATION_FLAG: &str = ".activated";
const DOCTOR_ID_FLAG: &str = ".doctorid";

#[derive(Debug)]
enum CacheSlot {
    /// The flag file has not been consulted yet.
    Unchecked,
    /// The flag file has been read; `None` means it was absent or unparsable.
    Known(Option<i64>),
}

/// Process-wide cache for the configured doctor id.
///
/// Shared explicitly (one instance constructed at startup, handed to the
/// service) rather than hidden in a static, so tests get a fresh cache per
/// case.
#[derive(Debug)]
pub struct DoctorIdCache {
    slot: Mutex<CacheSlot>,
}

impl DoctorIdCache {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(CacheSlot::Unchecked),
        }
    }

    fn get(&self) -> Option<Option<i64>> {
        let slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        match *slot {
            CacheSlot::Unchecked => None,
            CacheSlot::Known(id) => Some(id),
        }
    }

    fn store(&self, id: Option<i64>) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = CacheSlot::Known(id);
    }
}

impl Default for DoctorIdCache {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct LicenseService {
    expected_registration: String,
    expected_serial: String,
    storage: Arc<dyn FileStorage>,
    cache: Arc<DoctorIdCache>,
}

impl LicenseService {
    pub fn new(
        expected_registration: impl Into<String>,
        expected_serial: impl Into<String>,
        storage: Arc<dyn FileStorage>,
        cache: Arc<DoctorIdCache>,
    ) -> Self {
        Self {
            expected_registration: expected_registration.into(),
            expected_serial: expected_serial.into(),
            storage,
            cache,
        }
    }

    /// Checks a registration number / serial number pair against the
    /// configured license. Comparison trims surrounding whitespace and
    /// ignores ASCII case.
    pub fn validate_license(&self, registration_number: &str, serial_number: &str) -> bool {
        registration_number
            .trim()
            .eq_ignore_ascii_case(self.expected_registration.trim())
            && serial_number
                .trim()
                .eq_ignore_ascii_case(self.expected_serial.trim())
    }

    /// Returns true if the activation flag file exists.
    pub fn is_activated(&self) -> bool {
        self.storage.exists(ACTIVATION_FLAG)
    }

    /// Writes the activation flag file. Idempotent.
    pub fn mark_activated(&self) -> DomainResult<()> {
        self.storage
            .write_string(ACTIVATION_FLAG, "")
            .map_err(|e| {
                DomainError::infrastructure("Failed to mark application as activated.", e)
            })?;

        tracing::info!("application activated");
        Ok(())
    }

    /// Returns the doctor id recorded during profile setup, if any.
    ///
    /// The flag file is read at most once per process; an absent or
    /// unparsable file yields `None` (and caches that answer).
    pub fn current_doctor_id(&self) -> DomainResult<Option<i64>> {
        if let Some(cached) = self.cache.get() {
            return Ok(cached);
        }

        let id = if self.storage.exists(DOCTOR_ID_FLAG) {
            let contents = self.storage.read_to_string(DOCTOR_ID_FLAG).map_err(|e| {
                DomainError::infrastructure("Failed to read doctor id flag.", e)
            })?;

            match contents.trim().parse::<i64>() {
                Ok(id) => Some(id),
                Err(_) => {
                    tracing::warn!("doctor id flag file is unparsable, treating as unset");
                    None
                }
            }
        } else {
            None
        };

        self.cache.store(id);
        Ok(id)
    }

    /// Returns true if profile setup has completed (a valid doctor id flag
    /// exists).
    pub fn is_profile_setup(&self) -> DomainResult<bool> {
        Ok(self.current_doctor_id()?.is_some())
    }

    /// Records `doctor_id` as the configured profile and refreshes the
    /// cache.
    pub fn mark_profile_setup(&self, doctor_id: i64) -> DomainResult<()> {
        self.storage
            .write_string(DOCTOR_ID_FLAG, &doctor_id.to_string())
            .map_err(|e| DomainError::infrastructure("Failed to mark profile as setup.", e))?;

        self.cache.store(Some(doctor_id));
        tracing::info!(doctor_id, "profile setup completed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wasfa_files::LocalFileStorage;

    fn service(registration: &str, serial: &str) -> (TempDir, LicenseService) {
        let temp = TempDir::new().unwrap();
        let storage = LocalFileStorage::new(temp.path().join("data")).unwrap();
        let service = LicenseService::new(
            registration,
            serial,
            Arc::new(storage),
            Arc::new(DoctorIdCache::new()),
        );
        (temp, service)
    }

    #[test]
    fn validate_license_trims_and_ignores_case() {
        let (_temp, service) = service("REG-100", "SN-200");

        assert!(service.validate_license("reg-100", "sn-200"));
        assert!(service.validate_license("  REG-100  ", "SN-200\n"));
        assert!(!service.validate_license("REG-100", "SN-201"));
        assert!(!service.validate_license("", ""));
    }

    #[test]
    fn activation_flag_round_trip() {
        let (_temp, service) = service("r", "s");

        assert!(!service.is_activated());
        service.mark_activated().unwrap();
        assert!(service.is_activated());
        // Idempotent.
        service.mark_activated().unwrap();
        assert!(service.is_activated());
    }

    #[test]
    fn doctor_id_is_none_until_setup() {
        let (_temp, service) = service("r", "s");

        assert_eq!(service.current_doctor_id().unwrap(), None);
        assert!(!service.is_profile_setup().unwrap());
    }

    #[test]
    fn mark_profile_setup_refreshes_the_cache() {
        let (_temp, service) = service("r", "s");

        // Prime the cache with "no id".
        assert_eq!(service.current_doctor_id().unwrap(), None);

        service.mark_profile_setup(42).unwrap();

        // The cache must reflect the write, not the stale first read.
        assert_eq!(service.current_doctor_id().unwrap(), Some(42));
        assert!(service.is_profile_setup().unwrap());
    }

    #[test]
    fn unparsable_doctor_id_flag_reads_as_unset() {
        let temp = TempDir::new().unwrap();
        let storage = LocalFileStorage::new(temp.path().join("data")).unwrap();
        storage.write_string(DOCTOR_ID_FLAG, "not-a-number").unwrap();

        let service = LicenseService::new(
            "r",
            "s",
            Arc::new(storage),
            Arc::new(DoctorIdCache::new()),
        );

        assert_eq!(service.current_doctor_id().unwrap(), None);
    }

    #[test]
    fn fresh_cache_sees_existing_flag_file() {
        let temp = TempDir::new().unwrap();
        let storage = LocalFileStorage::new(temp.path().join("data")).unwrap();
        storage.write_string(DOCTOR_ID_FLAG, "7").unwrap();

        let service = LicenseService::new(
            "r",
            "s",
            Arc::new(storage),
            Arc::new(DoctorIdCache::new()),
        );

        assert_eq!(service.current_doctor_id().unwrap(), Some(7));
    }
}
