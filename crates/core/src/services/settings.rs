//! Per-doctor UI and workflow preferences.
//!
//! Settings are stored as one JSON document per doctor under `Settings/` in
//! the data directory. Reads are forgiving: a missing file yields the
//! defaults, and a malformed file is logged and replaced by the defaults
//! rather than surfacing an error. Only real I/O failures propagate.

use crate::error::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use wasfa_files::FileStorage;

fn default_date_format() -> String {
    "dd/MM/yyyy".to_string()
}

fn default_time_format() -> String {
    "HH:mm".to_string()
}

fn default_search_results_per_page() -> i64 {
    10
}

fn default_table_density() -> String {
    "normal".to_string()
}

fn default_theme_preference() -> String {
    "light".to_string()
}

fn default_prescription_duration() -> i64 {
    7
}

fn default_dosage_frequency() -> String {
    "Twice daily".to_string()
}

fn default_true() -> bool {
    true
}

fn default_notification_duration() -> i64 {
    5
}

/// Per-doctor preferences document.
///
/// Every field carries a serde default so documents written by older
/// versions deserialize cleanly, picking up defaults for fields they lack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserSettings {
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_time_format")]
    pub time_format: String,
    #[serde(default = "default_search_results_per_page")]
    pub search_results_per_page: i64,
    #[serde(default = "default_table_density")]
    pub table_density: String,
    #[serde(default = "default_theme_preference")]
    pub theme_preference: String,
    #[serde(default = "default_prescription_duration")]
    pub default_prescription_duration: i64,
    #[serde(default = "default_dosage_frequency")]
    pub default_dosage_frequency: String,
    #[serde(default = "default_true")]
    pub enable_success_notifications: bool,
    #[serde(default = "default_true")]
    pub enable_warning_notifications: bool,
    #[serde(default = "default_true")]
    pub enable_error_notifications: bool,
    #[serde(default = "default_true")]
    pub auto_hide_success_messages: bool,
    #[serde(default = "default_notification_duration")]
    pub notification_duration: i64,
    #[serde(default = "default_true")]
    pub auto_save_drafts: bool,
    #[serde(default = "default_true")]
    pub confirm_before_delete: bool,
    #[serde(default)]
    pub show_advanced_options: bool,
    #[serde(default = "default_true")]
    pub enable_keyboard_shortcuts: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            time_format: default_time_format(),
            search_results_per_page: default_search_results_per_page(),
            table_density: default_table_density(),
            theme_preference: default_theme_preference(),
            default_prescription_duration: default_prescription_duration(),
            default_dosage_frequency: default_dosage_frequency(),
            enable_success_notifications: true,
            enable_warning_notifications: true,
            enable_error_notifications: true,
            auto_hide_success_messages: true,
            notification_duration: default_notification_duration(),
            auto_save_drafts: true,
            confirm_before_delete: true,
            show_advanced_options: false,
            enable_keyboard_shortcuts: true,
        }
    }
}

#[derive(Clone)]
pub struct SettingsService {
    storage: Arc<dyn FileStorage>,
}

impl SettingsService {
    pub fn new(storage: Arc<dyn FileStorage>) -> Self {
        Self { storage }
    }

    fn settings_path(doctor_id: i64) -> String {
        format!("Settings/doctor_{doctor_id}_settings.json")
    }

    /// Loads the settings for a doctor, falling back to defaults when the
    /// document is missing or malformed.
    pub fn load(&self, doctor_id: i64) -> DomainResult<UserSettings> {
        let path = Self::settings_path(doctor_id);

        if !self.storage.exists(&path) {
            return Ok(UserSettings::default());
        }

        let contents = self
            .storage
            .read_to_string(&path)
            .map_err(|e| DomainError::infrastructure("Failed to read user settings.", e))?;

        match serde_json::from_str(&contents) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                tracing::warn!(doctor_id, error = %e, "settings document is malformed, using defaults");
                Ok(UserSettings::default())
            }
        }
    }

    /// Persists the settings document for a doctor, replacing any previous
    /// version.
    pub fn save(&self, doctor_id: i64, settings: &UserSettings) -> DomainResult<()> {
        let contents = serde_json::to_string_pretty(settings)
            .map_err(|e| DomainError::infrastructure("Failed to serialize user settings.", e))?;

        self.storage
            .write_string(&Self::settings_path(doctor_id), &contents)
            .map_err(|e| DomainError::infrastructure("Failed to save user settings.", e))?;

        tracing::debug!(doctor_id, "saved user settings");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wasfa_files::LocalFileStorage;

    fn service() -> (TempDir, SettingsService) {
        let temp = TempDir::new().unwrap();
        let storage = LocalFileStorage::new(temp.path().join("data")).unwrap();
        (temp, SettingsService::new(Arc::new(storage)))
    }

    #[test]
    fn missing_document_loads_as_defaults() {
        let (_temp, service) = service();

        let settings = service.load(1).unwrap();

        assert_eq!(settings, UserSettings::default());
        assert_eq!(settings.date_format, "dd/MM/yyyy");
        assert_eq!(settings.search_results_per_page, 10);
        assert_eq!(settings.default_dosage_frequency, "Twice daily");
        assert!(settings.confirm_before_delete);
        assert!(!settings.show_advanced_options);
    }

    #[test]
    fn save_then_load_round_trips() {
        let (_temp, service) = service();

        let mut settings = UserSettings::default();
        settings.theme_preference = "dark".into();
        settings.search_results_per_page = 25;
        settings.confirm_before_delete = false;

        service.save(7, &settings).unwrap();

        assert_eq!(service.load(7).unwrap(), settings);
        // Other doctors are unaffected.
        assert_eq!(service.load(8).unwrap(), UserSettings::default());
    }

    #[test]
    fn malformed_document_loads_as_defaults() {
        let temp = TempDir::new().unwrap();
        let storage = LocalFileStorage::new(temp.path().join("data")).unwrap();
        storage
            .write_string("Settings/doctor_3_settings.json", "{ not json")
            .unwrap();

        let service = SettingsService::new(Arc::new(storage));

        assert_eq!(service.load(3).unwrap(), UserSettings::default());
    }

    #[test]
    fn partial_document_picks_up_defaults_for_missing_fields() {
        let temp = TempDir::new().unwrap();
        let storage = LocalFileStorage::new(temp.path().join("data")).unwrap();
        storage
            .write_string(
                "Settings/doctor_4_settings.json",
                r#"{"theme_preference": "dark"}"#,
            )
            .unwrap();

        let service = SettingsService::new(Arc::new(storage));
        let settings = service.load(4).unwrap();

        assert_eq!(settings.theme_preference, "dark");
        assert_eq!(settings.date_format, "dd/MM/yyyy");
        assert_eq!(settings.notification_duration, 5);
    }
}
