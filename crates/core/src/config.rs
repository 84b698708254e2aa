//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into
//! services behind an `Arc`. Nothing in this crate reads environment
//! variables during request handling; the binaries own that translation.

use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    database_path: PathBuf,
    expected_registration_number: String,
    expected_serial_number: String,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// The expected registration and serial numbers are the values a license
    /// activation attempt is compared against. They may legitimately be empty
    /// when no license has been configured for an installation.
    pub fn new(
        data_dir: PathBuf,
        database_path: PathBuf,
        expected_registration_number: String,
        expected_serial_number: String,
    ) -> Self {
        Self {
            data_dir,
            database_path,
            expected_registration_number,
            expected_serial_number,
        }
    }

    /// Application data directory holding flag files and settings documents.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the SQLite database file.
    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    pub fn expected_registration_number(&self) -> &str {
        &self.expected_registration_number
    }

    pub fn expected_serial_number(&self) -> &str {
        &self.expected_serial_number
    }
}
