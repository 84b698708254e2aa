//! # Wasfa File Storage
//!
//! File storage for the small out-of-database artefacts Wasfa keeps on disk:
//!
//! - the activation marker flag (`.activated`)
//! - the configured doctor-id flag (`.doctorid`)
//! - per-doctor settings documents (`Settings/doctor_{id}_settings.json`)
//!
//! ## Design
//!
//! All storage is scoped to a single application data directory resolved once
//! at startup. Callers address files by *relative* path only; the provider
//! validates every path to keep operations inside the data directory, and
//! creates parent directories on write so callers never have to care whether
//! `Settings/` exists yet.
//!
//! The [`FileStorage`] trait is the seam the core services depend on, which
//! keeps license and settings logic testable against a temporary directory.

mod storage;

pub use storage::LocalFileStorage;

/// Errors that can occur during file storage operations
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    /// Root data directory could not be created or is not a directory
    #[error("invalid data directory: {0}")]
    InvalidDataDirectory(String),

    /// Path validation failed (absolute path or directory traversal)
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Storage provider for flag files and settings documents.
///
/// Implementations address files by path relative to an application data
/// directory and must create intermediate directories on write.
pub trait FileStorage: Send + Sync {
    /// Returns true if the file exists.
    fn exists(&self, relative_path: &str) -> bool;

    /// Reads the full contents of a file as UTF-8 text.
    fn read_to_string(&self, relative_path: &str) -> Result<String, FilesError>;

    /// Writes text to a file, replacing any existing contents and creating
    /// parent directories as needed.
    fn write_string(&self, relative_path: &str, contents: &str) -> Result<(), FilesError>;

    /// Removes a file. Removing a file that does not exist is not an error.
    fn remove(&self, relative_path: &str) -> Result<(), FilesError>;
}
