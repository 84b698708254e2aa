//! Local filesystem implementation of [`FileStorage`].

use crate::{FileStorage, FilesError};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// File storage rooted at the application data directory.
///
/// Construction creates the data directory if it is missing and fails if the
/// path exists but is not a directory. All operations are validated to stay
/// inside the root.
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    /// Creates a storage provider rooted at `root`, creating the directory
    /// if necessary.
    ///
    /// # Errors
    ///
    /// Returns `FilesError::InvalidDataDirectory` if the path exists but is
    /// not a directory, or if it cannot be created.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, FilesError> {
        let root = root.into();

        if root.exists() {
            if !root.is_dir() {
                return Err(FilesError::InvalidDataDirectory(format!(
                    "{} exists but is not a directory",
                    root.display()
                )));
            }
        } else {
            fs::create_dir_all(&root).map_err(|e| {
                FilesError::InvalidDataDirectory(format!(
                    "failed to create {}: {e}",
                    root.display()
                ))
            })?;
        }

        Ok(Self { root })
    }

    /// Returns the root data directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a relative path against the root, rejecting absolute paths
    /// and any component that would escape the data directory.
    fn resolve(&self, relative_path: &str) -> Result<PathBuf, FilesError> {
        let relative = Path::new(relative_path);

        if relative.is_absolute() {
            return Err(FilesError::InvalidPath(format!(
                "absolute paths are not allowed: {relative_path}"
            )));
        }

        for component in relative.components() {
            match component {
                Component::Normal(_) => {}
                _ => {
                    return Err(FilesError::InvalidPath(format!(
                        "path must not contain '.' or '..' components: {relative_path}"
                    )));
                }
            }
        }

        Ok(self.root.join(relative))
    }
}

impl FileStorage for LocalFileStorage {
    fn exists(&self, relative_path: &str) -> bool {
        match self.resolve(relative_path) {
            Ok(path) => path.is_file(),
            Err(_) => false,
        }
    }

    fn read_to_string(&self, relative_path: &str) -> Result<String, FilesError> {
        let path = self.resolve(relative_path)?;
        Ok(fs::read_to_string(path)?)
    }

    fn write_string(&self, relative_path: &str, contents: &str) -> Result<(), FilesError> {
        let path = self.resolve(relative_path)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, contents)?;
        Ok(())
    }

    fn remove(&self, relative_path: &str) -> Result<(), FilesError> {
        let path = self.resolve(relative_path)?;

        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
