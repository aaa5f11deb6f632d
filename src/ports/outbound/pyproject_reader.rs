use crate::shared::Result;
use std::path::{Path, PathBuf};

/// Text of a pyproject.toml together with where it was read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PyprojectSource {
    pub origin: PathBuf,
    pub content: String,
}

/// PyprojectReader port for locating and reading a project's pyproject.toml
///
/// This port abstracts the file system and archive access needed to get at
/// the build configuration of a Python package.
pub trait PyprojectReader {
    /// Reads the pyproject.toml of a package
    ///
    /// # Arguments
    /// * `package` - A project directory, a pyproject.toml file, or a
    ///   source distribution (`.tar.gz`)
    ///
    /// # Errors
    /// Returns an error if:
    /// - The path does not exist or is neither a directory nor a supported file
    /// - The directory or sdist contains no pyproject.toml
    /// - The file fails the security checks (symlink, size)
    fn read_pyproject(&self, package: &Path) -> Result<PyprojectSource>;
}
