use crate::ports::outbound::{PyprojectReader, PyprojectSource, RegistrySource};
use crate::shared::error::ExternalError;
use crate::shared::security::{
    read_regular_file, validate_regular_file, validate_size, MAX_PYPROJECT_SIZE,
    MAX_REGISTRY_DOCUMENT_SIZE, MAX_SDIST_SIZE,
};
use crate::shared::Result;
use async_trait::async_trait;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::{Component, Path, PathBuf};

const PYPROJECT: &str = "pyproject.toml";

/// FileSystemReader adapter for reading files from the file system
///
/// This adapter implements the PyprojectReader port (project directories,
/// pyproject.toml files and `.tar.gz` sdists) and the RegistrySource port
/// for registry documents stored on disk.
pub struct FileSystemReader;

impl FileSystemReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemReader {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystemReader {
    fn read_file(&self, path: &Path) -> Result<PyprojectSource> {
        let content = read_regular_file(path, PYPROJECT, MAX_PYPROJECT_SIZE).map_err(|e| {
            ExternalError::FileReadError {
                path: path.to_path_buf(),
                details: e.to_string(),
            }
        })?;
        Ok(PyprojectSource {
            origin: path.to_path_buf(),
            content,
        })
    }

    /// Reads `<top-level dir>/pyproject.toml` out of a gzipped sdist
    fn read_sdist(&self, path: &Path) -> Result<PyprojectSource> {
        let size = validate_regular_file(path, "sdist")?;
        validate_size(size, &path.display().to_string(), MAX_SDIST_SIZE)?;

        let file = File::open(path).map_err(|e| ExternalError::FileReadError {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;
        let mut archive = tar::Archive::new(GzDecoder::new(file));
        let read_error = |e: std::io::Error| ExternalError::FileReadError {
            path: path.to_path_buf(),
            details: e.to_string(),
        };

        for entry in archive.entries().map_err(read_error)? {
            let entry = entry.map_err(read_error)?;
            let member = entry.path().map_err(read_error)?.into_owned();
            if !is_top_level_pyproject(&member) {
                continue;
            }

            let member_size = entry.header().size().map_err(read_error)?;
            validate_size(member_size, &member.display().to_string(), MAX_PYPROJECT_SIZE)?;

            let mut content = String::new();
            entry
                .take(MAX_PYPROJECT_SIZE)
                .read_to_string(&mut content)
                .map_err(read_error)?;

            tracing::debug!(sdist = %path.display(), member = %member.display(), "read pyproject from sdist");
            return Ok(PyprojectSource {
                origin: path.join(member),
                content,
            });
        }

        Err(ExternalError::PyprojectNotFound {
            path: path.to_path_buf(),
            suggestion: "The sdist has no '<name>/pyproject.toml' member".to_string(),
        }
        .into())
    }
}

fn is_top_level_pyproject(member: &Path) -> bool {
    let components: Vec<Component<'_>> = member
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    matches!(
        components.as_slice(),
        [Component::Normal(_), Component::Normal(name)] if *name == PYPROJECT
    )
}

fn is_sdist(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    name.ends_with(".tar.gz") || name.ends_with(".tgz")
}

impl PyprojectReader for FileSystemReader {
    fn read_pyproject(&self, package: &Path) -> Result<PyprojectSource> {
        if !package.exists() {
            return Err(ExternalError::InvalidProjectPath {
                path: package.to_path_buf(),
                reason: "Path does not exist".to_string(),
            }
            .into());
        }

        if package.is_dir() {
            let pyproject_path: PathBuf = package.join(PYPROJECT);
            if !pyproject_path.exists() {
                return Err(ExternalError::PyprojectNotFound {
                    path: pyproject_path,
                    suggestion: format!(
                        "No pyproject.toml in \"{}\". Run in a project root, or pass the path to a pyproject.toml or an sdist.",
                        package.display()
                    ),
                }
                .into());
            }
            return self.read_file(&pyproject_path);
        }

        if is_sdist(package) {
            return self.read_sdist(package);
        }

        if package.file_name().is_some_and(|n| n == PYPROJECT) {
            return self.read_file(package);
        }

        Err(ExternalError::InvalidProjectPath {
            path: package.to_path_buf(),
            reason: "Not a directory, a pyproject.toml or a .tar.gz sdist".to_string(),
        }
        .into())
    }
}

#[async_trait]
impl RegistrySource for FileSystemReader {
    async fn fetch(&self, location: &str) -> Result<String> {
        read_regular_file(Path::new(location), "registry document", MAX_REGISTRY_DOCUMENT_SIZE)
    }
}
