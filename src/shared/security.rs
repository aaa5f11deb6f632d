use crate::shared::Result;
use std::fs;
use std::path::Path;

/// Maximum size of a pyproject.toml, read from disk or from an sdist member (10 MB)
pub const MAX_PYPROJECT_SIZE: u64 = 10 * 1024 * 1024;

/// Maximum size of a source distribution archive (200 MB)
pub const MAX_SDIST_SIZE: u64 = 200 * 1024 * 1024;

/// Maximum size of one registry document, local or remote (50 MB)
pub const MAX_REGISTRY_DOCUMENT_SIZE: u64 = 50 * 1024 * 1024;

/// Validates that a path exists and is a regular file (not a directory or symlink),
/// and returns its size in bytes.
///
/// # Security
/// Uses `symlink_metadata()` so that the link itself is inspected, not its target.
///
/// # Errors
/// Returns an error if the path doesn't exist, is a symbolic link, or is not a regular file
pub fn validate_regular_file(path: &Path, file_description: &str) -> Result<u64> {
    let metadata = fs::symlink_metadata(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {} metadata: {}", file_description, e))?;

    if metadata.is_symlink() {
        anyhow::bail!(
            "Security: {} is a symbolic link. For security reasons, symbolic links are not allowed.",
            path.display()
        );
    }

    if !metadata.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }

    Ok(metadata.len())
}

/// Validates that a size is within an acceptable limit
///
/// # Errors
/// Returns an error if `size` exceeds `max_size`
pub fn validate_size(size: u64, what: &str, max_size: u64) -> Result<()> {
    if size > max_size {
        anyhow::bail!(
            "Security: {} is too large ({} bytes). Maximum allowed size is {} bytes.",
            what,
            size,
            max_size
        );
    }
    Ok(())
}

/// Reads a regular file as UTF-8 after the symlink, type and size checks.
pub fn read_regular_file(path: &Path, file_description: &str, max_size: u64) -> Result<String> {
    let size = validate_regular_file(path, file_description)?;
    validate_size(size, &path.display().to_string(), max_size)?;

    fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", file_description, e))
}
