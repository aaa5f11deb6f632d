use crate::ports::outbound::OutputPresenter;
use crate::shared::error::ExternalError;
use crate::shared::Result;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// FileSystemWriter adapter for writing output to files
///
/// This adapter implements the OutputPresenter port for `--output`.
pub struct FileSystemWriter {
    output_path: PathBuf,
}

impl FileSystemWriter {
    pub fn new(output_path: PathBuf) -> Self {
        Self { output_path }
    }

    fn write_error(&self, details: impl Into<String>) -> anyhow::Error {
        ExternalError::FileWriteError {
            path: self.output_path.clone(),
            details: details.into(),
        }
        .into()
    }

    /// The parent directory must exist and must not be a dangling path
    fn validate_parent_directory(&self) -> Result<()> {
        let Some(parent) = self.output_path.parent() else {
            return Ok(());
        };
        if parent == Path::new("") {
            return Ok(());
        }
        if !parent.exists() {
            return Err(self.write_error(format!(
                "Parent directory does not exist: {}",
                parent.display()
            )));
        }
        parent
            .canonicalize()
            .map_err(|e| self.write_error(format!("Failed to validate parent directory: {}", e)))?;
        Ok(())
    }

    /// An existing output file must not be a symbolic link
    fn validate_output_security(&self) -> Result<()> {
        match fs::symlink_metadata(&self.output_path) {
            Ok(metadata) if metadata.is_symlink() => Err(self.write_error(
                "Security: Output path is a symbolic link. For security reasons, writing to symbolic links is not allowed.",
            )),
            Ok(_) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.write_error(format!("Failed to read file metadata: {}", e))),
        }
    }
}

impl OutputPresenter for FileSystemWriter {
    fn present(&self, content: &str) -> Result<()> {
        self.validate_parent_directory()?;
        self.validate_output_security()?;

        fs::write(&self.output_path, content).map_err(|e| self.write_error(e.to_string()))?;

        eprintln!("✅ Output written: {}", self.output_path.display());
        Ok(())
    }
}

/// StdoutPresenter adapter for writing output to stdout
pub struct StdoutPresenter;

impl StdoutPresenter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StdoutPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputPresenter for StdoutPresenter {
    fn present(&self, content: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(content.as_bytes())
            .and_then(|_| {
                if content.ends_with('\n') {
                    Ok(())
                } else {
                    stdout.write_all(b"\n")
                }
            })
            .map_err(|e| anyhow::anyhow!("Failed to write to stdout: {}", e))?;
        Ok(())
    }
}
