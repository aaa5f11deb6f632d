use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish between different
/// types of failures and successes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - every required requirement was mapped (or nothing was mapped)
    Success = 0,
    /// At least one non-optional requirement has no mapping for the target
    UnmappedRequirements = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (registry error, network error, file I/O error, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::UnmappedRequirements => write!(f, "Unmapped Requirements (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Application-specific errors for external metadata resolution.
///
/// Uses thiserror to derive Display and Error traits automatically,
/// keeping the user-facing messages next to the variants.
#[derive(Debug, Error)]
pub enum ExternalError {
    #[error("pyproject.toml not found: {path}\n\n💡 Hint: {suggestion}")]
    PyprojectNotFound { path: PathBuf, suggestion: String },

    #[error("Failed to parse pyproject.toml: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file is valid TOML")]
    PyprojectParseError { path: PathBuf, details: String },

    #[error("No [external] table in {path}\n\n💡 Hint: Declare external dependencies in an [external] table (PEP 725)")]
    MissingExternalTable { path: PathBuf },

    #[error("Malformed [external] table: {details}\n\n💡 Hint: Each group must be an array of strings; 'optional-dependencies' must be a table of arrays")]
    MalformedDocument { details: String },

    #[error("Invalid registry data: {location}\nDetails: {details}\n\n💡 Hint: The mapping registry failed validation; no mapping was attempted")]
    RegistryInvalid { location: String, details: String },

    #[error("Failed to fetch registry data: {location}\nDetails: {details}\n\n💡 Hint: Check the location, or your network connection for remote data")]
    RegistryFetchError { location: String, details: String },

    #[error("Unknown ecosystem '{ecosystem}'. Choose one of: {known}")]
    UnknownEcosystem { ecosystem: String, known: String },

    #[error("Package manager '{package_manager}' is not recognized for ecosystem '{ecosystem}'. Choose one of: {known}")]
    UnknownPackageManager {
        package_manager: String,
        ecosystem: String,
        known: String,
    },

    #[error("Could not detect a target ecosystem: {reason}\n\n💡 Hint: Pass --ecosystem and/or --package-manager explicitly")]
    UnsupportedPlatform { reason: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Invalid project path: {path}\nReason: {reason}\n\n💡 Hint: Please specify a project directory, a pyproject.toml file or an sdist (.tar.gz)")]
    InvalidProjectPath { path: PathBuf, reason: String },

    /// Validation error for builder patterns and configuration
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },

    #[error("Security violation: {path}\nReason: {reason}\n\n💡 Hint: {hint}")]
    SecurityError {
        path: PathBuf,
        reason: String,
        hint: String,
    },
}

/// A declared version constraint that does not follow the constraint grammar.
///
/// Local to one requirement: normalization records it and carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Malformed version constraint '{constraint}' for {raw_identifier}: {reason}")]
pub struct MalformedConstraint {
    pub raw_identifier: String,
    pub constraint: String,
    pub reason: String,
}

/// Conditions raised while turning a mapping result into a command.
///
/// Both are recoverable by the caller: pick another package manager, or
/// report that there is nothing to do.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    #[error("No command template for package manager '{package_manager}'")]
    NoPackageManagerTemplate { package_manager: String },

    #[error("Nothing to install with '{package_manager}': no requirement could be mapped")]
    NothingToInstall { package_manager: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::UnmappedRequirements.as_i32(), 1);
        assert_eq!(ExitCode::InvalidArguments.as_i32(), 2);
        assert_eq!(ExitCode::ApplicationError.as_i32(), 3);
    }

    #[test]
    fn test_exit_code_display() {
        assert_eq!(format!("{}", ExitCode::Success), "Success (0)");
        assert_eq!(
            format!("{}", ExitCode::UnmappedRequirements),
            "Unmapped Requirements (1)"
        );
        assert_eq!(
            format!("{}", ExitCode::InvalidArguments),
            "Invalid Arguments (2)"
        );
        assert_eq!(
            format!("{}", ExitCode::ApplicationError),
            "Application Error (3)"
        );
    }

    #[test]
    fn test_pyproject_not_found_display() {
        let error = ExternalError::PyprojectNotFound {
            path: PathBuf::from("/test/path/pyproject.toml"),
            suggestion: "Test suggestion".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("pyproject.toml not found"));
        assert!(display.contains("/test/path/pyproject.toml"));
        assert!(display.contains("💡 Hint:"));
        assert!(display.contains("Test suggestion"));
    }

    #[test]
    fn test_registry_invalid_display() {
        let error = ExternalError::RegistryInvalid {
            location: "registry.json".to_string(),
            details: "missing field `definitions`".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Invalid registry data"));
        assert!(display.contains("registry.json"));
        assert!(display.contains("missing field `definitions`"));
    }

    #[test]
    fn test_unknown_package_manager_display() {
        let error = ExternalError::UnknownPackageManager {
            package_manager: "yum".to_string(),
            ecosystem: "ubuntu".to_string(),
            known: "apt".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("'yum'"));
        assert!(display.contains("'ubuntu'"));
        assert!(display.contains("apt"));
    }

    #[test]
    fn test_malformed_constraint_names_identifier() {
        let error = MalformedConstraint {
            raw_identifier: "dep:generic/zlib".to_string(),
            constraint: ">=".to_string(),
            reason: "missing version".to_string(),
        };
        let display = error.to_string();
        assert!(display.contains("dep:generic/zlib"));
        assert!(display.contains("'>='"));
        assert!(display.contains("missing version"));
    }

    #[test]
    fn test_synthesis_error_display() {
        let error = SynthesisError::NoPackageManagerTemplate {
            package_manager: "unknown-pm".to_string(),
        };
        assert!(error.to_string().contains("unknown-pm"));

        let error = SynthesisError::NothingToInstall {
            package_manager: "apt".to_string(),
        };
        assert!(error.to_string().contains("Nothing to install"));
    }

    #[test]
    fn test_security_error_display() {
        let error = ExternalError::SecurityError {
            path: PathBuf::from("/test/symlink"),
            reason: "Symbolic links are not allowed".to_string(),
            hint: "Use a regular file instead".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Security violation"));
        assert!(display.contains("/test/symlink"));
        assert!(display.contains("Use a regular file instead"));
    }
}
