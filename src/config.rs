//! Configuration file support for pyproject-external.
//!
//! Provides YAML-based configuration through `pyproject-external.config.yml`
//! files: target preferences and registry locations.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use pyproject_external::shared::Result;

pub const CONFIG_FILENAME: &str = "pyproject-external.config.yml";

/// Directory searched after the project directory
pub const CONFIG_DIR_ENV: &str = "PYPROJECT_EXTERNAL_CONFIG_DIR";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Ecosystem used when `--ecosystem` and `--package-manager` are absent
    pub preferred_ecosystem: Option<String>,
    pub preferred_package_manager: Option<String>,
    /// Location of `registry.json` (path or URL)
    pub registry: Option<String>,
    /// Location of `known-ecosystems.json` (path or URL)
    pub ecosystems: Option<String>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);
    tracing::debug!(path = %path.display(), "loaded config file");

    Ok(config)
}

/// Looks for the config file in `dir`. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Directories searched in order: the project directory (the package itself,
/// or the directory containing the given file), then `$PYPROJECT_EXTERNAL_CONFIG_DIR`.
pub fn search_dirs(package: &Path, env_dir: Option<PathBuf>) -> Vec<PathBuf> {
    let project_dir = if package.is_dir() {
        package.to_path_buf()
    } else {
        match package.parent() {
            Some(parent) if parent != Path::new("") => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    };

    let mut dirs = vec![project_dir];
    dirs.extend(env_dir.filter(|dir| !dir.as_os_str().is_empty()));
    dirs
}

/// First config file found in `dirs`
pub fn discover_first(dirs: &[PathBuf]) -> Result<Option<ConfigFile>> {
    for dir in dirs {
        if let Some(config) = discover_config(dir)? {
            return Ok(Some(config));
        }
    }
    Ok(None)
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    let fields = [
        ("preferred_ecosystem", &config.preferred_ecosystem),
        ("preferred_package_manager", &config.preferred_package_manager),
        ("registry", &config.registry),
        ("ecosystems", &config.ecosystems),
    ];
    for (name, value) in fields {
        if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
            bail!(
                "Invalid config: {} must not be empty.\n\n\
                 💡 Hint: Remove the field or give it a value.",
                name
            );
        }
    }
    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    let mut keys: Vec<&String> = config.unknown_fields.keys().collect();
    keys.sort();
    for key in keys {
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}
