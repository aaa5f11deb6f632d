use super::OutputFormat;
use crate::adapters::outbound::registry::RegistryLocations;
use crate::external_metadata::domain::Purpose;
use std::path::PathBuf;

/// An ecosystem and/or package manager asked for by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSelection {
    pub ecosystem: Option<String>,
    pub package_manager: Option<String>,
}

impl TargetSelection {
    pub fn new(ecosystem: Option<String>, package_manager: Option<String>) -> Self {
        Self {
            ecosystem,
            package_manager,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ecosystem.is_none() && self.package_manager.is_none()
    }
}

/// ResolveRequest - Internal request DTO for the resolution use case
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    /// Project directory, pyproject.toml or sdist
    pub package: PathBuf,
    pub format: OutputFormat,
    /// Target given on the command line
    pub target: TargetSelection,
    /// Target preferred by the configuration file
    pub preferred: TargetSelection,
    /// Only these groups are resolved; empty means all
    pub groups: Vec<Purpose>,
    /// Check identifiers against the registry and report warnings
    pub validate: bool,
    pub registry: RegistryLocations,
}

impl ResolveRequest {
    pub fn new(package: PathBuf, format: OutputFormat) -> Self {
        Self {
            package,
            format,
            target: TargetSelection::default(),
            preferred: TargetSelection::default(),
            groups: Vec::new(),
            validate: false,
            registry: RegistryLocations::default(),
        }
    }

    pub fn with_target(mut self, target: TargetSelection) -> Self {
        self.target = target;
        self
    }

    pub fn with_preferred(mut self, preferred: TargetSelection) -> Self {
        self.preferred = preferred;
        self
    }

    pub fn with_groups(mut self, groups: Vec<Purpose>) -> Self {
        self.groups = groups;
        self
    }

    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    pub fn with_registry(mut self, registry: RegistryLocations) -> Self {
        self.registry = registry;
        self
    }
}
