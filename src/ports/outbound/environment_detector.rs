use super::MappingRegistry;
use crate::shared::Result;

/// An (ecosystem, package manager) pair to resolve against
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetEnvironment {
    pub ecosystem: String,
    pub package_manager: String,
}

impl TargetEnvironment {
    pub fn new(ecosystem: impl Into<String>, package_manager: impl Into<String>) -> Self {
        Self {
            ecosystem: ecosystem.into(),
            package_manager: package_manager.into(),
        }
    }
}

impl std::fmt::Display for TargetEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.ecosystem, self.package_manager)
    }
}

/// EnvironmentDetector port for guessing the target of the current host
///
/// Detection only considers ecosystems the registry knows, so the result can
/// always be mapped against.
pub trait EnvironmentDetector {
    /// # Errors
    /// Returns `UnsupportedPlatform` when no known ecosystem matches the host
    fn detect(&self, registry: &dyn MappingRegistry) -> Result<TargetEnvironment>;
}
