use pyproject_external::prelude::*;
use pyproject_external::shared::error::ExternalError;

/// Mock EnvironmentDetector with a fixed answer
pub struct MockEnvironmentDetector {
    target: Option<TargetEnvironment>,
}

impl MockEnvironmentDetector {
    pub fn detecting(ecosystem: &str, package_manager: &str) -> Self {
        Self {
            target: Some(TargetEnvironment::new(ecosystem, package_manager)),
        }
    }

    pub fn unsupported() -> Self {
        Self { target: None }
    }
}

impl EnvironmentDetector for MockEnvironmentDetector {
    fn detect(&self, _registry: &dyn MappingRegistry) -> Result<TargetEnvironment> {
        self.target.clone().ok_or_else(|| {
            ExternalError::UnsupportedPlatform {
                reason: "mock host".to_string(),
            }
            .into()
        })
    }
}
