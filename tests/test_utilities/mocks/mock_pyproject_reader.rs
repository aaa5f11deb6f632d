use pyproject_external::prelude::*;
use pyproject_external::ports::outbound::PyprojectSource;
use std::path::Path;

/// Mock PyprojectReader returning fixed pyproject.toml text
pub struct MockPyprojectReader {
    content: String,
}

impl MockPyprojectReader {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// A pyproject with only the given `[external]` body
    pub fn external(body: &str) -> Self {
        Self::new(format!("[project]\nname = \"demo\"\n\n[external]\n{}", body))
    }
}

impl PyprojectReader for MockPyprojectReader {
    fn read_pyproject(&self, package: &Path) -> Result<PyprojectSource> {
        Ok(PyprojectSource {
            origin: package.join("pyproject.toml"),
            content: self.content.clone(),
        })
    }
}
