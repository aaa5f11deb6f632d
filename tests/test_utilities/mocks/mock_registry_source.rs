use async_trait::async_trait;
use pyproject_external::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const REGISTRY: &str = include_str!("../../fixtures/registry/registry.json");
const ECOSYSTEMS: &str = include_str!("../../fixtures/registry/known-ecosystems.json");
const UBUNTU: &str = include_str!("../../fixtures/registry/ubuntu.mapping.json");
const CONDA_FORGE: &str = include_str!("../../fixtures/registry/conda-forge.mapping.json");

/// Mock RegistrySource serving the fixture registry from memory
#[derive(Clone, Default)]
pub struct MockRegistrySource {
    documents: HashMap<String, String>,
    requested: Arc<Mutex<Vec<String>>>,
}

impl MockRegistrySource {
    pub fn fixtures() -> Self {
        Self::default()
            .with_document("registry.json", REGISTRY)
            .with_document("known-ecosystems.json", ECOSYSTEMS)
            .with_document("ubuntu.mapping.json", UBUNTU)
            .with_document("conda-forge.mapping.json", CONDA_FORGE)
    }

    pub fn with_document(mut self, location: &str, content: &str) -> Self {
        self.documents
            .insert(location.to_string(), content.to_string());
        self
    }

    pub fn locations() -> RegistryLocations {
        RegistryLocations {
            registry: "registry.json".to_string(),
            ecosystems: "known-ecosystems.json".to_string(),
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl RegistrySource for MockRegistrySource {
    async fn fetch(&self, location: &str) -> Result<String> {
        self.requested.lock().unwrap().push(location.to_string());
        self.documents
            .get(location)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no document at {}", location))
    }
}
