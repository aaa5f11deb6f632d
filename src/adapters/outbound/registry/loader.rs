use super::dataset::{
    parse_document, EcosystemsDocument, MappingDocument, RegistryDataset, RegistryDocument,
};
use super::in_memory_registry::InMemoryRegistry;
use crate::ports::outbound::RegistrySource;
use crate::shared::error::ExternalError;
use crate::shared::Result;
use futures::future::try_join_all;
use std::path::Path;

const UPSTREAM_DATA: &str =
    "https://raw.githubusercontent.com/jaimergp/external-metadata-mappings/main/data";

/// Where the registry and known-ecosystems documents live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryLocations {
    pub registry: String,
    pub ecosystems: String,
}

impl Default for RegistryLocations {
    fn default() -> Self {
        Self {
            registry: format!("{}/registry.json", UPSTREAM_DATA),
            ecosystems: format!("{}/known-ecosystems.json", UPSTREAM_DATA),
        }
    }
}

/// RegistryLoader: fetches every document of a registry dataset from a
/// `RegistrySource` and builds the validated `InMemoryRegistry`.
///
/// The registry and known-ecosystems documents are fetched concurrently,
/// then all selected mapping documents are fetched concurrently.
pub struct RegistryLoader<S: RegistrySource> {
    source: S,
}

impl<S: RegistrySource> RegistryLoader<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Loads the registry with the mappings of every known ecosystem, or
    /// only of `only_ecosystem` when given.
    ///
    /// # Errors
    /// - `RegistryFetchError` when a document cannot be fetched
    /// - `RegistryInvalid` when any document fails validation
    /// - `UnknownEcosystem` when `only_ecosystem` is not in the ecosystems document
    pub async fn load(
        &self,
        locations: &RegistryLocations,
        only_ecosystem: Option<&str>,
    ) -> Result<InMemoryRegistry> {
        let (registry_text, ecosystems_text) = futures::try_join!(
            self.fetch(&locations.registry),
            self.fetch(&locations.ecosystems)
        )?;

        let registry: RegistryDocument = parse_document(&locations.registry, &registry_text)?;
        let ecosystems: EcosystemsDocument =
            parse_document(&locations.ecosystems, &ecosystems_text)?;

        let mut selected = ecosystems.mapping_locations(&locations.ecosystems)?;
        if let Some(wanted) = only_ecosystem {
            if !selected.iter().any(|(name, _)| name == wanted) {
                let known: Vec<&str> = selected.iter().map(|(name, _)| name.as_str()).collect();
                return Err(ExternalError::UnknownEcosystem {
                    ecosystem: wanted.to_string(),
                    known: known.join(", "),
                }
                .into());
            }
            selected.retain(|(name, _)| name == wanted);
        }

        let fetches = selected.into_iter().map(|(name, mapping)| async move {
            let location = resolve_location(&locations.ecosystems, &mapping);
            let text = self.fetch(&location).await?;
            let document: MappingDocument = parse_document(&location, &text)?;
            Ok::<_, anyhow::Error>((name, location, document))
        });
        let mappings = try_join_all(fetches).await?;

        tracing::debug!(
            registry = %locations.registry,
            mappings = mappings.len(),
            "registry documents loaded"
        );

        InMemoryRegistry::build(RegistryDataset {
            registry_location: locations.registry.clone(),
            registry,
            mappings,
        })
    }

    async fn fetch(&self, location: &str) -> Result<String> {
        tracing::debug!(location, "fetching registry document");
        self.source.fetch(location).await.map_err(|e| {
            ExternalError::RegistryFetchError {
                location: location.to_string(),
                details: e.to_string(),
            }
            .into()
        })
    }
}

pub fn is_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Resolves a mapping location relative to the document that referenced it
pub fn resolve_location(base: &str, location: &str) -> String {
    if is_url(location) || Path::new(location).is_absolute() {
        return location.to_string();
    }
    if is_url(base) {
        return match base.rsplit_once('/') {
            Some((dir, _)) => format!("{}/{}", dir, location),
            None => location.to_string(),
        };
    }
    match Path::new(base).parent() {
        Some(dir) => dir.join(location).to_string_lossy().into_owned(),
        None => location.to_string(),
    }
}
