use crate::external_metadata::domain::{
    ExternalMetadataDocument, InstallCommand, MappingResult, NormalizedDocument,
};
use crate::external_metadata::services::ValidationWarning;
use crate::ports::outbound::TargetEnvironment;
use crate::shared::error::SynthesisError;
use std::path::PathBuf;

/// ResolveResponse - Internal response DTO for the resolution use case
///
/// Holds every stage the requested format needed; later stages are `None`
/// when the format stops earlier.
#[derive(Debug, Clone)]
pub struct ResolveResponse {
    /// Where the pyproject.toml was read from
    pub origin: PathBuf,
    /// The `[external]` table exactly as parsed
    pub external_table: toml::Table,
    pub document: ExternalMetadataDocument,
    pub normalized: Option<NormalizedDocument>,
    pub validation: Vec<ValidationWarning>,
    pub target: Option<TargetEnvironment>,
    pub mapping: Option<MappingResult>,
    pub command: Option<Result<InstallCommand, SynthesisError>>,
}

impl ResolveResponse {
    pub fn new(
        origin: PathBuf,
        external_table: toml::Table,
        document: ExternalMetadataDocument,
    ) -> Self {
        Self {
            origin,
            external_table,
            document,
            normalized: None,
            validation: Vec::new(),
            target: None,
            mapping: None,
            command: None,
        }
    }

    /// Required (non-optional) requirements left without a provider
    pub fn unmapped_required(&self) -> usize {
        self.mapping
            .as_ref()
            .map(MappingResult::unmapped_required)
            .unwrap_or(0)
    }
}
