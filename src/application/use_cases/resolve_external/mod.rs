use crate::adapters::outbound::registry::{InMemoryRegistry, RegistryLoader};
use crate::application::dto::{ResolveRequest, ResolveResponse, TargetSelection};
use crate::external_metadata::domain::{
    ExternalMetadataDocument, InstallCommand, MappingResult, NormalizedDocument,
};
use crate::external_metadata::services::{
    CommandSynthesizer, DocumentParser, Mapper, Normalizer, ValidationWarning, Validator,
};
use crate::ports::outbound::{
    EnvironmentDetector, MappingRegistry, ProgressReporter, PyprojectReader, RegistrySource,
    TargetEnvironment,
};
use crate::shared::error::{ExternalError, SynthesisError};
use crate::shared::Result;

/// ResolveExternalUseCase - Core use case for `[external]` resolution
///
/// Reads the pyproject, then runs only as much of the pipeline as the
/// requested format needs: parse, normalize (and validate), select a
/// target, map, synthesize the command.
///
/// # Type Parameters
/// * `PR` - PyprojectReader implementation
/// * `RS` - RegistrySource implementation
/// * `ED` - EnvironmentDetector implementation
/// * `P` - ProgressReporter implementation
pub struct ResolveExternalUseCase<PR, RS: RegistrySource, ED, P> {
    pyproject_reader: PR,
    registry_loader: RegistryLoader<RS>,
    environment_detector: ED,
    progress_reporter: P,
}

impl<PR, RS, ED, P> ResolveExternalUseCase<PR, RS, ED, P>
where
    PR: PyprojectReader,
    RS: RegistrySource,
    ED: EnvironmentDetector,
    P: ProgressReporter,
{
    /// Creates a new ResolveExternalUseCase with injected dependencies
    pub fn new(
        pyproject_reader: PR,
        registry_source: RS,
        environment_detector: ED,
        progress_reporter: P,
    ) -> Self {
        Self {
            pyproject_reader,
            registry_loader: RegistryLoader::new(registry_source),
            environment_detector,
            progress_reporter,
        }
    }

    pub async fn execute(&self, request: ResolveRequest) -> Result<ResolveResponse> {
        // Step 1: Read and parse the [external] table
        let mut response = self.read_document(&request)?;

        if !request.format.needs_registry() && !request.validate {
            return Ok(response);
        }

        // Step 2: Load the registry
        let registry = self.load_registry(&request).await?;

        // Step 3: Normalize, and validate if requested
        let normalized = self.normalize(&response.document, &registry);
        if request.validate {
            response.validation = self.validate(&normalized, &registry);
        }

        if !request.format.needs_mapping() {
            response.normalized = Some(normalized);
            return Ok(response);
        }

        // Step 4: Select the target and map onto it
        let target = self.select_target(&request, &registry)?;
        self.progress_reporter.report(&format!("🎯 Target: {}", target));
        let mapping = Mapper::map(
            &normalized,
            &target.ecosystem,
            &target.package_manager,
            &registry,
        )?;
        self.report_mapping(&mapping);

        // Step 5: Synthesize the install command
        if request.format.needs_command() {
            response.command = Some(self.synthesize(&mapping, &target));
        }

        self.progress_reporter.report_completion(&format!(
            "✅ Mapped {} of {} requirement(s) for {}",
            mapping.mapped_count(),
            mapping.mapped_count() + mapping.unmapped_count(),
            target
        ));

        response.normalized = Some(normalized);
        response.target = Some(target);
        response.mapping = Some(mapping);
        Ok(response)
    }

    fn read_document(&self, request: &ResolveRequest) -> Result<ResolveResponse> {
        self.progress_reporter.report(&format!(
            "📖 Loading pyproject.toml from: {}",
            request.package.display()
        ));

        let source = self.pyproject_reader.read_pyproject(&request.package)?;
        let table = DocumentParser::external_table(&source.content, &source.origin)?;
        let mut document = DocumentParser::parse(&table)?;

        for key in document.unknown_keys() {
            self.progress_reporter
                .report_warning(&format!("Ignoring unknown key '{}' in [external]", key));
        }

        if !request.groups.is_empty() {
            document = document.restrict_to(&request.groups);
        }

        self.progress_reporter.report(&format!(
            "✅ Found {} external requirement(s)",
            document.requirement_count()
        ));
        Ok(ResolveResponse::new(source.origin, table, document))
    }

    async fn load_registry(&self, request: &ResolveRequest) -> Result<InMemoryRegistry> {
        self.progress_reporter.report(&format!(
            "🌐 Loading mapping registry from: {}",
            request.registry.registry
        ));
        self.progress_reporter
            .report_progress(0, 1, Some("fetching registry documents"));

        let only_ecosystem = if request.format.needs_mapping() {
            Self::ecosystem_to_load(request)
        } else {
            None
        };
        let loaded = self
            .registry_loader
            .load(&request.registry, only_ecosystem)
            .await;
        self.progress_reporter.report_progress(1, 1, None);

        let registry = loaded?;
        tracing::debug!(
            ecosystems = registry.known_ecosystems().len(),
            only = ?only_ecosystem,
            "registry loaded"
        );
        Ok(registry)
    }

    /// The one ecosystem whose mapping is needed, when it is known up front
    fn ecosystem_to_load(request: &ResolveRequest) -> Option<&str> {
        if !request.target.is_empty() {
            return request.target.ecosystem.as_deref();
        }
        request.preferred.ecosystem.as_deref()
    }

    fn normalize(
        &self,
        document: &ExternalMetadataDocument,
        registry: &InMemoryRegistry,
    ) -> NormalizedDocument {
        let normalized = Normalizer::normalize(document, registry);
        for issue in normalized.issues() {
            self.progress_reporter.report_warning(&issue.to_string());
        }
        normalized
    }

    fn validate(
        &self,
        normalized: &NormalizedDocument,
        registry: &InMemoryRegistry,
    ) -> Vec<ValidationWarning> {
        let warnings = Validator::validate(normalized, registry);
        for warning in &warnings {
            self.progress_reporter.report_warning(&warning.to_string());
        }
        if warnings.is_empty() {
            self.progress_reporter
                .report("✅ All identifiers are canonical and known to the registry");
        }
        warnings
    }

    /// Explicit selection, then configured preference, then detection
    fn select_target(
        &self,
        request: &ResolveRequest,
        registry: &InMemoryRegistry,
    ) -> Result<TargetEnvironment> {
        for selection in [&request.target, &request.preferred] {
            if let Some(target) = Self::complete_selection(selection, registry)? {
                return Ok(target);
            }
        }
        self.environment_detector.detect(registry)
    }

    /// Fills in the missing half of a selection from the registry
    fn complete_selection(
        selection: &TargetSelection,
        registry: &InMemoryRegistry,
    ) -> Result<Option<TargetEnvironment>> {
        match (&selection.ecosystem, &selection.package_manager) {
            (Some(ecosystem), Some(package_manager)) => Ok(Some(TargetEnvironment::new(
                ecosystem.clone(),
                package_manager.clone(),
            ))),
            (Some(ecosystem), None) => {
                let known = registry.known_ecosystems();
                if !known.contains(ecosystem) {
                    return Err(ExternalError::UnknownEcosystem {
                        ecosystem: ecosystem.clone(),
                        known: known.into_iter().collect::<Vec<_>>().join(", "),
                    }
                    .into());
                }
                let package_manager = registry
                    .known_package_managers(ecosystem)
                    .into_iter()
                    .next()
                    .ok_or_else(|| ExternalError::Validation {
                        message: format!("Ecosystem '{}' declares no package manager", ecosystem),
                    })?;
                Ok(Some(TargetEnvironment::new(ecosystem.clone(), package_manager)))
            }
            (None, Some(package_manager)) => {
                let ecosystem = registry
                    .ecosystem_for_package_manager(package_manager)
                    .ok_or_else(|| ExternalError::Validation {
                        message: format!(
                            "No known ecosystem uses package manager '{}'",
                            package_manager
                        ),
                    })?;
                Ok(Some(TargetEnvironment::new(ecosystem, package_manager.clone())))
            }
            (None, None) => Ok(None),
        }
    }

    fn report_mapping(&self, mapping: &MappingResult) {
        for warning in mapping.warnings() {
            self.progress_reporter.report_warning(&warning.to_string());
        }
        for (requirement, reason) in mapping.unmapped() {
            let optional = if requirement.purpose().is_optional() {
                " (optional)"
            } else {
                ""
            };
            self.progress_reporter.report_warning(&format!(
                "{}{} in '{}': {}",
                requirement.raw_identifier(),
                optional,
                requirement.purpose(),
                reason
            ));
        }
    }

    fn synthesize(
        &self,
        mapping: &MappingResult,
        target: &TargetEnvironment,
    ) -> std::result::Result<InstallCommand, SynthesisError> {
        let command = CommandSynthesizer::synthesize(mapping, &target.package_manager);
        if let Err(e @ SynthesisError::NothingToInstall { .. }) = &command {
            self.progress_reporter.report_warning(&e.to_string());
        }
        command
    }
}
