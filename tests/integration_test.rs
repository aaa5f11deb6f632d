/// Integration tests for the application layer
mod test_utilities;

use pyproject_external::external_metadata::domain::{MappingOutcome, UnmappedReason};
use pyproject_external::prelude::*;
use pyproject_external::shared::error::{ExternalError, SynthesisError};
use std::path::PathBuf;
use test_utilities::mocks::*;

type UseCase = ResolveExternalUseCase<
    MockPyprojectReader,
    MockRegistrySource,
    MockEnvironmentDetector,
    MockProgressReporter,
>;

fn use_case(reader: MockPyprojectReader, reporter: &MockProgressReporter) -> UseCase {
    ResolveExternalUseCase::new(
        reader,
        MockRegistrySource::fixtures(),
        MockEnvironmentDetector::unsupported(),
        reporter.clone(),
    )
}

fn request(format: OutputFormat, ecosystem: &str, package_manager: &str) -> ResolveRequest {
    ResolveRequest::new(PathBuf::from("demo"), format)
        .with_registry(MockRegistrySource::locations())
        .with_target(TargetSelection::new(
            Some(ecosystem.to_string()),
            Some(package_manager.to_string()),
        ))
}

#[tokio::test]
async fn test_single_build_requirement_to_apt_command() {
    let reporter = MockProgressReporter::new();
    let use_case = use_case(
        MockPyprojectReader::external("build-requires = [\"dep:generic/cmake\"]\n"),
        &reporter,
    );

    let response = use_case
        .execute(request(OutputFormat::Command, "ubuntu", "apt"))
        .await
        .unwrap();

    let mapping = response.mapping.as_ref().unwrap();
    let providers: Vec<&str> = mapping.providers().map(|p| p.name.as_str()).collect();
    assert_eq!(providers, vec!["cmake"]);

    let command = response.command.clone().unwrap().unwrap();
    assert_eq!(command.to_string(), "sudo apt-get install --yes cmake");
    assert_eq!(
        CommandFormatter::new().format(&response).unwrap(),
        "sudo apt-get install --yes cmake"
    );
}

#[tokio::test]
async fn test_package_manager_without_template() {
    let registry = MockRegistrySource::fixtures().with_document(
        "ubuntu.mapping.json",
        r#"{
            "schema_version": 1,
            "package_managers": [{ "name": "apt" }, { "name": "unknown-pm" }],
            "mappings": [{ "id": "dep:generic/cmake", "specs": "cmake" }]
        }"#,
    );
    let use_case = ResolveExternalUseCase::new(
        MockPyprojectReader::external("build-requires = [\"dep:generic/cmake\"]\n"),
        registry,
        MockEnvironmentDetector::unsupported(),
        MockProgressReporter::new(),
    );

    let response = use_case
        .execute(request(OutputFormat::Command, "ubuntu", "unknown-pm"))
        .await
        .unwrap();

    assert_eq!(
        response.command,
        Some(Err(SynthesisError::NoPackageManagerTemplate {
            package_manager: "unknown-pm".to_string()
        }))
    );
    assert!(CommandFormatter::new().format(&response).is_err());
}

#[tokio::test]
async fn test_unrecognized_identifier_leaves_nothing_to_install() {
    let reporter = MockProgressReporter::new();
    let use_case = use_case(
        MockPyprojectReader::external("build-requires = [\"dep:generic/frobnicator\"]\n"),
        &reporter,
    );

    let response = use_case
        .execute(request(OutputFormat::Command, "ubuntu", "apt"))
        .await
        .unwrap();

    let mapping = response.mapping.as_ref().unwrap();
    let unmapped: Vec<_> = mapping.unmapped().collect();
    assert_eq!(unmapped.len(), 1);
    assert_eq!(unmapped[0].1, UnmappedReason::UnrecognizedIdentifier);
    assert!(matches!(
        response.command,
        Some(Err(SynthesisError::NothingToInstall { .. }))
    ));
    assert_eq!(response.unmapped_required(), 1);
    assert!(reporter
        .warnings()
        .iter()
        .any(|w| w.contains("dep:generic/frobnicator") && w.contains("unrecognized identifier")));
}

#[tokio::test]
async fn test_shared_provider_is_emitted_once_per_group() {
    let reporter = MockProgressReporter::new();
    let use_case = use_case(
        MockPyprojectReader::external(
            "host-requires = [\"dep:generic/zlib\", \"dep:generic/zlib-dev\"]\n\
             build-requires = [\"dep:generic/zlib-dev\"]\n",
        ),
        &reporter,
    );

    let response = use_case
        .execute(request(OutputFormat::MappedList, "ubuntu", "apt"))
        .await
        .unwrap();

    let mapping = response.mapping.as_ref().unwrap();
    let host = mapping
        .groups()
        .iter()
        .find(|g| g.purpose == Purpose::Host)
        .unwrap();
    let emitted: Vec<&str> = host
        .entries
        .iter()
        .flat_map(|e| match &e.outcome {
            MappingOutcome::Mapped { packages, .. } => {
                packages.iter().map(|p| p.name.as_str()).collect()
            }
            MappingOutcome::Unmapped { .. } => Vec::new(),
        })
        .collect();
    assert_eq!(emitted, vec!["zlib1g-dev"]);

    // no deduplication across groups
    let build = mapping
        .groups()
        .iter()
        .find(|g| g.purpose == Purpose::Build)
        .unwrap();
    assert!(build.entries[0].outcome.is_mapped());

    assert_eq!(
        MappedListFormatter::new().format(&response).unwrap(),
        "zlib1g-dev"
    );
}

#[tokio::test]
async fn test_untranslatable_constraint_maps_name_only() {
    let reporter = MockProgressReporter::new();
    let use_case = use_case(
        MockPyprojectReader::external("host-requires = [\"dep:generic/zlib@>=1.2\"]\n"),
        &reporter,
    );

    let response = use_case
        .execute(request(OutputFormat::Command, "ubuntu", "apt"))
        .await
        .unwrap();

    let mapping = response.mapping.as_ref().unwrap();
    assert_eq!(mapping.mapped_count(), 1);
    assert_eq!(mapping.warnings().len(), 1);
    assert_eq!(mapping.warnings()[0].constraint, ">=1.2");
    assert_eq!(
        response.command.clone().unwrap().unwrap().to_string(),
        "sudo apt-get install --yes zlib1g-dev"
    );
    assert!(reporter.warnings().iter().any(|w| w.contains(">=1.2")));
}

#[tokio::test]
async fn test_normalization_is_idempotent() {
    let reporter = MockProgressReporter::new();
    let use_case = use_case(
        MockPyprojectReader::external(
            "host-requires = [\"dep:generic/libssl@>=3\", \"dep:generic/frobnicator\"]\n",
        ),
        &reporter,
    );
    let response = use_case
        .execute(
            ResolveRequest::new(PathBuf::from("demo"), OutputFormat::Normalized)
                .with_registry(MockRegistrySource::locations()),
        )
        .await
        .unwrap();

    let output = NormalizedTableFormatter::new().format(&response).unwrap();
    assert!(output.contains("dep:generic/openssl@>=3"));

    // normalizing the normalized table again changes nothing
    let again = ResolveExternalUseCase::new(
        MockPyprojectReader::new(output.clone()),
        MockRegistrySource::fixtures(),
        MockEnvironmentDetector::unsupported(),
        MockProgressReporter::new(),
    )
    .execute(
        ResolveRequest::new(PathBuf::from("demo"), OutputFormat::Normalized)
            .with_registry(MockRegistrySource::locations()),
    )
    .await
    .unwrap();
    assert_eq!(
        NormalizedTableFormatter::new().format(&again).unwrap(),
        output
    );
}

#[tokio::test]
async fn test_every_requirement_is_accounted_for_in_order() {
    let reporter = MockProgressReporter::new();
    let use_case = use_case(
        MockPyprojectReader::external(
            "build-requires = [\"dep:generic/ninja\", \"dep:generic/frobnicator\", \"dep:generic/cmake\"]\n\
             dependencies = [\"dep:generic/qt\", \"dep:generic/libpng\"]\n",
        ),
        &reporter,
    );

    let response = use_case
        .execute(request(OutputFormat::Mapped, "ubuntu", "apt"))
        .await
        .unwrap();

    let mapping = response.mapping.as_ref().unwrap();
    let declared: Vec<&str> = response
        .document
        .requirements()
        .map(|r| r.raw_identifier())
        .collect();
    let mapped: Vec<&str> = mapping
        .entries()
        .map(|e| e.requirement.raw_identifier())
        .collect();
    assert_eq!(declared, mapped);
    assert_eq!(mapping.mapped_count(), 3);
    assert_eq!(mapping.unmapped_count(), 2);
}

#[tokio::test]
async fn test_invalid_registry_maps_nothing() {
    let registry = MockRegistrySource::fixtures()
        .with_document("registry.json", r#"{"schema_version": 1}"#);
    let use_case = ResolveExternalUseCase::new(
        MockPyprojectReader::external("build-requires = [\"dep:generic/cmake\"]\n"),
        registry,
        MockEnvironmentDetector::unsupported(),
        MockProgressReporter::new(),
    );

    for format in [OutputFormat::Normalized, OutputFormat::Command] {
        let err = use_case
            .execute(request(format, "ubuntu", "apt"))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ExternalError>(),
            Some(ExternalError::RegistryInvalid { .. })
        ));
    }
}

#[tokio::test]
async fn test_missing_external_table() {
    let use_case = use_case(
        MockPyprojectReader::new("[project]\nname = \"demo\"\n"),
        &MockProgressReporter::new(),
    );
    let err = use_case
        .execute(request(OutputFormat::Raw, "ubuntu", "apt"))
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ExternalError>(),
        Some(ExternalError::MissingExternalTable { .. })
    ));
}

#[tokio::test]
async fn test_detected_target_is_used() {
    let use_case = ResolveExternalUseCase::new(
        MockPyprojectReader::external("build-requires = [\"dep:generic/cmake@>=3.20\"]\n"),
        MockRegistrySource::fixtures(),
        MockEnvironmentDetector::detecting("conda-forge", "pixi"),
        MockProgressReporter::new(),
    );
    let response = use_case
        .execute(
            ResolveRequest::new(PathBuf::from("demo"), OutputFormat::MappedList)
                .with_registry(MockRegistrySource::locations()),
        )
        .await
        .unwrap();

    assert_eq!(
        response.target,
        Some(TargetEnvironment::new("conda-forge", "pixi"))
    );
    assert_eq!(
        MappedListFormatter::new().format(&response).unwrap(),
        "'cmake>=3.20'"
    );
}
