mod cli;
mod config;

use cli::Args;
use config::ConfigFile;
use pyproject_external::adapters::outbound::console::StderrProgressReporter;
use pyproject_external::adapters::outbound::filesystem::FileSystemReader;
use pyproject_external::adapters::outbound::network::{CachingRegistrySource, HttpRegistrySource};
use pyproject_external::adapters::outbound::registry::{LocationRegistrySource, RegistryLocations};
use pyproject_external::adapters::outbound::system::SystemEnvironmentDetector;
use pyproject_external::application::dto::{ResolveRequest, TargetSelection};
use pyproject_external::application::factories::{
    FormatterFactory, PresenterFactory, PresenterType,
};
use pyproject_external::application::use_cases::ResolveExternalUseCase;
use pyproject_external::shared::error::ExitCode;
use pyproject_external::shared::Result;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "PYPROJECT_EXTERNAL_LOG";

#[tokio::main]
async fn main() {
    // clap exits with code 2 on invalid arguments
    let args = Args::parse_args();
    init_tracing(args.verbose);

    match run(args).await {
        Ok(code) => process::exit(code.as_i32()),
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            for cause in e.chain().skip(1) {
                eprintln!("\nCaused by: {}", cause);
            }

            eprintln!();
            process::exit(ExitCode::ApplicationError.as_i32());
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(args: Args) -> Result<ExitCode> {
    let config = load_config(&args)?.unwrap_or_default();
    let format = args.format;

    // Create adapters (Dependency Injection)
    let registry_source = LocationRegistrySource::new(
        FileSystemReader::new(),
        CachingRegistrySource::new(HttpRegistrySource::new()?),
    );
    let use_case = ResolveExternalUseCase::new(
        FileSystemReader::new(),
        registry_source,
        SystemEnvironmentDetector::new(),
        StderrProgressReporter::new(),
    );

    let request = build_request(args.package.clone(), &args, config);
    let response = use_case.execute(request).await?;

    eprintln!("{}", FormatterFactory::progress_message(format));
    let formatted_output = FormatterFactory::create(format).format(&response)?;

    // An empty command (nothing to install) has already been reported
    if !formatted_output.is_empty() {
        PresenterFactory::create(PresenterType::from_output(args.output)).present(&formatted_output)?;
    }

    if format.needs_mapping() && response.unmapped_required() > 0 {
        return Ok(ExitCode::UnmappedRequirements);
    }
    Ok(ExitCode::Success)
}

fn load_config(args: &Args) -> Result<Option<ConfigFile>> {
    if let Some(path) = &args.config {
        return config::load_config_from_path(path).map(Some);
    }
    let env_dir = std::env::var_os(config::CONFIG_DIR_ENV).map(PathBuf::from);
    config::discover_first(&config::search_dirs(&args.package, env_dir))
}

/// CLI flags override the config file
fn build_request(package: PathBuf, args: &Args, config: ConfigFile) -> ResolveRequest {
    let defaults = RegistryLocations::default();
    let registry = RegistryLocations {
        registry: args
            .registry
            .clone()
            .or(config.registry)
            .unwrap_or(defaults.registry),
        ecosystems: args
            .ecosystems
            .clone()
            .or(config.ecosystems)
            .unwrap_or(defaults.ecosystems),
    };

    ResolveRequest::new(package, args.format)
        .with_target(TargetSelection::new(
            args.ecosystem.clone(),
            args.package_manager.clone(),
        ))
        .with_preferred(TargetSelection::new(
            config.preferred_ecosystem,
            config.preferred_package_manager,
        ))
        .with_groups(args.groups.clone())
        .with_validation(args.validate)
        .with_registry(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_flags_override_config() {
        let args = Args::try_parse_from([
            "pyproject-external",
            "--registry",
            "local/registry.json",
            "--ecosystem",
            "ubuntu",
        ])
        .unwrap();
        let config = ConfigFile {
            preferred_ecosystem: Some("conda-forge".to_string()),
            registry: Some("config/registry.json".to_string()),
            ecosystems: Some("config/known-ecosystems.json".to_string()),
            ..ConfigFile::default()
        };

        let request = build_request(PathBuf::from("."), &args, config);
        assert_eq!(request.registry.registry, "local/registry.json");
        assert_eq!(request.registry.ecosystems, "config/known-ecosystems.json");
        assert_eq!(request.target.ecosystem.as_deref(), Some("ubuntu"));
        assert_eq!(request.preferred.ecosystem.as_deref(), Some("conda-forge"));
    }

    #[test]
    fn test_default_registry_locations() {
        let args = Args::try_parse_from(["pyproject-external"]).unwrap();
        let request = build_request(PathBuf::from("."), &args, ConfigFile::default());
        assert_eq!(request.registry, RegistryLocations::default());
        assert!(request.target.is_empty());
        assert!(request.preferred.is_empty());
    }
}
