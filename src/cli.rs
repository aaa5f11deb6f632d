use clap::Parser;
use pyproject_external::application::dto::OutputFormat;
use pyproject_external::external_metadata::domain::Purpose;
use std::path::PathBuf;

/// Resolve the PEP 725 [external] table of a Python project
#[derive(Parser, Debug)]
#[command(name = "pyproject-external")]
#[command(version)]
#[command(
    about = "Resolve the PEP 725 [external] table of a Python project into system packages",
    long_about = None
)]
pub struct Args {
    /// Project directory, pyproject.toml file or sdist (.tar.gz)
    #[arg(default_value = ".")]
    pub package: PathBuf,

    /// Output format: raw, normalized, mapped, mapped-list, command or json
    #[arg(short, long, default_value = "raw")]
    pub format: OutputFormat,

    /// Target ecosystem (e.g. ubuntu, conda-forge); detected when omitted
    #[arg(long)]
    pub ecosystem: Option<String>,

    /// Target package manager (e.g. apt, pixi); defaults to the ecosystem's first
    #[arg(long)]
    pub package_manager: Option<String>,

    /// Only resolve these groups: build, host, run or optional.
    /// Can be specified multiple times: --group build --group host
    #[arg(long = "group", value_name = "GROUP")]
    pub groups: Vec<Purpose>,

    /// Report identifiers that are unknown or not canonical
    #[arg(long)]
    pub validate: bool,

    /// Location of registry.json (path or URL)
    #[arg(long, value_name = "LOCATION")]
    pub registry: Option<String>,

    /// Location of known-ecosystems.json (path or URL)
    #[arg(long, value_name = "LOCATION")]
    pub ecosystems: Option<String>,

    /// Path to a config file (default: pyproject-external.config.yml in the project directory)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Show debug logs on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["pyproject-external"]).unwrap();
        assert_eq!(args.package, PathBuf::from("."));
        assert_eq!(args.format, OutputFormat::Raw);
        assert!(args.groups.is_empty());
        assert!(!args.validate);
        assert!(args.output.is_none());
    }

    #[test]
    fn test_target_and_groups() {
        let args = Args::try_parse_from([
            "pyproject-external",
            "dist/demo-1.0.tar.gz",
            "-f",
            "command",
            "--ecosystem",
            "ubuntu",
            "--package-manager",
            "apt",
            "--group",
            "build",
            "--group",
            "host",
        ])
        .unwrap();
        assert_eq!(args.package, PathBuf::from("dist/demo-1.0.tar.gz"));
        assert_eq!(args.format, OutputFormat::Command);
        assert_eq!(args.ecosystem.as_deref(), Some("ubuntu"));
        assert_eq!(args.package_manager.as_deref(), Some("apt"));
        assert_eq!(args.groups, vec![Purpose::Build, Purpose::Host]);
    }

    #[test]
    fn test_invalid_format() {
        let err = Args::try_parse_from(["pyproject-external", "--format", "markdown"]).unwrap_err();
        assert!(err.to_string().contains("Invalid format"));
    }

    #[test]
    fn test_invalid_group() {
        let err = Args::try_parse_from(["pyproject-external", "--group", "test"]).unwrap_err();
        assert!(err.to_string().contains("Invalid group"));
    }
}
