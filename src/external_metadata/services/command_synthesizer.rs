use crate::external_metadata::domain::{InstallCommand, MappingResult};
use crate::external_metadata::policies::CommandTemplates;
use crate::shared::error::SynthesisError;

/// CommandSynthesizer service: turns a mapping result into command lines
pub struct CommandSynthesizer;

impl CommandSynthesizer {
    /// Builds the install command for every mapped provider of `result`.
    ///
    /// # Errors
    /// `NoPackageManagerTemplate` when there is no built-in template for the
    /// package manager (checked first), `NothingToInstall` when no
    /// requirement was mapped.
    pub fn synthesize(
        result: &MappingResult,
        package_manager: &str,
    ) -> Result<InstallCommand, SynthesisError> {
        let template = CommandTemplates::lookup(package_manager).ok_or_else(|| {
            SynthesisError::NoPackageManagerTemplate {
                package_manager: package_manager.to_string(),
            }
        })?;

        if result.mapped_count() == 0 {
            return Err(SynthesisError::NothingToInstall {
                package_manager: package_manager.to_string(),
            });
        }

        Ok(InstallCommand::new(
            template.render_install(&Self::package_arguments(result)),
        ))
    }

    /// One query command per mapped provider name; empty for package
    /// managers without a query template.
    ///
    /// # Errors
    /// `NoPackageManagerTemplate` when there is no built-in template.
    pub fn query_commands(
        result: &MappingResult,
        package_manager: &str,
    ) -> Result<Vec<InstallCommand>, SynthesisError> {
        let template = CommandTemplates::lookup(package_manager).ok_or_else(|| {
            SynthesisError::NoPackageManagerTemplate {
                package_manager: package_manager.to_string(),
            }
        })?;

        let mut names: Vec<&str> = Vec::new();
        for provider in result.providers() {
            if !names.contains(&provider.name.as_str()) {
                names.push(&provider.name);
            }
        }

        Ok(names
            .into_iter()
            .filter_map(|name| template.render_query(name))
            .map(InstallCommand::new)
            .collect())
    }

    /// Provider arguments in group order, without repeats
    pub fn package_arguments(result: &MappingResult) -> Vec<String> {
        let mut arguments: Vec<String> = Vec::new();
        for arg in result.providers().flat_map(|p| p.args.iter()) {
            if !arguments.contains(arg) {
                arguments.push(arg.clone());
            }
        }
        arguments
    }
}
