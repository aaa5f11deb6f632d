use crate::application::dto::ResolveResponse;
use crate::external_metadata::domain::shell_join;
use crate::external_metadata::services::CommandSynthesizer;
use crate::ports::outbound::ResolutionFormatter;
use crate::shared::error::SynthesisError;
use crate::shared::Result;
use anyhow::Context;

/// MappedListFormatter adapter: every provider argument on one
/// shell-quoted line, in group order without repeats
pub struct MappedListFormatter;

impl MappedListFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MappedListFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionFormatter for MappedListFormatter {
    fn format(&self, response: &ResolveResponse) -> Result<String> {
        let mapping = response
            .mapping
            .as_ref()
            .context("The mapped-list format needs a mapping result")?;
        Ok(shell_join(&CommandSynthesizer::package_arguments(mapping)))
    }
}

/// CommandFormatter adapter: the install command as one shell line
///
/// A target with nothing to install renders as empty output; a package
/// manager without a command template is an error.
pub struct CommandFormatter;

impl CommandFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CommandFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionFormatter for CommandFormatter {
    fn format(&self, response: &ResolveResponse) -> Result<String> {
        let command = response
            .command
            .as_ref()
            .context("The command format needs a synthesized command")?;

        match command {
            Ok(command) => Ok(command.to_string()),
            Err(SynthesisError::NothingToInstall { .. }) => Ok(String::new()),
            Err(e) => Err(e.clone().into()),
        }
    }
}
