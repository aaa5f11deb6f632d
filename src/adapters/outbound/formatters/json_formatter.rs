use crate::application::dto::ResolveResponse;
use crate::external_metadata::domain::{InstallCommand, MappingResult, NormalizedDocument};
use crate::external_metadata::services::ValidationWarning;
use crate::ports::outbound::ResolutionFormatter;
use crate::shared::error::SynthesisError;
use crate::shared::Result;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct ResolutionView<'a> {
    origin: &'a Path,
    external: &'a toml::Table,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    unknown_keys: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    normalized: Option<NormalizedView>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    validation: &'a [ValidationWarning],
    #[serde(skip_serializing_if = "Option::is_none")]
    mapping: Option<&'a MappingResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    command: Option<CommandView>,
}

#[derive(Debug, Serialize)]
struct NormalizedView {
    groups: Vec<GroupView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    unresolved: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    issues: Vec<IssueView>,
}

#[derive(Debug, Serialize)]
struct GroupView {
    group: String,
    requirements: Vec<String>,
}

#[derive(Debug, Serialize)]
struct IssueView {
    raw_identifier: String,
    constraint: String,
    reason: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum CommandView {
    Argv { argv: Vec<String>, line: String },
    Error { error: String },
}

impl NormalizedView {
    fn from_document(normalized: &NormalizedDocument) -> Self {
        Self {
            groups: normalized
                .document()
                .groups()
                .into_iter()
                .map(|group| GroupView {
                    group: group.label(),
                    requirements: group
                        .requirements
                        .iter()
                        .map(|r| r.normalized_declaration())
                        .collect(),
                })
                .collect(),
            unresolved: normalized
                .unresolved()
                .map(|r| r.raw_identifier().to_string())
                .collect(),
            issues: normalized
                .issues()
                .iter()
                .map(|issue| IssueView {
                    raw_identifier: issue.raw_identifier.clone(),
                    constraint: issue.constraint.clone(),
                    reason: issue.reason.clone(),
                })
                .collect(),
        }
    }
}

fn command_view(command: &std::result::Result<InstallCommand, SynthesisError>) -> CommandView {
    match command {
        Ok(command) => CommandView::Argv {
            argv: command.argv().to_vec(),
            line: command.to_string(),
        },
        Err(e) => CommandView::Error {
            error: e.to_string(),
        },
    }
}

/// JsonFormatter adapter: every stage of the resolution as one JSON document
///
/// Stages the request did not reach are omitted.
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionFormatter for JsonFormatter {
    fn format(&self, response: &ResolveResponse) -> Result<String> {
        let view = ResolutionView {
            origin: &response.origin,
            external: &response.external_table,
            unknown_keys: response.document.unknown_keys(),
            normalized: response.normalized.as_ref().map(NormalizedView::from_document),
            validation: &response.validation,
            mapping: response.mapping.as_ref(),
            command: response.command.as_ref().map(command_view),
        };
        Ok(serde_json::to_string_pretty(&view)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::formatters::test_support::{mapped_response, parsed_response};
    use serde_json::Value;

    #[test]
    fn test_parsed_only_omits_later_stages() {
        let output = JsonFormatter::new().format(&parsed_response()).unwrap();
        let json: Value = serde_json::from_str(&output).unwrap();

        assert!(json["external"]["build-requires"].is_array());
        assert!(json.get("normalized").is_none());
        assert!(json.get("mapping").is_none());
        assert!(json.get("command").is_none());
    }

    #[test]
    fn test_mapping_statuses() {
        let output = JsonFormatter::new().format(&mapped_response()).unwrap();
        let json: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(json["mapping"]["ecosystem"], "ubuntu");
        assert_eq!(json["mapping"]["package_manager"], "apt");
        let gui = json["mapping"]["groups"]
            .as_array()
            .unwrap()
            .iter()
            .find(|g| g["optional_group"] == "gui")
            .unwrap();
        assert_eq!(gui["entries"][0]["status"], "unmapped");
        assert_eq!(gui["entries"][0]["reason"], "no-mapping-for-target");
    }

    #[test]
    fn test_normalized_groups_and_warnings() {
        let output = JsonFormatter::new().format(&mapped_response()).unwrap();
        let json: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(json["normalized"]["groups"][0]["group"], "build-requires");
        assert!(json["mapping"]["warnings"].as_array().unwrap().len() >= 1);
    }

    #[test]
    fn test_command_error_is_reported() {
        let mut response = mapped_response();
        response.command = Some(Err(SynthesisError::NothingToInstall {
            package_manager: "apt".to_string(),
        }));
        let output = JsonFormatter::new().format(&response).unwrap();
        let json: Value = serde_json::from_str(&output).unwrap();
        assert!(json["command"]["error"]
            .as_str()
            .unwrap()
            .contains("Nothing to install"));
    }
}
