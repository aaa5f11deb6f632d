use crate::external_metadata::domain::{ExternalMetadataDocument, ExternalRequirement, Purpose};
use crate::shared::error::ExternalError;
use crate::shared::Result;
use std::path::Path;
use toml::{Table, Value};

/// DocumentParser service: builds an `ExternalMetadataDocument` from TOML
///
/// Shape errors (a group that is not an array, an entry that is not a
/// string, ...) abort with `MalformedDocument`. Keys that are not one of the
/// four groups are kept on the document as unknown keys.
pub struct DocumentParser;

impl DocumentParser {
    /// Extracts the `[external]` table from the text of a pyproject.toml
    ///
    /// # Errors
    /// `PyprojectParseError` for invalid TOML, `MissingExternalTable` when the
    /// table is absent, `MalformedDocument` when `external` is not a table.
    pub fn external_table(content: &str, origin: &Path) -> Result<Table> {
        let mut pyproject: Table =
            toml::from_str(content).map_err(|e| ExternalError::PyprojectParseError {
                path: origin.to_path_buf(),
                details: e.to_string(),
            })?;

        match pyproject.remove("external") {
            Some(Value::Table(table)) => Ok(table),
            Some(other) => Err(ExternalError::MalformedDocument {
                details: format!("'external' must be a table, found {}", other.type_str()),
            }
            .into()),
            None => Err(ExternalError::MissingExternalTable {
                path: origin.to_path_buf(),
            }
            .into()),
        }
    }

    /// Parses the contents of an `[external]` table
    pub fn parse(table: &Table) -> Result<ExternalMetadataDocument> {
        let mut document = ExternalMetadataDocument::new();

        for (key, value) in table {
            document = match Purpose::from_table_key(key) {
                Some(Purpose::Optional) => Self::parse_optional_groups(document, key, value)?,
                Some(purpose) => {
                    let entries = Self::string_array(key, value)?;
                    Self::push_all(document, purpose, None, key, &entries)?
                }
                None => {
                    tracing::debug!(key = %key, "unknown key in [external]");
                    document.with_unknown_key(key.clone())
                }
            };
        }

        Ok(document)
    }

    fn parse_optional_groups(
        mut document: ExternalMetadataDocument,
        key: &str,
        value: &Value,
    ) -> Result<ExternalMetadataDocument> {
        let groups = value.as_table().ok_or_else(|| ExternalError::MalformedDocument {
            details: format!(
                "'{}' must be a table of group names to arrays, found {}",
                key,
                value.type_str()
            ),
        })?;

        for (group, entries) in groups {
            let location = format!("{}.{}", key, group);
            let entries = Self::string_array(&location, entries)?;
            document = document.with_optional_group(group);
            document = Self::push_all(
                document,
                Purpose::Optional,
                Some(group.as_str()),
                &location,
                &entries,
            )?;
        }
        Ok(document)
    }

    fn push_all(
        mut document: ExternalMetadataDocument,
        purpose: Purpose,
        group: Option<&str>,
        location: &str,
        entries: &[&str],
    ) -> Result<ExternalMetadataDocument> {
        for entry in entries {
            let requirement = ExternalRequirement::parse(purpose, group, entry).map_err(|e| {
                ExternalError::MalformedDocument {
                    details: format!("{}: {}", location, e),
                }
            })?;
            document = document.with_requirement(requirement);
        }
        Ok(document)
    }

    fn string_array<'a>(location: &str, value: &'a Value) -> Result<Vec<&'a str>> {
        let items = value.as_array().ok_or_else(|| ExternalError::MalformedDocument {
            details: format!("'{}' must be an array of strings, found {}", location, value.type_str()),
        })?;

        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                item.as_str().ok_or_else(|| {
                    ExternalError::MalformedDocument {
                        details: format!(
                            "'{}' entry {} must be a string, found {}",
                            location,
                            index,
                            item.type_str()
                        ),
                    }
                    .into()
                })
            })
            .collect()
    }
}
