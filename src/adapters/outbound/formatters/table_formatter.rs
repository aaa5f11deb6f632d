use crate::application::dto::ResolveResponse;
use crate::external_metadata::domain::{MappingOutcome, Purpose};
use crate::ports::outbound::ResolutionFormatter;
use crate::shared::Result;
use anyhow::Context;
use toml::{Table, Value};

/// One `[external]` group as it is written back out
struct GroupEntries<'a> {
    purpose: Purpose,
    optional_group: Option<&'a str>,
    entries: Vec<String>,
}

/// Builds `{"external": {...}}` with the fixed groups first and the optional
/// groups under `optional-dependencies`, keeping the given order.
fn external_table<'a>(groups: impl IntoIterator<Item = GroupEntries<'a>>) -> Table {
    let mut external = Table::new();
    let mut optional = Table::new();

    for group in groups {
        let values = Value::Array(group.entries.into_iter().map(Value::String).collect());
        match group.optional_group {
            Some(name) => {
                optional.insert(name.to_string(), values);
            }
            None => {
                external.insert(group.purpose.table_key().to_string(), values);
            }
        }
    }
    if !optional.is_empty() {
        external.insert(
            Purpose::Optional.table_key().to_string(),
            Value::Table(optional),
        );
    }

    let mut root = Table::new();
    root.insert("external".to_string(), Value::Table(external));
    root
}

fn render(table: &Table) -> Result<String> {
    toml::to_string(table).context("Failed to serialize [external] table")
}

/// RawTableFormatter adapter: the `[external]` table exactly as declared
pub struct RawTableFormatter;

impl RawTableFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RawTableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionFormatter for RawTableFormatter {
    fn format(&self, response: &ResolveResponse) -> Result<String> {
        let mut root = Table::new();
        root.insert(
            "external".to_string(),
            Value::Table(response.external_table.clone()),
        );
        render(&root)
    }
}

/// NormalizedTableFormatter adapter: declarations rewritten with canonical
/// identifiers, constraints kept
pub struct NormalizedTableFormatter;

impl NormalizedTableFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NormalizedTableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionFormatter for NormalizedTableFormatter {
    fn format(&self, response: &ResolveResponse) -> Result<String> {
        let normalized = response
            .normalized
            .as_ref()
            .context("The normalized format needs a normalized document")?;

        let groups = normalized.document().groups().into_iter().map(|group| GroupEntries {
            purpose: group.purpose,
            optional_group: group.optional_group,
            entries: group
                .requirements
                .iter()
                .map(|r| r.normalized_declaration())
                .collect(),
        });
        render(&external_table(groups))
    }
}

/// MappedTableFormatter adapter: each group lists the provider arguments
/// for the target; unmapped requirements are left out
pub struct MappedTableFormatter;

impl MappedTableFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MappedTableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionFormatter for MappedTableFormatter {
    fn format(&self, response: &ResolveResponse) -> Result<String> {
        let mapping = response
            .mapping
            .as_ref()
            .context("The mapped format needs a mapping result")?;

        let groups = mapping.groups().iter().map(|group| GroupEntries {
            purpose: group.purpose,
            optional_group: group.optional_group.as_deref(),
            entries: group
                .entries
                .iter()
                .flat_map(|entry| match &entry.outcome {
                    MappingOutcome::Mapped { packages, .. } => {
                        packages.iter().flat_map(|p| p.args.clone()).collect()
                    }
                    MappingOutcome::Unmapped { .. } => Vec::new(),
                })
                .collect(),
        });
        render(&external_table(groups))
    }
}
