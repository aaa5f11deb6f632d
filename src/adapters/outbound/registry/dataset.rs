use crate::shared::error::ExternalError;
use crate::shared::Result;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Schema versions this crate understands
pub const SUPPORTED_SCHEMA_VERSIONS: std::ops::RangeInclusive<u32> = 1..=1;

fn default_schema_version() -> u32 {
    1
}

/// A string or a list of strings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

/// `registry.json`: every known identifier and its aliases
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryDocument {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub definitions: Vec<Definition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Definition {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub provides: Option<OneOrMany>,
}

/// `known-ecosystems.json`: where the mapping of each ecosystem lives
#[derive(Debug, Clone, Deserialize)]
pub struct EcosystemsDocument {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub ecosystems: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
struct EcosystemEntry {
    mapping: String,
}

impl EcosystemsDocument {
    /// `(ecosystem, mapping location)` pairs in declared order
    pub fn mapping_locations(&self, location: &str) -> Result<Vec<(String, String)>> {
        self.ecosystems
            .iter()
            .map(|(name, value)| -> Result<(String, String)> {
                let entry: EcosystemEntry = serde_json::from_value(value.clone()).map_err(|e| {
                    ExternalError::RegistryInvalid {
                        location: location.to_string(),
                        details: format!("ecosystem '{}': {}", name, e),
                    }
                })?;
                Ok((name.clone(), entry.mapping))
            })
            .collect()
    }
}

/// `<ecosystem>.mapping.json`: provider names of one ecosystem
#[derive(Debug, Clone, Deserialize)]
pub struct MappingDocument {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub package_managers: Vec<PackageManagerEntry>,
    pub mappings: Vec<MappingEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PackageManagerEntry {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MappingEntry {
    pub id: String,
    #[serde(default)]
    pub specs: Option<SpecsValue>,
    #[serde(default)]
    pub specs_from: Option<String>,
}

/// `specs` as written: one name, a list used for every purpose, or per-purpose lists
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SpecsValue {
    One(String),
    Many(Vec<String>),
    PerUse {
        #[serde(default)]
        build: Option<OneOrMany>,
        #[serde(default)]
        host: Option<OneOrMany>,
        #[serde(default)]
        run: Option<OneOrMany>,
    },
}

impl SpecsValue {
    pub fn is_empty(&self) -> bool {
        match self {
            SpecsValue::One(name) => name.is_empty(),
            SpecsValue::Many(names) => names.is_empty(),
            SpecsValue::PerUse { build, host, run } => [build, host, run]
                .into_iter()
                .all(|names| match names {
                    None => true,
                    Some(OneOrMany::One(name)) => name.is_empty(),
                    Some(OneOrMany::Many(names)) => names.is_empty(),
                }),
        }
    }
}

/// Parses one registry document, failing closed on any shape or version problem
pub fn parse_document<T>(location: &str, content: &str) -> Result<T>
where
    T: DeserializeOwned + Versioned,
{
    let document: T = serde_json::from_str(content).map_err(|e| ExternalError::RegistryInvalid {
        location: location.to_string(),
        details: e.to_string(),
    })?;

    let version = document.schema_version();
    if !SUPPORTED_SCHEMA_VERSIONS.contains(&version) {
        return Err(ExternalError::RegistryInvalid {
            location: location.to_string(),
            details: format!(
                "unsupported schema_version {} (supported: {}..={})",
                version,
                SUPPORTED_SCHEMA_VERSIONS.start(),
                SUPPORTED_SCHEMA_VERSIONS.end()
            ),
        }
        .into());
    }
    Ok(document)
}

/// Documents carrying a `schema_version`
pub trait Versioned {
    fn schema_version(&self) -> u32;
}

impl Versioned for RegistryDocument {
    fn schema_version(&self) -> u32 {
        self.schema_version
    }
}

impl Versioned for EcosystemsDocument {
    fn schema_version(&self) -> u32 {
        self.schema_version
    }
}

impl Versioned for MappingDocument {
    fn schema_version(&self) -> u32 {
        self.schema_version
    }
}

/// Every document a registry is built from
#[derive(Debug, Clone)]
pub struct RegistryDataset {
    pub registry_location: String,
    pub registry: RegistryDocument,
    /// `(ecosystem, mapping location, mapping)` in the declared ecosystem order
    pub mappings: Vec<(String, String, MappingDocument)>,
}
