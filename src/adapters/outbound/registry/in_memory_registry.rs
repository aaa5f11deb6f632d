use super::dataset::{MappingDocument, MappingEntry, OneOrMany, RegistryDataset, SpecsValue};
use crate::external_metadata::domain::dep_url::{is_virtual_identifier, DepUrl};
use crate::external_metadata::domain::SpecsKind;
use crate::ports::outbound::MappingRegistry;
use crate::shared::error::ExternalError;
use crate::shared::Result;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Provider names of one identifier, split by use
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct SpecsTable {
    build: Vec<String>,
    host: Vec<String>,
    run: Vec<String>,
}

impl SpecsTable {
    fn from_value(value: &SpecsValue) -> Self {
        match value {
            SpecsValue::One(name) => Self::same(vec![name.clone()]),
            SpecsValue::Many(names) => Self::same(names.clone()),
            SpecsValue::PerUse { build, host, run } => {
                let list = |names: &Option<OneOrMany>| {
                    names
                        .clone()
                        .map(OneOrMany::into_vec)
                        .unwrap_or_default()
                        .into_iter()
                        .filter(|n| !n.trim().is_empty())
                        .collect::<Vec<String>>()
                };
                Self {
                    build: list(build),
                    host: list(host),
                    run: list(run),
                }
            }
        }
    }

    fn same(names: Vec<String>) -> Self {
        let names: Vec<String> = names.into_iter().filter(|n| !n.trim().is_empty()).collect();
        Self {
            build: names.clone(),
            host: names.clone(),
            run: names,
        }
    }

    fn get(&self, kind: SpecsKind) -> &[String] {
        match kind {
            SpecsKind::Build => &self.build,
            SpecsKind::Host => &self.host,
            SpecsKind::Run => &self.run,
        }
    }
}

#[derive(Debug, Clone)]
struct EcosystemMapping {
    name: String,
    package_managers: Vec<String>,
    specs: HashMap<String, SpecsTable>,
}

/// InMemoryRegistry adapter: the validated, immutable form of a registry dataset
///
/// Construction checks the whole dataset and fails closed with
/// `RegistryInvalid`; a registry value that exists is always complete.
#[derive(Debug, Clone)]
pub struct InMemoryRegistry {
    /// Identifier to everything it declares it provides
    definitions: HashMap<String, Vec<String>>,
    /// Alias to canonical identifier
    aliases: HashMap<String, String>,
    /// Ecosystems in declared order
    ecosystems: Vec<EcosystemMapping>,
}

impl InMemoryRegistry {
    pub fn build(dataset: RegistryDataset) -> Result<Self> {
        let location = dataset.registry_location.as_str();
        let mut definitions: HashMap<String, Vec<String>> = HashMap::new();

        for definition in &dataset.registry.definitions {
            let id = lookup_key(location, &definition.id)?;
            let provides = match &definition.provides {
                Some(provides) => provides
                    .clone()
                    .into_vec()
                    .iter()
                    .map(|target| lookup_key(location, target))
                    .collect::<Result<Vec<_>>>()?,
                None => Vec::new(),
            };

            let entry = definitions.entry(id).or_default();
            for target in provides {
                if !entry.contains(&target) {
                    entry.push(target);
                }
            }
        }

        for (id, provides) in &definitions {
            if let Some(target) = provides.iter().find(|t| !definitions.contains_key(*t)) {
                return Err(invalid(
                    location,
                    format!("'{}' provides undefined '{}'", id, target),
                ));
            }
        }

        let aliases = resolve_aliases(location, &definitions)?;

        let ecosystems = dataset
            .mappings
            .iter()
            .map(|(name, mapping_location, document)| {
                build_ecosystem(name, mapping_location, document)
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            definitions = definitions.len(),
            aliases = aliases.len(),
            ecosystems = ecosystems.len(),
            "registry built"
        );

        Ok(Self {
            definitions,
            aliases,
            ecosystems,
        })
    }

    fn ecosystem(&self, name: &str) -> Option<&EcosystemMapping> {
        self.ecosystems.iter().find(|e| e.name == name)
    }

    fn is_mapped_anywhere(&self, identifier: &str) -> bool {
        self.ecosystems.iter().any(|e| e.specs.contains_key(identifier))
    }
}

impl MappingRegistry for InMemoryRegistry {
    fn lookup_alias(&self, identifier: &str) -> Option<String> {
        if let Some(canonical) = self.aliases.get(identifier) {
            return Some(canonical.clone());
        }
        self.is_known(identifier).then(|| identifier.to_string())
    }

    fn lookup_package_for(
        &self,
        canonical: &str,
        ecosystem: &str,
        package_manager: &str,
        kind: SpecsKind,
    ) -> Vec<String> {
        self.ecosystem(ecosystem)
            .filter(|e| e.package_managers.iter().any(|pm| pm == package_manager))
            .and_then(|e| e.specs.get(canonical))
            .map(|table| table.get(kind).to_vec())
            .unwrap_or_default()
    }

    fn known_ecosystems(&self) -> BTreeSet<String> {
        self.ecosystems.iter().map(|e| e.name.clone()).collect()
    }

    fn known_package_managers(&self, ecosystem: &str) -> Vec<String> {
        self.ecosystem(ecosystem)
            .map(|e| e.package_managers.clone())
            .unwrap_or_default()
    }

    fn is_known(&self, identifier: &str) -> bool {
        self.definitions.contains_key(identifier) || self.is_mapped_anywhere(identifier)
    }

    fn provides(&self, identifier: &str) -> Vec<String> {
        self.definitions.get(identifier).cloned().unwrap_or_default()
    }

    fn ecosystem_for_package_manager(&self, package_manager: &str) -> Option<String> {
        self.ecosystems
            .iter()
            .find(|e| e.package_managers.iter().any(|pm| pm == package_manager))
            .map(|e| e.name.clone())
    }
}

fn invalid(location: &str, details: String) -> anyhow::Error {
    ExternalError::RegistryInvalid {
        location: location.to_string(),
        details,
    }
    .into()
}

/// Parses a dataset identifier into its lookup key
fn lookup_key(location: &str, id: &str) -> Result<String> {
    if id.trim().is_empty() {
        return Err(invalid(location, "empty identifier".to_string()));
    }
    DepUrl::parse(id)
        .map(|url| url.identifier())
        .map_err(|e| invalid(location, format!("invalid identifier '{}': {}", id, e)))
}

/// An identifier is an alias when it provides at least one non-virtual
/// identifier; it resolves, transitively, to its first non-virtual target.
fn resolve_aliases(
    location: &str,
    definitions: &HashMap<String, Vec<String>>,
) -> Result<HashMap<String, String>> {
    let mut aliases = HashMap::new();
    for id in definitions.keys() {
        let Some(mut current) = alias_target(definitions, id) else {
            continue;
        };
        let mut seen: HashSet<&str> = HashSet::from([id.as_str()]);
        while let Some(next) = alias_target(definitions, current) {
            if !seen.insert(current.as_str()) {
                return Err(invalid(location, format!("alias cycle involving '{}'", id)));
            }
            current = next;
        }
        if seen.contains(current.as_str()) {
            return Err(invalid(location, format!("alias cycle involving '{}'", id)));
        }
        aliases.insert(id.clone(), current.clone());
    }
    Ok(aliases)
}

fn alias_target<'a>(definitions: &'a HashMap<String, Vec<String>>, id: &str) -> Option<&'a String> {
    if is_virtual_identifier(id) {
        return None;
    }
    definitions
        .get(id)?
        .iter()
        .find(|target| !is_virtual_identifier(target))
}

fn build_ecosystem(
    name: &str,
    location: &str,
    document: &MappingDocument,
) -> Result<EcosystemMapping> {
    let mut package_managers = Vec::new();
    for manager in &document.package_managers {
        if manager.name.trim().is_empty() {
            return Err(invalid(location, "package manager with an empty name".to_string()));
        }
        if package_managers.contains(&manager.name) {
            return Err(invalid(
                location,
                format!("duplicate package manager '{}'", manager.name),
            ));
        }
        package_managers.push(manager.name.clone());
    }

    let mut entries: HashMap<String, &MappingEntry> = HashMap::new();
    for entry in &document.mappings {
        let id = lookup_key(location, &entry.id)?;
        if entries.insert(id.clone(), entry).is_some() {
            tracing::warn!(
                ecosystem = name,
                id = %id,
                "duplicate mapping entry, keeping the last one"
            );
        }
    }

    let mut specs = HashMap::with_capacity(entries.len());
    for id in entries.keys() {
        let table = resolve_specs(location, &entries, id, &mut Vec::new())?;
        specs.insert(id.clone(), table);
    }

    Ok(EcosystemMapping {
        name: name.to_string(),
        package_managers,
        specs,
    })
}

/// Follows `specs_from` until an entry with non-empty `specs` is found
fn resolve_specs(
    location: &str,
    entries: &HashMap<String, &MappingEntry>,
    id: &str,
    chain: &mut Vec<String>,
) -> Result<SpecsTable> {
    if chain.iter().any(|seen| seen == id) {
        return Err(invalid(
            location,
            format!("specs_from cycle: {} -> {}", chain.join(" -> "), id),
        ));
    }
    let Some(entry) = entries.get(id) else {
        return Err(invalid(
            location,
            format!(
                "'{}' takes specs_from '{}', which has no mapping",
                chain.last().map(String::as_str).unwrap_or_default(),
                id
            ),
        ));
    };

    match (&entry.specs, &entry.specs_from) {
        (Some(specs), _) if !specs.is_empty() => Ok(SpecsTable::from_value(specs)),
        (_, Some(source)) => {
            chain.push(id.to_string());
            let source = lookup_key(location, source)?;
            resolve_specs(location, entries, &source, chain)
        }
        _ => Ok(SpecsTable::default()),
    }
}
