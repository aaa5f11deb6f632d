use super::purpose::Purpose;
use super::requirement::ExternalRequirement;
use serde::Serialize;

/// A provider package chosen for one requirement.
///
/// `args` are the command-line arguments that install it: usually just the
/// name, or the name with a translated version constraint. Some package
/// managers take one argument per constraint clause.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ProviderSpec {
    pub name: String,
    pub args: Vec<String>,
}

impl ProviderSpec {
    pub fn name_only(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            args: vec![name.clone()],
            name,
        }
    }
}

/// Why a requirement has no provider for the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnmappedReason {
    /// The registry knows the identifier but has nothing for this package manager
    NoMappingForTarget,
    /// Normalization could not resolve the identifier
    UnrecognizedIdentifier,
}

impl std::fmt::Display for UnmappedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnmappedReason::NoMappingForTarget => write!(f, "no mapping for target"),
            UnmappedReason::UnrecognizedIdentifier => write!(f, "unrecognized identifier"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum MappingOutcome {
    /// `duplicates` lists provider names already emitted earlier in the same group
    Mapped {
        packages: Vec<ProviderSpec>,
        duplicates: Vec<String>,
    },
    Unmapped { reason: UnmappedReason },
}

impl MappingOutcome {
    pub fn is_mapped(&self) -> bool {
        matches!(self, MappingOutcome::Mapped { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappedRequirement {
    pub requirement: ExternalRequirement,
    #[serde(flatten)]
    pub outcome: MappingOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappedGroup {
    pub purpose: Purpose,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional_group: Option<String>,
    pub entries: Vec<MappedRequirement>,
}

impl MappedGroup {
    pub fn label(&self) -> String {
        match &self.optional_group {
            Some(group) => format!("{}.{}", self.purpose.table_key(), group),
            None => self.purpose.table_key().to_string(),
        }
    }
}

/// A version constraint that could not be carried over to the target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationWarning {
    pub raw_identifier: String,
    pub constraint: String,
    pub package_manager: String,
    pub reason: String,
}

impl std::fmt::Display for TranslationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Dropped constraint '{}' of {} for {}: {}",
            self.constraint, self.raw_identifier, self.package_manager, self.reason
        )
    }
}

/// Mapping of one normalized document onto one (ecosystem, package manager) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingResult {
    ecosystem: String,
    package_manager: String,
    groups: Vec<MappedGroup>,
    warnings: Vec<TranslationWarning>,
}

impl MappingResult {
    pub fn new(
        ecosystem: String,
        package_manager: String,
        groups: Vec<MappedGroup>,
        warnings: Vec<TranslationWarning>,
    ) -> Self {
        Self {
            ecosystem,
            package_manager,
            groups,
            warnings,
        }
    }

    pub fn ecosystem(&self) -> &str {
        &self.ecosystem
    }

    pub fn package_manager(&self) -> &str {
        &self.package_manager
    }

    pub fn groups(&self) -> &[MappedGroup] {
        &self.groups
    }

    pub fn warnings(&self) -> &[TranslationWarning] {
        &self.warnings
    }

    pub fn entries(&self) -> impl Iterator<Item = &MappedRequirement> {
        self.groups.iter().flat_map(|g| g.entries.iter())
    }

    pub fn mapped_count(&self) -> usize {
        self.entries().filter(|e| e.outcome.is_mapped()).count()
    }

    pub fn unmapped_count(&self) -> usize {
        self.entries().filter(|e| !e.outcome.is_mapped()).count()
    }

    /// Unmapped entries outside optional groups
    pub fn unmapped_required(&self) -> usize {
        self.entries()
            .filter(|e| !e.outcome.is_mapped() && !e.requirement.purpose().is_optional())
            .count()
    }

    pub fn unmapped(&self) -> impl Iterator<Item = (&ExternalRequirement, UnmappedReason)> {
        self.entries().filter_map(|e| match &e.outcome {
            MappingOutcome::Unmapped { reason } => Some((&e.requirement, *reason)),
            MappingOutcome::Mapped { .. } => None,
        })
    }

    /// Every emitted provider, in group order
    pub fn providers(&self) -> impl Iterator<Item = &ProviderSpec> {
        self.entries().flat_map(|e| match &e.outcome {
            MappingOutcome::Mapped { packages, .. } => packages.iter(),
            MappingOutcome::Unmapped { .. } => [].iter(),
        })
    }
}
