use super::purpose::Purpose;
use crate::shared::Result;
use serde::Serialize;

/// Longer declarations are kept whole instead of being split
const MAX_DECLARATION_LENGTH: usize = 2048;

/// One declared external dependency.
///
/// `raw_identifier` and `declaration` are fixed at parse time. The canonical
/// identifier starts unset and is only filled in by normalization, which
/// produces a new value rather than touching this one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ExternalRequirement {
    purpose: Purpose,
    raw_identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    canonical_identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version_constraint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    optional_group: Option<String>,
    #[serde(skip)]
    declaration: String,
}

impl ExternalRequirement {
    /// Parses a declaration such as `dep:generic/openssl@>=3` into a requirement.
    ///
    /// The text after the first `@` of the identifier part is the version
    /// constraint; qualifiers (`?...`) and a subpath (`#...`) stay attached to
    /// the identifier. The constraint is kept verbatim and only checked during
    /// normalization.
    ///
    /// Empty and oversized declarations are kept whole as the raw identifier
    /// with no constraint; normalization leaves them unresolved.
    ///
    /// # Errors
    /// Returns an error when an optional group is given for a non-optional
    /// purpose or missing for an optional one.
    pub fn parse(purpose: Purpose, optional_group: Option<&str>, declaration: &str) -> Result<Self> {
        let declaration = declaration.trim();

        let optional_group = match (purpose.is_optional(), optional_group) {
            (true, Some(group)) if !group.trim().is_empty() => Some(group.trim().to_string()),
            (true, _) => anyhow::bail!("Optional requirement '{}' needs a group name", declaration),
            (false, None) => None,
            (false, Some(group)) => anyhow::bail!(
                "Requirement '{}' in '{}' cannot belong to optional group '{}'",
                declaration,
                purpose,
                group
            ),
        };

        let (raw_identifier, version_constraint) = if declaration.len() > MAX_DECLARATION_LENGTH {
            tracing::debug!(
                length = declaration.len(),
                max = MAX_DECLARATION_LENGTH,
                "declaration too long to split"
            );
            (declaration.to_string(), None)
        } else {
            split_constraint(declaration)
        };

        Ok(Self {
            purpose,
            raw_identifier,
            canonical_identifier: None,
            version_constraint,
            optional_group,
            declaration: declaration.to_string(),
        })
    }

    pub fn purpose(&self) -> Purpose {
        self.purpose
    }

    pub fn raw_identifier(&self) -> &str {
        &self.raw_identifier
    }

    pub fn canonical_identifier(&self) -> Option<&str> {
        self.canonical_identifier.as_deref()
    }

    pub fn version_constraint(&self) -> Option<&str> {
        self.version_constraint.as_deref()
    }

    pub fn optional_group(&self) -> Option<&str> {
        self.optional_group.as_deref()
    }

    /// The string exactly as it was declared
    pub fn declaration(&self) -> &str {
        &self.declaration
    }

    pub fn is_normalized(&self) -> bool {
        self.canonical_identifier.is_some()
    }

    /// The identifier in canonical form with the declared constraint, as
    /// written back into a normalized `[external]` table.
    pub fn normalized_declaration(&self) -> String {
        let identifier = self
            .canonical_identifier
            .as_deref()
            .unwrap_or(&self.raw_identifier);
        match &self.version_constraint {
            Some(constraint) => format!("{}@{}", identifier, constraint),
            None => identifier.to_string(),
        }
    }

    /// Copy of this requirement carrying a resolved identifier.
    pub(crate) fn with_canonical(&self, canonical_identifier: Option<String>) -> Self {
        Self {
            canonical_identifier,
            ..self.clone()
        }
    }
}

impl std::fmt::Display for ExternalRequirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.declaration)
    }
}

/// Splits `id@constraint?q=v#sub` into `id?q=v#sub` and `constraint`.
fn split_constraint(declaration: &str) -> (String, Option<String>) {
    let (head, subpath) = match declaration.split_once('#') {
        Some((head, sub)) => (head, Some(sub)),
        None => (declaration, None),
    };
    let (head, query) = match head.split_once('?') {
        Some((head, query)) => (head, Some(query)),
        None => (head, None),
    };
    let (identifier, constraint) = match head.split_once('@') {
        Some((id, constraint)) => (id.trim(), Some(constraint.trim().to_string())),
        None => (head.trim(), None),
    };

    let mut raw_identifier = identifier.to_string();
    if let Some(query) = query {
        raw_identifier.push('?');
        raw_identifier.push_str(query);
    }
    if let Some(subpath) = subpath {
        raw_identifier.push('#');
        raw_identifier.push_str(subpath);
    }
    (raw_identifier, constraint)
}
