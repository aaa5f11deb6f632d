use crate::external_metadata::domain::dep_url::is_virtual_identifier;
use crate::external_metadata::domain::{DepUrl, NormalizedDocument};
use crate::ports::outbound::MappingRegistry;
use serde::Serialize;
use std::fmt;

/// A declared identifier the registry would not take as written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ValidationWarning {
    /// Not a `dep:` URL at all
    InvalidIdentifier { raw_identifier: String, reason: String },
    /// A `dep:` URL the registry does not define or map
    Unrecognized { raw_identifier: String },
    /// A known alias; the canonical spelling should be used instead
    NonCanonical {
        raw_identifier: String,
        canonical: String,
        suggestions: Vec<String>,
    },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::InvalidIdentifier {
                raw_identifier,
                reason,
            } => write!(f, "'{}' is not a valid dep: identifier: {}", raw_identifier, reason),
            ValidationWarning::Unrecognized { raw_identifier } => {
                write!(f, "'{}' is not recognized in the registry", raw_identifier)
            }
            ValidationWarning::NonCanonical {
                raw_identifier,
                suggestions,
                ..
            } => write!(
                f,
                "'{}' is not a canonical identifier. Try with one of: {}",
                raw_identifier,
                suggestions.join(", ")
            ),
        }
    }
}

/// Validator service: checks declared identifiers against the registry
///
/// Only produces warnings; a document with warnings still maps.
pub struct Validator;

impl Validator {
    pub fn validate<R>(normalized: &NormalizedDocument, registry: &R) -> Vec<ValidationWarning>
    where
        R: MappingRegistry + ?Sized,
    {
        let mut warnings: Vec<ValidationWarning> = Vec::new();
        let mut checked: Vec<&str> = Vec::new();

        for requirement in normalized.document().requirements() {
            let raw = requirement.raw_identifier();
            if checked.contains(&raw) {
                continue;
            }
            checked.push(raw);

            if let Some(warning) = Self::check(raw, registry) {
                warnings.push(warning);
            }
        }
        warnings
    }

    fn check<R>(raw: &str, registry: &R) -> Option<ValidationWarning>
    where
        R: MappingRegistry + ?Sized,
    {
        let url = match DepUrl::parse(raw) {
            Ok(url) => url,
            Err(e) => {
                return Some(ValidationWarning::InvalidIdentifier {
                    raw_identifier: raw.to_string(),
                    reason: e.to_string(),
                })
            }
        };

        let key = url.identifier();
        if !registry.is_known(&key) {
            return Some(ValidationWarning::Unrecognized {
                raw_identifier: raw.to_string(),
            });
        }

        let canonical = registry.lookup_alias(&key)?;
        if canonical == key {
            return None;
        }

        let suggestions = registry
            .provides(&key)
            .into_iter()
            .filter(|target| !is_virtual_identifier(target))
            .collect();
        Some(ValidationWarning::NonCanonical {
            raw_identifier: raw.to_string(),
            canonical,
            suggestions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::registry::test_fixtures::sample_registry;
    use crate::external_metadata::domain::{ExternalMetadataDocument, ExternalRequirement, Purpose};
    use crate::external_metadata::services::Normalizer;

    fn validate(decls: &[&str]) -> Vec<ValidationWarning> {
        let registry = sample_registry();
        let doc = decls.iter().fold(ExternalMetadataDocument::new(), |doc, decl| {
            doc.with_requirement(ExternalRequirement::parse(Purpose::Build, None, decl).unwrap())
        });
        Validator::validate(&Normalizer::normalize(&doc, &registry), &registry)
    }

    #[test]
    fn test_canonical_identifiers_pass() {
        assert!(validate(&["dep:generic/cmake", "dep:virtual/compiler/c", "dep:generic/gcc"]).is_empty());
    }

    #[test]
    fn test_unrecognized_identifier() {
        assert_eq!(
            validate(&["dep:generic/frobnicator"]),
            vec![ValidationWarning::Unrecognized {
                raw_identifier: "dep:generic/frobnicator".to_string()
            }]
        );
    }

    #[test]
    fn test_alias_suggests_canonical() {
        let warnings = validate(&["dep:generic/libssl@>=3"]);
        assert_eq!(
            warnings,
            vec![ValidationWarning::NonCanonical {
                raw_identifier: "dep:generic/libssl".to_string(),
                canonical: "dep:generic/openssl".to_string(),
                suggestions: vec!["dep:generic/openssl".to_string()],
            }]
        );
        assert!(warnings[0].to_string().contains("Try with one of: dep:generic/openssl"));
    }

    #[test]
    fn test_invalid_identifier() {
        let warnings = validate(&["openssl"]);
        assert!(matches!(
            warnings[0],
            ValidationWarning::InvalidIdentifier { .. }
        ));
    }

    #[test]
    fn test_repeated_identifier_warns_once() {
        assert_eq!(validate(&["dep:generic/nope", "dep:generic/nope"]).len(), 1);
    }
}
