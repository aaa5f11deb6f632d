use crate::external_metadata::domain::{
    DepUrl, ExternalMetadataDocument, NormalizedDocument, VersionConstraint,
};
use crate::ports::outbound::MappingRegistry;
use crate::shared::error::MalformedConstraint;

/// Normalizer service: resolves raw identifiers to canonical ones
///
/// Unresolvable identifiers are kept with no canonical identifier; that is
/// a result state, not an error. Requirements that already carry a
/// canonical identifier pass through untouched, so normalizing twice gives
/// the same document.
pub struct Normalizer;

impl Normalizer {
    pub fn normalize<R>(document: &ExternalMetadataDocument, registry: &R) -> NormalizedDocument
    where
        R: MappingRegistry + ?Sized,
    {
        let mut issues = Vec::new();

        let normalized = document.map_requirements(|requirement| {
            if let Some(constraint) = requirement.version_constraint() {
                if let Err(reason) = constraint.parse::<VersionConstraint>() {
                    issues.push(MalformedConstraint {
                        raw_identifier: requirement.raw_identifier().to_string(),
                        constraint: constraint.to_string(),
                        reason,
                    });
                }
            }

            if requirement.is_normalized() {
                return requirement.clone();
            }

            let canonical = Self::canonicalize(requirement.raw_identifier(), registry);
            if canonical.is_none() {
                tracing::debug!(
                    identifier = requirement.raw_identifier(),
                    "identifier not resolved by the registry"
                );
            }
            requirement.with_canonical(canonical)
        });

        NormalizedDocument::new(normalized, issues)
    }

    /// Canonical identifier for a raw `dep:` identifier, if the registry knows it
    pub fn canonicalize<R>(raw_identifier: &str, registry: &R) -> Option<String>
    where
        R: MappingRegistry + ?Sized,
    {
        let url = DepUrl::parse(raw_identifier).ok()?;
        registry.lookup_alias(&url.identifier())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::registry::test_fixtures::sample_registry;
    use crate::external_metadata::domain::{ExternalRequirement, Purpose};

    fn document(decls: &[(Purpose, Option<&str>, &str)]) -> ExternalMetadataDocument {
        decls
            .iter()
            .fold(ExternalMetadataDocument::new(), |doc, (purpose, group, decl)| {
                doc.with_requirement(ExternalRequirement::parse(*purpose, *group, decl).unwrap())
            })
    }

    fn canonical(doc: &NormalizedDocument) -> Vec<Option<&str>> {
        doc.document()
            .requirements()
            .map(|r| r.canonical_identifier())
            .collect()
    }

    #[test]
    fn test_resolves_canonical_and_alias() {
        let doc = document(&[
            (Purpose::Build, None, "dep:generic/cmake@>=3.20"),
            (Purpose::Host, None, "dep:generic/libssl"),
            (Purpose::Build, None, "dep:virtual/Compiler/C"),
        ]);
        let normalized = Normalizer::normalize(&doc, &sample_registry());

        assert_eq!(
            canonical(&normalized),
            vec![
                Some("dep:generic/cmake"),
                Some("dep:virtual/compiler/c"),
                Some("dep:generic/openssl"),
            ]
        );
        assert!(normalized.issues().is_empty());
        // raw identifiers are untouched
        assert_eq!(
            normalized.document().host_requires()[0].raw_identifier(),
            "dep:generic/libssl"
        );
    }

    #[test]
    fn test_qualifiers_do_not_change_lookup() {
        let doc = document(&[(Purpose::Build, None, "dep:generic/zlib?arch=x86_64#lib")]);
        let normalized = Normalizer::normalize(&doc, &sample_registry());
        assert_eq!(canonical(&normalized), vec![Some("dep:generic/zlib")]);
    }

    #[test]
    fn test_unresolved_is_not_an_error() {
        let doc = document(&[
            (Purpose::Dependency, None, "dep:generic/frobnicator"),
            (Purpose::Dependency, None, "not-a-dep-url"),
            (Purpose::Dependency, None, "dep:generic/libpng"),
        ]);
        let normalized = Normalizer::normalize(&doc, &sample_registry());

        assert_eq!(
            canonical(&normalized),
            vec![None, None, Some("dep:generic/libpng")]
        );
        assert_eq!(normalized.unresolved().count(), 2);
    }

    #[test]
    fn test_idempotent() {
        let registry = sample_registry();
        let doc = document(&[
            (Purpose::Build, None, "dep:generic/gcc"),
            (Purpose::Host, None, "dep:generic/libssl@>=3"),
            (Purpose::Optional, Some("gui"), "dep:generic/qt"),
            (Purpose::Dependency, None, "dep:generic/unknown"),
        ]);

        let once = Normalizer::normalize(&doc, &registry);
        let twice = Normalizer::normalize(once.document(), &registry);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_preserves_order_and_groups() {
        let doc = document(&[
            (Purpose::Optional, Some("gui"), "dep:generic/qt"),
            (Purpose::Build, None, "dep:generic/ninja"),
            (Purpose::Build, None, "dep:generic/cmake"),
            (Purpose::Build, None, "dep:generic/ninja"),
        ]);
        let normalized = Normalizer::normalize(&doc, &sample_registry());

        let raw: Vec<&str> = normalized
            .document()
            .requirements()
            .map(|r| r.raw_identifier())
            .collect();
        assert_eq!(
            raw,
            vec![
                "dep:generic/ninja",
                "dep:generic/cmake",
                "dep:generic/ninja",
                "dep:generic/qt"
            ]
        );
    }

    #[test]
    fn test_malformed_constraint_is_recorded() {
        let doc = document(&[
            (Purpose::Build, None, "dep:generic/cmake@>=,<4"),
            (Purpose::Build, None, "dep:generic/ninja"),
        ]);
        let normalized = Normalizer::normalize(&doc, &sample_registry());

        assert_eq!(normalized.issues().len(), 1);
        let issue = &normalized.issues()[0];
        assert_eq!(issue.raw_identifier, "dep:generic/cmake");
        assert_eq!(issue.constraint, ">=,<4");
        // the rest of the document is still normalized
        assert_eq!(
            canonical(&normalized),
            vec![Some("dep:generic/cmake"), Some("dep:generic/ninja")]
        );
    }
}
