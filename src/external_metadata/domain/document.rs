use super::purpose::Purpose;
use super::requirement::ExternalRequirement;
use crate::shared::error::MalformedConstraint;
use serde::Serialize;

/// Borrowed view of one requirement group, in document order
#[derive(Debug, Clone, Copy)]
pub struct RequirementGroup<'a> {
    pub purpose: Purpose,
    pub optional_group: Option<&'a str>,
    pub requirements: &'a [ExternalRequirement],
}

impl RequirementGroup<'_> {
    /// `build-requires`, or `optional-dependencies.<group>`
    pub fn label(&self) -> String {
        match self.optional_group {
            Some(group) => format!("{}.{}", self.purpose.table_key(), group),
            None => self.purpose.table_key().to_string(),
        }
    }
}

/// The `[external]` table of one project.
///
/// Built once from the parsed table and never changed afterwards; the
/// builder methods consume `self`. Duplicates are kept as declared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExternalMetadataDocument {
    build_requires: Vec<ExternalRequirement>,
    host_requires: Vec<ExternalRequirement>,
    dependencies: Vec<ExternalRequirement>,
    optional_dependencies: Vec<(String, Vec<ExternalRequirement>)>,
    #[serde(skip)]
    unknown_keys: Vec<String>,
}

impl ExternalMetadataDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a requirement to the group its purpose (and optional group) names.
    pub fn with_requirement(mut self, requirement: ExternalRequirement) -> Self {
        match requirement.purpose() {
            Purpose::Build => self.build_requires.push(requirement),
            Purpose::Host => self.host_requires.push(requirement),
            Purpose::Dependency => self.dependencies.push(requirement),
            Purpose::Optional => {
                let group = requirement.optional_group().unwrap_or_default().to_string();
                self.optional_group_mut(&group).push(requirement);
            }
        }
        self
    }

    /// Declares an optional group, so that an empty one is kept in order.
    pub fn with_optional_group(mut self, group: &str) -> Self {
        self.optional_group_mut(group);
        self
    }

    /// Records a key of the `[external]` table that is not a requirement group.
    pub fn with_unknown_key(mut self, key: impl Into<String>) -> Self {
        self.unknown_keys.push(key.into());
        self
    }

    fn optional_group_mut(&mut self, group: &str) -> &mut Vec<ExternalRequirement> {
        let index = match self.optional_dependencies.iter().position(|(name, _)| name == group) {
            Some(index) => index,
            None => {
                self.optional_dependencies.push((group.to_string(), Vec::new()));
                self.optional_dependencies.len() - 1
            }
        };
        &mut self.optional_dependencies[index].1
    }

    pub fn build_requires(&self) -> &[ExternalRequirement] {
        &self.build_requires
    }

    pub fn host_requires(&self) -> &[ExternalRequirement] {
        &self.host_requires
    }

    pub fn dependencies(&self) -> &[ExternalRequirement] {
        &self.dependencies
    }

    pub fn optional_dependencies(&self) -> &[(String, Vec<ExternalRequirement>)] {
        &self.optional_dependencies
    }

    pub fn unknown_keys(&self) -> &[String] {
        &self.unknown_keys
    }

    /// All groups in installation order: build, host, runtime, then optional
    /// groups as declared. Empty fixed groups are skipped.
    pub fn groups(&self) -> Vec<RequirementGroup<'_>> {
        let fixed = [
            (Purpose::Build, &self.build_requires),
            (Purpose::Host, &self.host_requires),
            (Purpose::Dependency, &self.dependencies),
        ];

        let mut groups: Vec<RequirementGroup<'_>> = fixed
            .into_iter()
            .filter(|(_, reqs)| !reqs.is_empty())
            .map(|(purpose, reqs)| RequirementGroup {
                purpose,
                optional_group: None,
                requirements: reqs.as_slice(),
            })
            .collect();

        groups.extend(
            self.optional_dependencies
                .iter()
                .map(|(name, reqs)| RequirementGroup {
                    purpose: Purpose::Optional,
                    optional_group: Some(name.as_str()),
                    requirements: reqs.as_slice(),
                }),
        );
        groups
    }

    /// Every requirement, in group order
    pub fn requirements(&self) -> impl Iterator<Item = &ExternalRequirement> {
        self.build_requires
            .iter()
            .chain(self.host_requires.iter())
            .chain(self.dependencies.iter())
            .chain(self.optional_dependencies.iter().flat_map(|(_, reqs)| reqs.iter()))
    }

    pub fn requirement_count(&self) -> usize {
        self.requirements().count()
    }

    pub fn is_empty(&self) -> bool {
        self.requirement_count() == 0
    }

    /// A new document that only keeps the given purpose groups
    pub fn restrict_to(&self, purposes: &[Purpose]) -> Self {
        let keep = |purpose: Purpose| purposes.contains(&purpose);
        Self {
            build_requires: if keep(Purpose::Build) { self.build_requires.clone() } else { Vec::new() },
            host_requires: if keep(Purpose::Host) { self.host_requires.clone() } else { Vec::new() },
            dependencies: if keep(Purpose::Dependency) { self.dependencies.clone() } else { Vec::new() },
            optional_dependencies: if keep(Purpose::Optional) {
                self.optional_dependencies.clone()
            } else {
                Vec::new()
            },
            unknown_keys: self.unknown_keys.clone(),
        }
    }

    /// A new document with every requirement replaced by `f(requirement)`,
    /// keeping group membership and order.
    pub(crate) fn map_requirements<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&ExternalRequirement) -> ExternalRequirement,
    {
        let mut map_all = |reqs: &[ExternalRequirement]| reqs.iter().map(&mut f).collect::<Vec<_>>();
        let build_requires = map_all(&self.build_requires);
        let host_requires = map_all(&self.host_requires);
        let dependencies = map_all(&self.dependencies);
        let optional_dependencies = self
            .optional_dependencies
            .iter()
            .map(|(name, reqs)| (name.clone(), map_all(reqs)))
            .collect();

        Self {
            build_requires,
            host_requires,
            dependencies,
            optional_dependencies,
            unknown_keys: self.unknown_keys.clone(),
        }
    }
}

/// Result of normalization: a new document whose requirements carry
/// canonical identifiers where one could be resolved, plus every malformed
/// version constraint that was found on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDocument {
    document: ExternalMetadataDocument,
    issues: Vec<MalformedConstraint>,
}

impl NormalizedDocument {
    pub(crate) fn new(document: ExternalMetadataDocument, issues: Vec<MalformedConstraint>) -> Self {
        Self { document, issues }
    }

    pub fn document(&self) -> &ExternalMetadataDocument {
        &self.document
    }

    pub fn issues(&self) -> &[MalformedConstraint] {
        &self.issues
    }

    /// Requirements that normalization could not resolve
    pub fn unresolved(&self) -> impl Iterator<Item = &ExternalRequirement> {
        self.document.requirements().filter(|r| !r.is_normalized())
    }

    pub fn into_document(self) -> ExternalMetadataDocument {
        self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(purpose: Purpose, group: Option<&str>, decl: &str) -> ExternalRequirement {
        ExternalRequirement::parse(purpose, group, decl).unwrap()
    }

    fn sample() -> ExternalMetadataDocument {
        ExternalMetadataDocument::new()
            .with_requirement(req(Purpose::Dependency, None, "dep:generic/libpng"))
            .with_requirement(req(Purpose::Optional, Some("gui"), "dep:generic/qt"))
            .with_requirement(req(Purpose::Build, None, "dep:generic/cmake"))
            .with_requirement(req(Purpose::Optional, Some("extra"), "dep:generic/zstd"))
            .with_requirement(req(Purpose::Build, None, "dep:generic/cmake"))
            .with_requirement(req(Purpose::Optional, Some("gui"), "dep:generic/gtk"))
    }

    #[test]
    fn test_groups_in_installation_order() {
        let doc = sample();
        let labels: Vec<String> = doc.groups().iter().map(|g| g.label()).collect();
        assert_eq!(
            labels,
            vec![
                "build-requires",
                "dependencies",
                "optional-dependencies.gui",
                "optional-dependencies.extra"
            ]
        );
    }

    #[test]
    fn test_duplicates_are_preserved() {
        let doc = sample();
        assert_eq!(doc.build_requires().len(), 2);
        assert_eq!(doc.requirement_count(), 6);
    }

    #[test]
    fn test_optional_groups_keep_declared_order() {
        let doc = sample();
        let gui = &doc.optional_dependencies()[0];
        assert_eq!(gui.0, "gui");
        let names: Vec<&str> = gui.1.iter().map(|r| r.raw_identifier()).collect();
        assert_eq!(names, vec!["dep:generic/qt", "dep:generic/gtk"]);
    }

    #[test]
    fn test_empty_optional_group_is_kept() {
        let doc = ExternalMetadataDocument::new().with_optional_group("docs");
        assert_eq!(doc.groups().len(), 1);
        assert!(doc.is_empty());
    }

    #[test]
    fn test_restrict_to() {
        let doc = sample().with_unknown_key("notes");
        let restricted = doc.restrict_to(&[Purpose::Build]);
        assert_eq!(restricted.requirement_count(), 2);
        assert!(restricted.optional_dependencies().is_empty());
        assert_eq!(restricted.unknown_keys(), ["notes".to_string()]);
        // the original is untouched
        assert_eq!(doc.requirement_count(), 6);
    }

    #[test]
    fn test_map_requirements_returns_new_document() {
        let doc = sample();
        let mapped = doc.map_requirements(|r| r.with_canonical(Some(r.raw_identifier().to_string())));
        assert!(mapped.requirements().all(|r| r.is_normalized()));
        assert!(doc.requirements().all(|r| !r.is_normalized()));
        assert_eq!(mapped.groups().len(), doc.groups().len());
    }
}
