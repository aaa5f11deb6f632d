use crate::external_metadata::domain::{
    ExternalRequirement, MappedGroup, MappedRequirement, MappingOutcome, MappingResult,
    NormalizedDocument, ProviderSpec, Purpose, SpecsKind, TranslationWarning, UnmappedReason,
    VersionConstraint,
};
use crate::external_metadata::policies::ConstraintTranslation;
use crate::ports::outbound::MappingRegistry;
use crate::shared::error::ExternalError;
use crate::shared::Result;
use std::collections::HashSet;

/// Mapper service: maps a normalized document onto one target
///
/// Each requirement is looked up with the use that matches its group
/// (build, host or run). Provider names already emitted earlier in the same
/// group are recorded as duplicates instead of being emitted again; there is
/// no deduplication across groups.
///
/// A compiler in the build group also pulls in the build packages of
/// `dep:generic/python` (the distribution's Python headers), attached to the
/// first mapped compiler entry.
pub struct Mapper;

const PYTHON: &str = "dep:generic/python";
const COMPILERS: [&str; 4] = [
    "dep:virtual/compiler/c",
    "dep:virtual/compiler/c++",
    "dep:virtual/compiler/cxx",
    "dep:virtual/compiler/cpp",
];

struct Target<'a> {
    ecosystem: &'a str,
    package_manager: &'a str,
}

impl Mapper {
    /// # Errors
    /// `UnknownEcosystem` when the registry has no mapping for `ecosystem`,
    /// `UnknownPackageManager` when the ecosystem does not list `package_manager`.
    pub fn map<R>(
        normalized: &NormalizedDocument,
        ecosystem: &str,
        package_manager: &str,
        registry: &R,
    ) -> Result<MappingResult>
    where
        R: MappingRegistry + ?Sized,
    {
        Self::check_target(ecosystem, package_manager, registry)?;
        let target = Target {
            ecosystem,
            package_manager,
        };

        let mut warnings = Vec::new();
        let groups = normalized
            .document()
            .groups()
            .into_iter()
            .map(|group| {
                let mut seen: HashSet<String> = HashSet::new();
                let mut needs_python_dev = group.purpose == Purpose::Build;
                let entries = group
                    .requirements
                    .iter()
                    .map(|requirement| {
                        let mut outcome = Self::map_requirement(
                            requirement,
                            &target,
                            registry,
                            &mut seen,
                            &mut warnings,
                        );
                        if needs_python_dev && is_compiler(requirement) {
                            if let MappingOutcome::Mapped {
                                packages,
                                duplicates,
                            } = &mut outcome
                            {
                                needs_python_dev = false;
                                Self::add_python_dev(
                                    packages, duplicates, &target, registry, &mut seen,
                                );
                            }
                        }
                        MappedRequirement {
                            requirement: requirement.clone(),
                            outcome,
                        }
                    })
                    .collect();

                MappedGroup {
                    purpose: group.purpose,
                    optional_group: group.optional_group.map(str::to_string),
                    entries,
                }
            })
            .collect();

        Ok(MappingResult::new(
            ecosystem.to_string(),
            package_manager.to_string(),
            groups,
            warnings,
        ))
    }

    fn check_target<R>(ecosystem: &str, package_manager: &str, registry: &R) -> Result<()>
    where
        R: MappingRegistry + ?Sized,
    {
        let ecosystems = registry.known_ecosystems();
        if !ecosystems.contains(ecosystem) {
            return Err(ExternalError::UnknownEcosystem {
                ecosystem: ecosystem.to_string(),
                known: ecosystems.into_iter().collect::<Vec<_>>().join(", "),
            }
            .into());
        }

        let managers = registry.known_package_managers(ecosystem);
        if !managers.iter().any(|pm| pm == package_manager) {
            return Err(ExternalError::UnknownPackageManager {
                package_manager: package_manager.to_string(),
                ecosystem: ecosystem.to_string(),
                known: managers.join(", "),
            }
            .into());
        }
        Ok(())
    }

    /// Only adds what the registry maps for the target; nothing otherwise
    fn add_python_dev<R>(
        packages: &mut Vec<ProviderSpec>,
        duplicates: &mut Vec<String>,
        target: &Target<'_>,
        registry: &R,
        seen: &mut HashSet<String>,
    ) where
        R: MappingRegistry + ?Sized,
    {
        let names = registry.lookup_package_for(
            PYTHON,
            target.ecosystem,
            target.package_manager,
            SpecsKind::Build,
        );
        for name in names {
            if seen.insert(name.clone()) {
                packages.push(ProviderSpec::name_only(name));
            } else {
                duplicates.push(name);
            }
        }
    }

    fn map_requirement<R>(
        requirement: &ExternalRequirement,
        target: &Target<'_>,
        registry: &R,
        seen: &mut HashSet<String>,
        warnings: &mut Vec<TranslationWarning>,
    ) -> MappingOutcome
    where
        R: MappingRegistry + ?Sized,
    {
        let Some(canonical) = requirement.canonical_identifier() else {
            return MappingOutcome::Unmapped {
                reason: UnmappedReason::UnrecognizedIdentifier,
            };
        };

        let names = registry.lookup_package_for(
            canonical,
            target.ecosystem,
            target.package_manager,
            requirement.purpose().specs_kind(),
        );
        if names.is_empty() {
            tracing::debug!(
                identifier = canonical,
                ecosystem = target.ecosystem,
                package_manager = target.package_manager,
                "no mapping for target"
            );
            return MappingOutcome::Unmapped {
                reason: UnmappedReason::NoMappingForTarget,
            };
        }

        let mut dropped: Option<String> = None;
        let constraint = match requirement.version_constraint() {
            Some(text) => match text.parse::<VersionConstraint>() {
                Ok(constraint) => Some(constraint),
                Err(reason) => {
                    dropped = Some(format!("malformed constraint: {}", reason));
                    None
                }
            },
            None => None,
        };

        let mut packages = Vec::new();
        let mut duplicates = Vec::new();
        for name in names {
            if !seen.insert(name.clone()) {
                duplicates.push(name);
                continue;
            }
            let args = match ConstraintTranslation::translate(
                target.package_manager,
                &name,
                constraint.as_ref(),
            ) {
                Ok(args) => args,
                Err(reason) => {
                    dropped.get_or_insert(reason);
                    vec![name.clone()]
                }
            };
            packages.push(ProviderSpec { name, args });
        }

        if let (Some(reason), Some(text)) = (dropped, requirement.version_constraint()) {
            warnings.push(TranslationWarning {
                raw_identifier: requirement.raw_identifier().to_string(),
                constraint: text.to_string(),
                package_manager: target.package_manager.to_string(),
                reason,
            });
        }

        MappingOutcome::Mapped {
            packages,
            duplicates,
        }
    }
}

fn is_compiler(requirement: &ExternalRequirement) -> bool {
    requirement
        .canonical_identifier()
        .is_some_and(|id| COMPILERS.contains(&id))
}
