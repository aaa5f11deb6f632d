use crate::external_metadata::domain::{Operator, VersionConstraint};

/// How a package manager spells version ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSyntax {
    /// Template with `{name}` and `{ranges}`
    pub syntax: &'static str,
    /// Operator spellings; operators missing here cannot be translated
    pub operators: &'static [(Operator, &'static str)],
    /// Joiner for multiple clauses. `None` explodes them into one argument per clause.
    pub joiner: Option<&'static str>,
}

/// Version specifier syntax of one package manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecifierSyntax {
    /// Template with `{name}` and `{version}` for a pinned version
    pub exact_version: Option<&'static str>,
    pub version_ranges: Option<RangeSyntax>,
}

const PEP440_OPERATORS: &[(Operator, &str)] = &[
    (Operator::Equal, "=="),
    (Operator::NotEqual, "!="),
    (Operator::LessThan, "<"),
    (Operator::LessThanEqual, "<="),
    (Operator::GreaterThan, ">"),
    (Operator::GreaterThanEqual, ">="),
];

const RPM_STYLE_OPERATORS: &[(Operator, &str)] = &[
    (Operator::Equal, "="),
    (Operator::LessThan, "<"),
    (Operator::LessThanEqual, "<="),
    (Operator::GreaterThan, ">"),
    (Operator::GreaterThanEqual, ">="),
];

const CONDA_SYNTAX: SpecifierSyntax = SpecifierSyntax {
    exact_version: Some("{name}=={version}"),
    version_ranges: Some(RangeSyntax {
        syntax: "{name}{ranges}",
        operators: PEP440_OPERATORS,
        joiner: Some(","),
    }),
};

const EXPLODED_SYNTAX: SpecifierSyntax = SpecifierSyntax {
    exact_version: Some("{name}={version}"),
    version_ranges: Some(RangeSyntax {
        syntax: "{name}{ranges}",
        operators: RPM_STYLE_OPERATORS,
        joiner: None,
    }),
};

const NAME_ONLY_SYNTAX: SpecifierSyntax = SpecifierSyntax {
    exact_version: None,
    version_ranges: None,
};

const SYNTAXES: &[(&str, SpecifierSyntax)] = &[
    ("conda", CONDA_SYNTAX),
    ("mamba", CONDA_SYNTAX),
    ("micromamba", CONDA_SYNTAX),
    ("pixi", CONDA_SYNTAX),
    (
        "apt",
        SpecifierSyntax {
            exact_version: Some("{name}={version}"),
            version_ranges: None,
        },
    ),
    (
        "dnf",
        SpecifierSyntax {
            exact_version: Some("{name}-{version}"),
            version_ranges: None,
        },
    ),
    (
        "yum",
        SpecifierSyntax {
            exact_version: Some("{name}-{version}"),
            version_ranges: None,
        },
    ),
    ("zypper", EXPLODED_SYNTAX),
    ("apk", EXPLODED_SYNTAX),
    ("brew", NAME_ONLY_SYNTAX),
    ("pacman", NAME_ONLY_SYNTAX),
    ("vcpkg", NAME_ONLY_SYNTAX),
];

/// ConstraintTranslation policy: renders a provider name plus an
/// ecosystem-agnostic constraint in the syntax of one package manager.
pub struct ConstraintTranslation;

impl ConstraintTranslation {
    /// Specifier syntax of a package manager; unknown managers only take names
    pub fn syntax_for(package_manager: &str) -> &'static SpecifierSyntax {
        SYNTAXES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(package_manager))
            .map(|(_, syntax)| syntax)
            .unwrap_or(&NAME_ONLY_SYNTAX)
    }

    /// Command-line arguments installing `name` under `constraint`.
    ///
    /// # Errors
    /// Returns the reason when the constraint cannot be expressed for this
    /// package manager. Callers fall back to the bare name.
    pub fn translate(
        package_manager: &str,
        name: &str,
        constraint: Option<&VersionConstraint>,
    ) -> Result<Vec<String>, String> {
        let Some(constraint) = constraint else {
            return Ok(vec![name.to_string()]);
        };
        let syntax = Self::syntax_for(package_manager);

        if let (Some(template), Some(exact)) = (syntax.exact_version, constraint.exact()) {
            return Ok(vec![template
                .replace("{name}", name)
                .replace("{version}", exact.version())]);
        }

        let Some(ranges) = syntax.version_ranges else {
            return Err(match syntax.exact_version {
                Some(_) => format!("{} only supports exact versions", package_manager),
                None => format!("{} does not support version constraints", package_manager),
            });
        };

        let mut rendered = Vec::with_capacity(constraint.clauses().len());
        for clause in constraint.clauses() {
            if clause.is_wildcard() {
                return Err(format!(
                    "wildcard version '{}' is not supported by {}",
                    clause, package_manager
                ));
            }
            let op = ranges
                .operators
                .iter()
                .find(|(op, _)| *op == clause.operator())
                .map(|(_, spelling)| *spelling)
                .ok_or_else(|| {
                    format!(
                        "operator '{}' is not supported by {}",
                        clause.operator(),
                        package_manager
                    )
                })?;
            rendered.push(format!("{}{}", op, clause.version()));
        }

        let render = |ranges_text: &str| {
            ranges
                .syntax
                .replace("{name}", name)
                .replace("{ranges}", ranges_text)
        };
        Ok(match ranges.joiner {
            Some(joiner) => vec![render(&rendered.join(joiner))],
            None => rendered.iter().map(|r| render(r)).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constraint(s: &str) -> VersionConstraint {
        s.parse().unwrap()
    }

    #[test]
    fn test_no_constraint_is_name_only() {
        let args = ConstraintTranslation::translate("apt", "cmake", None).unwrap();
        assert_eq!(args, vec!["cmake"]);
    }

    #[test]
    fn test_conda_ranges_are_joined() {
        let c = constraint(">=3.20,<4");
        let args = ConstraintTranslation::translate("conda", "cmake", Some(&c)).unwrap();
        assert_eq!(args, vec!["cmake>=3.20,<4"]);
    }

    #[test]
    fn test_conda_exact_version() {
        let c = constraint("3.28");
        let args = ConstraintTranslation::translate("conda", "cmake", Some(&c)).unwrap();
        assert_eq!(args, vec!["cmake==3.28"]);
    }

    #[test]
    fn test_apt_exact_version() {
        let c = constraint("==1.2.13");
        let args = ConstraintTranslation::translate("apt", "zlib1g-dev", Some(&c)).unwrap();
        assert_eq!(args, vec!["zlib1g-dev=1.2.13"]);
    }

    #[test]
    fn test_apt_range_is_untranslatable() {
        let c = constraint(">=1.2");
        let err = ConstraintTranslation::translate("apt", "zlib1g-dev", Some(&c)).unwrap_err();
        assert!(err.contains("only supports exact versions"));
    }

    #[test]
    fn test_zypper_ranges_are_exploded() {
        let c = constraint(">=1.2,<2");
        let args = ConstraintTranslation::translate("zypper", "zlib-devel", Some(&c)).unwrap();
        assert_eq!(args, vec!["zlib-devel>=1.2", "zlib-devel<2"]);
    }

    #[test]
    fn test_unsupported_operator() {
        let c = constraint("~=1.2");
        let err = ConstraintTranslation::translate("conda", "zlib", Some(&c)).unwrap_err();
        assert!(err.contains("'~='"));

        let c = constraint("!=1.2");
        assert!(ConstraintTranslation::translate("apk", "zlib", Some(&c)).is_err());
    }

    #[test]
    fn test_wildcard_is_untranslatable() {
        let c = constraint("==1.*");
        let err = ConstraintTranslation::translate("conda", "zlib", Some(&c)).unwrap_err();
        assert!(err.contains("wildcard"));
    }

    #[test]
    fn test_name_only_managers() {
        let c = constraint("1.0");
        let err = ConstraintTranslation::translate("brew", "zlib", Some(&c)).unwrap_err();
        assert!(err.contains("does not support version constraints"));
        assert_eq!(
            ConstraintTranslation::syntax_for("unknown-pm"),
            &NAME_ONLY_SYNTAX
        );
    }
}
