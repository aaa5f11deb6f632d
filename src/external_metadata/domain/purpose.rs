use serde::Serialize;

/// Purpose of an external requirement, one per PEP 725 group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Purpose {
    /// `build-requires`: tools that run on the build machine
    Build,
    /// `host-requires`: libraries linked against for the target
    Host,
    /// `dependencies`: runtime requirements
    Dependency,
    /// `optional-dependencies`: runtime requirements of an extra
    Optional,
}

impl Purpose {
    /// All purposes, in installation order
    pub const ALL: [Purpose; 4] = [
        Purpose::Build,
        Purpose::Host,
        Purpose::Dependency,
        Purpose::Optional,
    ];

    /// Key of the group in the `[external]` table
    pub fn table_key(self) -> &'static str {
        match self {
            Purpose::Build => "build-requires",
            Purpose::Host => "host-requires",
            Purpose::Dependency => "dependencies",
            Purpose::Optional => "optional-dependencies",
        }
    }

    /// Resolves a table key, accepting the underscore spelling as well
    pub fn from_table_key(key: &str) -> Option<Self> {
        match key.replace('_', "-").as_str() {
            "build-requires" => Some(Purpose::Build),
            "host-requires" => Some(Purpose::Host),
            "dependencies" => Some(Purpose::Dependency),
            "optional-dependencies" => Some(Purpose::Optional),
            _ => None,
        }
    }

    /// Which registry specs a requirement of this purpose is mapped with
    pub fn specs_kind(self) -> SpecsKind {
        match self {
            Purpose::Build => SpecsKind::Build,
            Purpose::Host => SpecsKind::Host,
            Purpose::Dependency | Purpose::Optional => SpecsKind::Run,
        }
    }

    pub fn is_optional(self) -> bool {
        matches!(self, Purpose::Optional)
    }
}

impl std::fmt::Display for Purpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.table_key())
    }
}

impl std::str::FromStr for Purpose {
    type Err = String;

    /// Parses the short names used on the command line as well as table keys
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "build" => Ok(Purpose::Build),
            "host" => Ok(Purpose::Host),
            "run" | "runtime" => Ok(Purpose::Dependency),
            "optional" => Ok(Purpose::Optional),
            other => Purpose::from_table_key(other).ok_or_else(|| {
                format!(
                    "Invalid group: {}. Please specify 'build', 'host', 'run' or 'optional'",
                    s
                )
            }),
        }
    }
}

/// Use of a provider package in a mapping table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecsKind {
    Build,
    Host,
    Run,
}

impl SpecsKind {
    pub const ALL: [SpecsKind; 3] = [SpecsKind::Build, SpecsKind::Host, SpecsKind::Run];
}
