use std::fmt;

/// Comparison operator of a single constraint clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equal,
    NotEqual,
    LessThanEqual,
    GreaterThanEqual,
    LessThan,
    GreaterThan,
    /// `~=`
    Compatible,
    /// `===`
    Arbitrary,
}

impl Operator {
    /// Longest operators first so that prefix matching is unambiguous
    const PREFIXES: [(&'static str, Operator); 8] = [
        ("===", Operator::Arbitrary),
        ("==", Operator::Equal),
        ("!=", Operator::NotEqual),
        ("<=", Operator::LessThanEqual),
        (">=", Operator::GreaterThanEqual),
        ("~=", Operator::Compatible),
        ("<", Operator::LessThan),
        (">", Operator::GreaterThan),
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::LessThanEqual => "<=",
            Operator::GreaterThanEqual => ">=",
            Operator::LessThan => "<",
            Operator::GreaterThan => ">",
            Operator::Compatible => "~=",
            Operator::Arbitrary => "===",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One `op version` clause
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConstraintClause {
    operator: Operator,
    version: String,
}

impl ConstraintClause {
    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// `==1.2.*` style prefix match
    pub fn is_wildcard(&self) -> bool {
        self.version.ends_with(".*")
    }

    /// A single pinned version, i.e. something a name-plus-version syntax can express
    pub fn is_exact(&self) -> bool {
        matches!(self.operator, Operator::Equal | Operator::Arbitrary) && !self.is_wildcard()
    }

    fn parse(clause: &str) -> Result<Self, String> {
        let clause = clause.trim();
        if clause.is_empty() {
            return Err("empty clause".to_string());
        }

        let (operator, version) = Operator::PREFIXES
            .iter()
            .find_map(|(prefix, op)| clause.strip_prefix(prefix).map(|rest| (*op, rest.trim())))
            .unwrap_or((Operator::Equal, clause));

        if version.is_empty() {
            return Err(format!("missing version after '{}'", operator));
        }
        if !version.starts_with(|c: char| c.is_ascii_alphanumeric()) {
            return Err(format!("version '{}' must start with a letter or digit", version));
        }
        if let Some(bad) = version
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '*' | '+' | '!' | '_' | '-')))
        {
            return Err(format!("invalid character '{}' in version '{}'", bad, version));
        }

        let stars = version.matches('*').count();
        if stars > 0 {
            if stars > 1 || !version.ends_with(".*") {
                return Err(format!("wildcard must be a trailing '.*' in '{}'", version));
            }
            if !matches!(operator, Operator::Equal | Operator::NotEqual) {
                return Err(format!("wildcard versions are only allowed with '==' and '!=', not '{}'", operator));
            }
        }
        if operator == Operator::Compatible && !version.contains('.') {
            return Err(format!("'~=' needs at least two release segments, got '{}'", version));
        }

        Ok(Self {
            operator,
            version: version.to_string(),
        })
    }
}

impl fmt::Display for ConstraintClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator, self.version)
    }
}

/// A version constraint in the single, ecosystem-agnostic grammar:
/// comma-separated `op version` clauses, where a bare version means `==`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionConstraint {
    clauses: Vec<ConstraintClause>,
}

impl VersionConstraint {
    pub fn clauses(&self) -> &[ConstraintClause] {
        &self.clauses
    }

    /// The pinned clause when the constraint is exactly one exact version
    pub fn exact(&self) -> Option<&ConstraintClause> {
        match self.clauses.as_slice() {
            [only] if only.is_exact() => Some(only),
            _ => None,
        }
    }
}

impl std::str::FromStr for VersionConstraint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let clauses = s
            .split(',')
            .map(ConstraintClause::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { clauses })
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let clauses: Vec<String> = self.clauses.iter().map(ToString::to_string).collect();
        write!(f, "{}", clauses.join(","))
    }
}
