use crate::shared::Result;

const SCHEME: &str = "dep:";

/// Namespaces accepted under the `virtual` type
const VIRTUAL_NAMESPACES: [&str; 2] = ["compiler", "interface"];

/// Maximum length of a DepURL (security limit)
const MAX_DEP_URL_LENGTH: usize = 1024;

/// A parsed `dep:` identifier.
///
/// PEP 725 identifiers follow the PURL layout with three differences: the
/// scheme is `dep:`, the version field may hold a range, and the `virtual`
/// type only exists with the `compiler` and `interface` namespaces.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DepUrl {
    kind: String,
    namespace: Option<String>,
    name: String,
    version: Option<String>,
    qualifiers: Vec<(String, String)>,
    subpath: Option<String>,
}

impl DepUrl {
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.len() > MAX_DEP_URL_LENGTH {
            anyhow::bail!(
                "DepURL is too long ({} bytes). Maximum allowed: {} bytes",
                input.len(),
                MAX_DEP_URL_LENGTH
            );
        }

        let rest = match input.get(..SCHEME.len()) {
            Some(scheme) if scheme.eq_ignore_ascii_case(SCHEME) => &input[SCHEME.len()..],
            _ => anyhow::bail!("'{}' is not a DepURL: it must start with '{}'", input, SCHEME),
        };

        let (rest, subpath) = match rest.split_once('#') {
            Some((head, sub)) => (head, non_empty(sub.trim_matches('/'))),
            None => (rest, None),
        };
        let (rest, qualifiers) = match rest.split_once('?') {
            Some((head, query)) => (head, parse_qualifiers(input, query)?),
            None => (rest, Vec::new()),
        };
        let (path, version) = match rest.split_once('@') {
            Some((head, version)) => {
                let version = version.trim();
                if version.is_empty() {
                    anyhow::bail!("'{}' has an empty version after '@'", input);
                }
                (head, Some(version.to_string()))
            }
            None => (rest, None),
        };

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.len() < 2 {
            anyhow::bail!("'{}' must have at least a type and a name", input);
        }

        let kind = segments[0].to_lowercase();
        if !kind.starts_with(|c: char| c.is_ascii_alphabetic())
            || !kind
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '+' || c == '-')
        {
            anyhow::bail!("'{}' has an invalid type '{}'", input, segments[0]);
        }

        let mut name = segments[segments.len() - 1].to_string();
        let mut namespace = non_empty(&segments[1..segments.len() - 1].join("/"));

        if kind == "virtual" {
            let ns = namespace.as_deref().map(str::to_lowercase);
            match ns {
                Some(ns) if VIRTUAL_NAMESPACES.contains(&ns.as_str()) => {
                    namespace = Some(ns);
                    name = name.to_lowercase();
                }
                _ => anyhow::bail!(
                    "'{}': 'dep:virtual/*' only accepts 'compiler' or 'interface' as namespace",
                    input
                ),
            }
        }

        Ok(Self {
            kind,
            namespace,
            name,
            version,
            qualifiers,
            subpath,
        })
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn is_virtual(&self) -> bool {
        self.kind == "virtual"
    }

    /// The registry lookup key: type, namespace and name only
    pub fn identifier(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}{}/{}/{}", SCHEME, self.kind, ns, self.name),
            None => format!("{}{}/{}", SCHEME, self.kind, self.name),
        }
    }
}

impl std::fmt::Display for DepUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.identifier())?;
        if let Some(version) = &self.version {
            write!(f, "@{}", version)?;
        }
        if !self.qualifiers.is_empty() {
            let query: Vec<String> = self
                .qualifiers
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            write!(f, "?{}", query.join("&"))?;
        }
        if let Some(subpath) = &self.subpath {
            write!(f, "#{}", subpath)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for DepUrl {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Whether an identifier names the `virtual` type, without a full parse
pub fn is_virtual_identifier(identifier: &str) -> bool {
    identifier
        .get(..SCHEME.len() + "virtual/".len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("dep:virtual/"))
}

fn parse_qualifiers(input: &str, query: &str) -> Result<Vec<(String, String)>> {
    let mut qualifiers = Vec::new();
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        match pair.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                qualifiers.push((key.to_lowercase(), value.to_string()))
            }
            _ => anyhow::bail!("'{}' has a malformed qualifier '{}'", input, pair),
        }
    }
    qualifiers.sort();
    Ok(qualifiers)
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
