/// Output format of a resolution
///
/// Each format needs a different amount of the pipeline: `raw` only parses
/// the pyproject, `normalized` needs the registry, the others also need a
/// target to map onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// The `[external]` table as declared (default)
    Raw,
    /// The `[external]` table with canonical identifiers
    Normalized,
    /// The `[external]` table with provider packages for the target
    Mapped,
    /// Provider packages on one shell-quoted line
    MappedList,
    /// The install command for the target
    Command,
    /// Everything above as one JSON document
    Json,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 6] = [
        OutputFormat::Raw,
        OutputFormat::Normalized,
        OutputFormat::Mapped,
        OutputFormat::MappedList,
        OutputFormat::Command,
        OutputFormat::Json,
    ];

    pub fn needs_registry(self) -> bool {
        !matches!(self, OutputFormat::Raw)
    }

    pub fn needs_mapping(self) -> bool {
        !matches!(self, OutputFormat::Raw | OutputFormat::Normalized)
    }

    pub fn needs_command(self) -> bool {
        matches!(self, OutputFormat::Command | OutputFormat::Json)
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "raw" => Ok(OutputFormat::Raw),
            "normalized" | "normalised" => Ok(OutputFormat::Normalized),
            "mapped" => Ok(OutputFormat::Mapped),
            "mapped-list" | "mapped_list" => Ok(OutputFormat::MappedList),
            "command" => Ok(OutputFormat::Command),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "Invalid format: {}. Please specify one of 'raw', 'normalized', 'mapped', 'mapped-list', 'command' or 'json'",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OutputFormat::Raw => "raw",
            OutputFormat::Normalized => "normalized",
            OutputFormat::Mapped => "mapped",
            OutputFormat::MappedList => "mapped-list",
            OutputFormat::Command => "command",
            OutputFormat::Json => "json",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_from_str_round_trips_display() {
        for format in OutputFormat::ALL {
            assert_eq!(OutputFormat::from_str(&format.to_string()).unwrap(), format);
        }
    }

    #[test]
    fn test_from_str_case_insensitive() {
        assert_eq!(OutputFormat::from_str("COMMAND").unwrap(), OutputFormat::Command);
        assert_eq!(OutputFormat::from_str("Mapped_List").unwrap(), OutputFormat::MappedList);
    }

    #[test]
    fn test_from_str_invalid() {
        let error = OutputFormat::from_str("markdown").unwrap_err();
        assert!(error.contains("Invalid format"));
        assert!(error.contains("mapped-list"));
    }

    #[test]
    fn test_pipeline_needs() {
        assert!(!OutputFormat::Raw.needs_registry());
        assert!(OutputFormat::Normalized.needs_registry());
        assert!(!OutputFormat::Normalized.needs_mapping());
        assert!(OutputFormat::MappedList.needs_mapping());
        assert!(!OutputFormat::Mapped.needs_command());
        assert!(OutputFormat::Command.needs_command());
        assert!(OutputFormat::Json.needs_command());
    }
}
