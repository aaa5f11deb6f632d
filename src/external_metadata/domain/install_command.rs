use serde::Serialize;
use std::fmt;

/// A synthesized command line, kept as argv.
///
/// `Display` renders it for a POSIX shell, single-quoting arguments that
/// contain anything beyond a conservative safe set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallCommand {
    argv: Vec<String>,
}

impl InstallCommand {
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn program(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }
}

impl fmt::Display for InstallCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", shell_join(&self.argv))
    }
}

/// Joins arguments into one line a POSIX shell splits back into the same arguments
pub fn shell_join(args: &[String]) -> String {
    args.iter()
        .map(|arg| shell_quote(arg))
        .collect::<Vec<_>>()
        .join(" ")
}

fn shell_quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg.chars().all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | ':' | ',' | '+' | '@' | '%' | '=')
        });
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}
