/// Placeholder replaced by the package list (install) or one package name (query)
pub const PACKAGE_SLOT: &str = "{}";

/// Command line shape of one package manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandTemplate {
    pub install: &'static [&'static str],
    pub requires_elevation: bool,
    pub query: Option<&'static [&'static str]>,
}

impl CommandTemplate {
    /// Install argv with the slot replaced by `packages`, prefixed with `sudo`
    /// when the package manager writes to system locations.
    pub fn render_install(&self, packages: &[String]) -> Vec<String> {
        let mut argv = Vec::new();
        if self.requires_elevation {
            argv.push("sudo".to_string());
        }
        for part in self.install {
            if *part == PACKAGE_SLOT {
                argv.extend(packages.iter().cloned());
            } else {
                argv.push(part.to_string());
            }
        }
        argv
    }

    /// Query argv for one package name, if the package manager has one
    pub fn render_query(&self, package: &str) -> Option<Vec<String>> {
        self.query.map(|parts| {
            parts
                .iter()
                .map(|part| part.replace(PACKAGE_SLOT, package))
                .collect()
        })
    }
}

/// CommandTemplates policy: the built-in table of install and query commands,
/// keyed by package manager name.
///
/// This table is the only environment-specific data that does not come from
/// the mapping registry.
pub struct CommandTemplates;

const TEMPLATES: &[(&str, CommandTemplate)] = &[
    (
        "apt",
        CommandTemplate {
            install: &["apt-get", "install", "--yes", PACKAGE_SLOT],
            requires_elevation: true,
            query: Some(&["dpkg", "-s", PACKAGE_SLOT]),
        },
    ),
    (
        "dnf",
        CommandTemplate {
            install: &["dnf", "install", "-y", PACKAGE_SLOT],
            requires_elevation: true,
            query: Some(&["rpm", "-q", PACKAGE_SLOT]),
        },
    ),
    (
        "yum",
        CommandTemplate {
            install: &["yum", "install", "-y", PACKAGE_SLOT],
            requires_elevation: true,
            query: Some(&["rpm", "-q", PACKAGE_SLOT]),
        },
    ),
    (
        "zypper",
        CommandTemplate {
            install: &["zypper", "--non-interactive", "install", PACKAGE_SLOT],
            requires_elevation: true,
            query: Some(&["rpm", "-q", PACKAGE_SLOT]),
        },
    ),
    (
        "pacman",
        CommandTemplate {
            install: &["pacman", "-S", "--needed", "--noconfirm", PACKAGE_SLOT],
            requires_elevation: true,
            query: Some(&["pacman", "-Qi", PACKAGE_SLOT]),
        },
    ),
    (
        "apk",
        CommandTemplate {
            install: &["apk", "add", PACKAGE_SLOT],
            requires_elevation: true,
            query: Some(&["apk", "info", "-e", PACKAGE_SLOT]),
        },
    ),
    (
        "brew",
        CommandTemplate {
            install: &["brew", "install", PACKAGE_SLOT],
            requires_elevation: false,
            query: Some(&["brew", "list", "--versions", PACKAGE_SLOT]),
        },
    ),
    (
        "conda",
        CommandTemplate {
            install: &[
                "conda",
                "install",
                "--yes",
                "--channel=conda-forge",
                "--strict-channel-priority",
                PACKAGE_SLOT,
            ],
            requires_elevation: false,
            query: Some(&["conda", "list", "-f", PACKAGE_SLOT]),
        },
    ),
    (
        "mamba",
        CommandTemplate {
            install: &[
                "mamba",
                "install",
                "--yes",
                "--channel=conda-forge",
                "--strict-channel-priority",
                PACKAGE_SLOT,
            ],
            requires_elevation: false,
            query: Some(&["mamba", "list", "-f", PACKAGE_SLOT]),
        },
    ),
    (
        "micromamba",
        CommandTemplate {
            install: &[
                "micromamba",
                "install",
                "--yes",
                "--channel=conda-forge",
                "--strict-channel-priority",
                PACKAGE_SLOT,
            ],
            requires_elevation: false,
            query: Some(&["micromamba", "list", "-f", PACKAGE_SLOT]),
        },
    ),
    (
        "pixi",
        CommandTemplate {
            install: &["pixi", "add", PACKAGE_SLOT],
            requires_elevation: false,
            query: Some(&["pixi", "list", PACKAGE_SLOT]),
        },
    ),
    (
        "vcpkg",
        CommandTemplate {
            install: &["vcpkg", "install", PACKAGE_SLOT],
            requires_elevation: false,
            query: Some(&["vcpkg", "list", PACKAGE_SLOT]),
        },
    ),
];

impl CommandTemplates {
    pub fn lookup(package_manager: &str) -> Option<&'static CommandTemplate> {
        TEMPLATES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(package_manager))
            .map(|(_, template)| template)
    }

    /// Package managers with a built-in template, in table order
    pub fn known() -> impl Iterator<Item = &'static str> {
        TEMPLATES.iter().map(|(name, _)| *name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_apt_install_is_elevated() {
        let template = CommandTemplates::lookup("apt").unwrap();
        let argv = template.render_install(&strings(&["cmake", "ninja-build"]));
        assert_eq!(
            argv,
            strings(&["sudo", "apt-get", "install", "--yes", "cmake", "ninja-build"])
        );
    }

    #[test]
    fn test_conda_install_keeps_flags_around_slot() {
        let template = CommandTemplates::lookup("conda").unwrap();
        let argv = template.render_install(&strings(&["cmake"]));
        assert_eq!(
            argv,
            strings(&[
                "conda",
                "install",
                "--yes",
                "--channel=conda-forge",
                "--strict-channel-priority",
                "cmake"
            ])
        );
    }

    #[test]
    fn test_query_command() {
        let template = CommandTemplates::lookup("apt").unwrap();
        assert_eq!(
            template.render_query("cmake"),
            Some(strings(&["dpkg", "-s", "cmake"]))
        );
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert!(CommandTemplates::lookup("Brew").is_some());
    }

    #[test]
    fn test_unknown_package_manager() {
        assert!(CommandTemplates::lookup("unknown-pm").is_none());
    }

    #[test]
    fn test_every_install_template_has_a_slot() {
        for name in CommandTemplates::known() {
            let template = CommandTemplates::lookup(name).unwrap();
            assert!(template.install.contains(&PACKAGE_SLOT), "{} has no slot", name);
        }
    }
}
