use crate::ports::outbound::{EnvironmentDetector, MappingRegistry, TargetEnvironment};
use crate::shared::error::ExternalError;
use crate::shared::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const CONDA_FORGE: &str = "conda-forge";
const CONDA_TOOLS: [&str; 3] = ["conda", "pixi", "mamba"];
const CONDA_TOOLS_ON_PATH: [&str; 4] = ["conda", "pixi", "mamba", "micromamba"];

/// Snapshot of what the detector looks at on the host
#[derive(Debug, Clone, Default)]
pub struct HostInfo {
    /// `std::env::consts::OS` spelling: `linux`, `macos`, `windows`, ...
    pub os: String,
    pub vars: HashMap<String, String>,
    /// Contents of `/etc/os-release`, when readable
    pub os_release: Option<String>,
    pub path: Vec<PathBuf>,
}

impl HostInfo {
    pub fn from_host() -> Self {
        let vars: HashMap<String, String> = std::env::vars().collect();
        let path = std::env::var_os("PATH")
            .map(|p| std::env::split_paths(&p).collect())
            .unwrap_or_default();
        let os_release = ["/etc/os-release", "/usr/lib/os-release"]
            .iter()
            .find_map(|p| std::fs::read_to_string(p).ok());

        Self {
            os: std::env::consts::OS.to_string(),
            vars,
            os_release,
            path,
        }
    }

    fn var(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str).filter(|v| !v.is_empty())
    }

    fn which(&self, program: &str) -> Option<PathBuf> {
        let candidates: Vec<String> = if self.os == "windows" {
            vec![format!("{}.exe", program), format!("{}.bat", program)]
        } else {
            vec![program.to_string()]
        };
        self.path
            .iter()
            .flat_map(|dir| candidates.iter().map(move |c| dir.join(c)))
            .find(|candidate| candidate.is_file())
    }

    /// `ID` followed by the entries of `ID_LIKE`
    fn distro_ids(&self) -> Vec<String> {
        let Some(content) = &self.os_release else {
            return Vec::new();
        };
        let field = |key: &str| {
            content.lines().find_map(|line| {
                let (k, v) = line.split_once('=')?;
                (k.trim() == key).then(|| v.trim().trim_matches(|c| c == '"' || c == '\'').to_string())
            })
        };

        let mut ids: Vec<String> = field("ID").into_iter().collect();
        if let Some(like) = field("ID_LIKE") {
            ids.extend(like.split_whitespace().map(str::to_string));
        }
        ids
    }
}

/// SystemEnvironmentDetector adapter: picks a target for the current host
///
/// In order: an active conda environment, the Linux distribution (`ID`
/// then `ID_LIKE`), Homebrew on macOS, vcpkg on Windows, and finally any
/// conda-like tool on `PATH`.
pub struct SystemEnvironmentDetector {
    host: HostInfo,
}

impl SystemEnvironmentDetector {
    pub fn new() -> Self {
        Self::with_host(HostInfo::from_host())
    }

    pub fn with_host(host: HostInfo) -> Self {
        Self { host }
    }

    fn active_conda(&self) -> Option<TargetEnvironment> {
        self.host.var("CONDA_PREFIX")?;
        CONDA_TOOLS.iter().find_map(|tool| {
            let exe = PathBuf::from(self.host.var(&format!("{}_EXE", tool.to_uppercase()))?);
            if !exe.is_file() {
                return None;
            }
            let manager = if exe_stem(&exe) == "micromamba" {
                "micromamba"
            } else {
                *tool
            };
            Some(TargetEnvironment::new(CONDA_FORGE, manager))
        })
    }

    fn linux_distribution(&self, registry: &dyn MappingRegistry) -> Result<TargetEnvironment> {
        let ids = self.host.distro_ids();
        for id in &ids {
            if let Some(manager) = registry.known_package_managers(id).into_iter().next() {
                return Ok(TargetEnvironment::new(id.clone(), manager));
            }
        }
        Err(unsupported(format!(
            "no mapping for Linux distribution '{}'",
            ids.first().map(String::as_str).unwrap_or("unknown")
        )))
    }
}

impl Default for SystemEnvironmentDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn exe_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

fn unsupported(reason: String) -> anyhow::Error {
    ExternalError::UnsupportedPlatform { reason }.into()
}

impl EnvironmentDetector for SystemEnvironmentDetector {
    fn detect(&self, registry: &dyn MappingRegistry) -> Result<TargetEnvironment> {
        let known = registry.known_ecosystems();
        let is_known = |target: &TargetEnvironment| known.contains(&target.ecosystem);

        if let Some(target) = self.active_conda().filter(is_known) {
            tracing::debug!(selected = %target, "active conda environment");
            return Ok(target);
        }

        let detected = match self.host.os.as_str() {
            "linux" => self.linux_distribution(registry).map(Some)?,
            "macos" => match self.host.which("brew") {
                Some(_) => Some(TargetEnvironment::new("homebrew", "brew")),
                None => return Err(unsupported("only Homebrew is supported on macOS".to_string())),
            },
            "windows" => Some(TargetEnvironment::new("vcpkg", "vcpkg")),
            _ => CONDA_TOOLS_ON_PATH
                .iter()
                .find(|tool| self.host.which(tool).is_some())
                .map(|tool| TargetEnvironment::new(CONDA_FORGE, *tool)),
        };

        match detected {
            Some(target) if is_known(&target) => {
                tracing::debug!(selected = %target, os = %self.host.os, "detected target");
                Ok(target)
            }
            Some(target) => Err(unsupported(format!(
                "detected '{}' but the registry has no mapping for ecosystem '{}'",
                target, target.ecosystem
            ))),
            None => Err(unsupported(format!("no support for platform '{}' yet", self.host.os))),
        }
    }
}
