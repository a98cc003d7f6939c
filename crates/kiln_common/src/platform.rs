//! Host platform and distribution-family detection.
//!
//! Package hints are keyed by [`PlatformFamily`] rather than by the free-form
//! distribution name, so every table lookup is an exhaustive `match`.

use std::fmt;
use std::path::Path;

/// Location of the os-release file on Linux hosts.
const OS_RELEASE: &str = "/etc/os-release";

/// A coarse grouping of distributions that share a package-manager convention.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlatformFamily {
    /// Debian, Ubuntu, Mint and other `apt` based distributions.
    Debian,
    /// Arch, Manjaro, EndeavourOS and other `pacman` based distributions.
    Arch,
}

impl PlatformFamily {
    /// Classifies an os-release `ID` / `ID_LIKE` pair.
    ///
    /// Anything that is not recognizably Arch-like uses the Debian table.
    pub fn classify(id: &str, id_like: &str) -> Self {
        let words = id.split_whitespace().chain(id_like.split_whitespace());
        for word in words {
            if word.to_ascii_lowercase().contains("arch") {
                return PlatformFamily::Arch;
            }
        }
        PlatformFamily::Debian
    }

    /// Returns the human-readable install command for the given packages.
    pub fn install_command(self, packages: &str) -> String {
        match self {
            PlatformFamily::Debian => format!("apt install {packages}"),
            PlatformFamily::Arch => format!("pacman -S {packages}"),
        }
    }
}

impl fmt::Display for PlatformFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformFamily::Debian => write!(f, "debian"),
            PlatformFamily::Arch => write!(f, "arch"),
        }
    }
}

/// The operating system an artifact is built for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetOs {
    /// Linux, macOS and the BSDs. Executables carry no suffix.
    Unix,
    /// Windows. Executables carry an `.exe` suffix.
    Windows,
}

impl TargetOs {
    /// Returns the OS of the machine kiln is running on.
    pub fn host() -> Self {
        if cfg!(windows) {
            TargetOs::Windows
        } else {
            TargetOs::Unix
        }
    }
}

/// Appends the target's executable suffix to `base` unless already present.
pub fn executable_name(base: &str, os: TargetOs) -> String {
    match os {
        TargetOs::Windows if !base.ends_with(".exe") => format!("{base}.exe"),
        _ => base.to_string(),
    }
}

/// Identity of the host platform: its display name and package family.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Platform {
    /// Human-readable distribution name (e.g. "Ubuntu 24.04 LTS").
    pub name: String,
    /// Package-manager family used for install hints.
    pub family: PlatformFamily,
}

impl Platform {
    /// Detects the host platform from `/etc/os-release`.
    ///
    /// Hosts without an os-release file are reported by their OS name and use
    /// the Debian family.
    pub fn detect() -> Self {
        Self::from_os_release_file(Path::new(OS_RELEASE))
    }

    /// Detects the platform from an os-release file at `path`.
    pub fn from_os_release_file(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_os_release(&content),
            Err(e) => {
                tracing::debug!("no os-release at {}: {e}", path.display());
                Self {
                    name: std::env::consts::OS.to_string(),
                    family: PlatformFamily::Debian,
                }
            }
        }
    }

    /// Parses the contents of an os-release file.
    pub fn from_os_release(content: &str) -> Self {
        let mut id = String::new();
        let mut id_like = String::new();
        let mut name = None;
        let mut pretty_name = None;

        for line in content.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim().trim_matches('"').trim_matches('\'');
            match key.trim() {
                "ID" => id = value.to_string(),
                "ID_LIKE" => id_like = value.to_string(),
                "NAME" => name = Some(value.to_string()),
                "PRETTY_NAME" => pretty_name = Some(value.to_string()),
                _ => {}
            }
        }

        let name = pretty_name
            .or(name)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| std::env::consts::OS.to_string());

        Self {
            name,
            family: PlatformFamily::classify(&id, &id_like),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
