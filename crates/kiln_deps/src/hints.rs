//! Missing header → distribution package mapping.

use kiln_common::PlatformFamily;

/// A suggested package for a missing header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageHint {
    /// Package name(s), space-separated, as queried from `pkg-config`.
    pub package: String,
    /// Human-readable install command.
    pub install_command: String,
}

/// Package name and install set for one family.
struct Packages {
    package: &'static str,
    install: &'static str,
}

/// One row of the hint table.
struct HintRule {
    /// Substrings of the lowercased header path that select this rule.
    patterns: &'static [&'static str],
    debian: Packages,
    arch: Packages,
}

const RULES: &[HintRule] = &[
    HintRule {
        patterns: &["boost/"],
        debian: Packages {
            package: "libboost-all-dev",
            install: "libboost-all-dev",
        },
        arch: Packages {
            package: "boost",
            install: "boost",
        },
    },
    HintRule {
        patterns: &["sdl2/"],
        debian: Packages {
            package: "libsdl2-dev libsdl2-mixer-dev",
            install: "libsdl2-dev libsdl2-mixer-dev",
        },
        arch: Packages {
            package: "sdl2",
            install: "sdl2 sdl2_mixer",
        },
    },
    HintRule {
        patterns: &["glm/"],
        debian: Packages {
            package: "libglm-dev",
            install: "libglm-dev",
        },
        arch: Packages {
            package: "glm",
            install: "glm",
        },
    },
    HintRule {
        patterns: &["gl.h", "glu.h"],
        debian: Packages {
            package: "mesa-common-dev",
            install: "mesa-common-dev",
        },
        arch: Packages {
            package: "mesa",
            install: "mesa",
        },
    },
    HintRule {
        patterns: &["gtk/gtk.h"],
        debian: Packages {
            package: "libgtk-3-dev",
            install: "libgtk-3-dev",
        },
        arch: Packages {
            package: "gtk3",
            install: "gtk3",
        },
    },
    HintRule {
        patterns: &["vulkan/"],
        debian: Packages {
            package: "libvulkan-dev",
            install: "libvulkan-dev",
        },
        arch: Packages {
            package: "vulkan-devel",
            install: "vulkan-devel",
        },
    },
];

/// Looks up the package providing `header` on `family`.
///
/// Matching is by substring on the lowercased header path; the first rule
/// wins. Unknown headers have no hint.
pub fn hint_for(header: &str, family: PlatformFamily) -> Option<PackageHint> {
    let lower = header.to_lowercase();
    let rule = RULES
        .iter()
        .find(|r| r.patterns.iter().any(|p| lower.contains(p)))?;
    let packages = match family {
        PlatformFamily::Debian => &rule.debian,
        PlatformFamily::Arch => &rule.arch,
    };
    Some(PackageHint {
        package: packages.package.to_string(),
        install_command: family.install_command(packages.install),
    })
}
