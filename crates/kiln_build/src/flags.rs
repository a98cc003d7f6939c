//! Base and mode-derived compiler flags.

use kiln_config::ModeFlags;

/// Flags passed to every compile and link.
pub const BASE_FLAGS: &[&str] = &[
    "-pipe",
    "-fPIC",
    "-fno-plt",
    "-fstack-protector-strong",
    "-Wall",
    "-Wshadow",
    "-Wpedantic",
    "-Wno-parentheses",
    "-Wfatal-errors",
    "-Wvla",
    "-Wignored-qualifiers",
];

fn mode_flags(mode: ModeFlags) -> Vec<&'static str> {
    let mut flags = Vec::new();
    if mode.debug {
        flags.extend(["-O0", "-g"]);
    } else if mode.optimized {
        flags.push("-O2");
    }
    if mode.strict {
        flags.extend(["-Wextra", "-Wconversion"]);
    }
    if mode.sloppy {
        flags.extend(["-w", "-fpermissive"]);
    }
    flags
}

/// Base flags followed by the flags selected by `mode`.
pub fn base_and_mode_flags(mode: ModeFlags) -> Vec<String> {
    BASE_FLAGS
        .iter()
        .copied()
        .chain(mode_flags(mode))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mode_is_base_only() {
        assert_eq!(base_and_mode_flags(ModeFlags::default()), BASE_FLAGS);
    }

    #[test]
    fn debug_beats_optimized() {
        let flags = base_and_mode_flags(ModeFlags {
            debug: true,
            optimized: true,
            ..ModeFlags::default()
        });
        assert_eq!(&flags[BASE_FLAGS.len()..], ["-O0", "-g"]);
    }

    #[test]
    fn optimized() {
        let flags = base_and_mode_flags(ModeFlags {
            optimized: true,
            ..ModeFlags::default()
        });
        assert_eq!(&flags[BASE_FLAGS.len()..], ["-O2"]);
    }

    #[test]
    fn strict_and_sloppy_order() {
        let flags = base_and_mode_flags(ModeFlags {
            strict: true,
            sloppy: true,
            ..ModeFlags::default()
        });
        assert_eq!(
            &flags[BASE_FLAGS.len()..],
            ["-Wextra", "-Wconversion", "-w", "-fpermissive"]
        );
    }
}
