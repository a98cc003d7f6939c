//! `kiln pro`: writes a qmake project file for the discovered sources.

use std::path::Path;

use kiln_build::base_and_mode_flags;
use kiln_config::BuildConfig;

use crate::pipeline::{prepare, Prepared};
use crate::{BuildArgs, GlobalArgs};

/// Include paths every generated project file lists.
const INCLUDE_PATH: &str = ". include ../include ../common";

/// Runs the `kiln pro` command.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let Some(Prepared {
        root,
        config,
        sources,
        ..
    }) = prepare(args, global)?
    else {
        return Ok(0);
    };

    let Some(output) = sources.output_name(config.target_os()) else {
        return Err("no buildable sources to put in a project file".into());
    };
    let name = output.strip_suffix(".exe").unwrap_or(&output);
    let path = root.join(format!("{name}.pro"));

    std::fs::write(&path, render(&sources.buildable(), &config))
        .map_err(|e| format!("cannot write {}: {e}", path.display()))?;
    if !global.quiet {
        eprintln!("     Wrote {}", path.display());
    }
    Ok(0)
}

/// Renders the project file text.
pub fn render(sources: &[&Path], config: &BuildConfig) -> String {
    let mut out = String::new();
    out.push_str("TEMPLATE = app\n");
    out.push_str("CONFIG += c++20\n");
    out.push_str("CONFIG -= console\n");
    out.push_str("CONFIG -= app_bundle\n");
    out.push_str("CONFIG -= qt\n\n");

    out.push_str("SOURCES += \\\n");
    let names: Vec<String> = sources.iter().map(|s| qmake_path(s)).collect();
    out.push_str(&format!("  {}\n\n", names.join(" \\\n  ")));

    out.push_str(&format!("INCLUDEPATH += {INCLUDE_PATH}\n\n"));
    out.push_str(&format!("QMAKE_CXX = {}\n", config.compiler));

    let mut flags = base_and_mode_flags(config.mode);
    flags.extend(config.extra_compile_flags().iter().cloned());
    out.push_str(&format!("QMAKE_CXXFLAGS += {}\n", flags.join(" ")));
    out
}

/// qmake wants forward slashes on every platform.
fn qmake_path(path: &Path) -> String {
    let parts: Vec<String> = path
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    parts.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_config::ModeFlags;
    use tempfile::TempDir;

    #[test]
    fn render_lists_sources_and_flags() {
        let mut config = BuildConfig::builder()
            .mode(ModeFlags {
                optimized: true,
                ..ModeFlags::default()
            })
            .build();
        config.push_compile_flag("-I/usr/include/SDL2");
        let text = render(&[Path::new("main.cpp"), Path::new("src/util.cpp")], &config);

        assert!(text.starts_with("TEMPLATE = app\nCONFIG += c++20\n"));
        assert!(text.contains("CONFIG -= console\nCONFIG -= app_bundle\nCONFIG -= qt\n"));
        assert!(text.contains("SOURCES += \\\n  main.cpp \\\n  src/util.cpp\n\n"));
        assert!(text.contains("INCLUDEPATH += . include ../include ../common\n"));
        assert!(text.contains("QMAKE_CXX = g++\n"));
        let flags_line = text.lines().last().unwrap();
        assert!(flags_line.starts_with("QMAKE_CXXFLAGS += -pipe"));
        assert!(flags_line.ends_with("-O2 -I/usr/include/SDL2"));
    }

    #[test]
    fn render_exact_layout() {
        let config = BuildConfig::builder().compiler(Some("clang++".to_string())).build();
        let text = render(&[Path::new("a.cpp")], &config);
        let flags = base_and_mode_flags(config.mode).join(" ");
        assert_eq!(
            text,
            format!(
                "TEMPLATE = app\nCONFIG += c++20\nCONFIG -= console\nCONFIG -= app_bundle\n\
                 CONFIG -= qt\n\nSOURCES += \\\n  a.cpp\n\n\
                 INCLUDEPATH += . include ../include ../common\n\n\
                 QMAKE_CXX = clang++\nQMAKE_CXXFLAGS += {flags}\n"
            )
        );
    }

    #[test]
    fn single_source() {
        let text = render(&[Path::new("hello.cpp")], &BuildConfig::default());
        assert!(text.contains("SOURCES += \\\n  hello.cpp\n\n"));
    }

    #[test]
    fn run_writes_named_file_without_building() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("game.cpp"), "int main() { return 0; }\n").unwrap();
        let global = GlobalArgs {
            quiet: true,
            verbose: false,
            dir: Some(tmp.path().to_path_buf()),
        };
        assert_eq!(run(&BuildArgs::default(), &global).unwrap(), 0);

        let text = std::fs::read_to_string(tmp.path().join("game.pro")).unwrap();
        assert!(text.contains("  game.cpp\n"));
        assert!(!tmp.path().join("game").exists());
        assert!(!tmp.path().join("game.o").exists());
    }

    #[test]
    fn cross_names_drop_the_exe_suffix() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("tool.cpp"), "int main() { return 0; }\n").unwrap();
        let global = GlobalArgs {
            quiet: true,
            verbose: false,
            dir: Some(tmp.path().to_path_buf()),
        };
        let args = BuildArgs {
            win64_docker: true,
            ..BuildArgs::default()
        };
        run(&args, &global).unwrap();
        assert!(tmp.path().join("tool.pro").exists());
        let text = std::fs::read_to_string(tmp.path().join("tool.pro")).unwrap();
        assert!(text.contains("QMAKE_CXX = x86_64-w64-mingw32-g++"));
    }
}
