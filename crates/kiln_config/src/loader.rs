//! `kiln.toml` loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectFile;
use std::path::Path;

/// File name of the optional project configuration.
pub const PROJECT_FILE: &str = "kiln.toml";

/// Loads `<project_dir>/kiln.toml`.
///
/// A missing file is not an error: kiln is zero-configuration, so an empty
/// [`ProjectFile`] is returned instead.
pub fn load_project_file(project_dir: &Path) -> Result<ProjectFile, ConfigError> {
    let path = project_dir.join(PROJECT_FILE);
    if !path.is_file() {
        return Ok(ProjectFile::default());
    }
    let content = std::fs::read_to_string(&path)?;
    load_project_file_from_str(&content)
}

/// Parses and validates `kiln.toml` content.
pub fn load_project_file_from_str(content: &str) -> Result<ProjectFile, ConfigError> {
    let file: ProjectFile =
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate(&file)?;
    Ok(file)
}

fn validate(file: &ProjectFile) -> Result<(), ConfigError> {
    if let Some(compiler) = &file.build.compiler {
        if compiler.trim().is_empty() {
            return Err(invalid("build.compiler", "is empty".to_string()));
        }
        if compiler.contains(char::is_whitespace) {
            return Err(invalid(
                "build.compiler",
                format!("'{compiler}' must be a single program name"),
            ));
        }
    }
    if let Some(std) = &file.build.std {
        if std.contains(char::is_whitespace) {
            return Err(invalid(
                "build.std",
                format!("'{std}' must not contain whitespace"),
            ));
        }
    }
    Ok(())
}

fn invalid(key: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { key, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let file = load_project_file(dir.path()).unwrap();
        assert!(file.build.compiler.is_none());
        assert!(file.build.cflags.is_empty());
    }

    #[test]
    fn empty_file_yields_defaults() {
        let file = load_project_file_from_str("").unwrap();
        assert!(file.build.std.is_none());
    }

    #[test]
    fn parse_full_file() {
        let toml = r#"
[build]
compiler = "clang++"
std = "c++17"
cflags = ["-DUSE_FAST_MATH"]
ldflags = ["-lpthread"]
include_dirs = ["third_party/include"]
"#;
        let file = load_project_file_from_str(toml).unwrap();
        assert_eq!(file.build.compiler.as_deref(), Some("clang++"));
        assert_eq!(file.build.std.as_deref(), Some("c++17"));
        assert_eq!(file.build.cflags, vec!["-DUSE_FAST_MATH"]);
        assert_eq!(file.build.ldflags, vec!["-lpthread"]);
        assert_eq!(file.build.include_dirs, vec!["third_party/include"]);
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(PROJECT_FILE), "[build]\nstd = \"c++23\"\n").unwrap();
        let file = load_project_file(dir.path()).unwrap();
        assert_eq!(file.build.std.as_deref(), Some("c++23"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let result = load_project_file_from_str("[build\ncompiler = ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn empty_compiler_rejected() {
        let result = load_project_file_from_str("[build]\ncompiler = \"  \"\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn compiler_with_arguments_rejected() {
        let result = load_project_file_from_str("[build]\ncompiler = \"ccache g++\"\n");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("single program name"));
    }
}
