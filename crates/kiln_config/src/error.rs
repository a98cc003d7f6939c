//! Errors raised while reading `kiln.toml`.

/// A `kiln.toml` that exists but cannot be used. All of these are fatal.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("cannot read kiln.toml: {0}")]
    Read(#[from] std::io::Error),

    /// The file is not valid TOML or has the wrong shape.
    #[error("kiln.toml is malformed: {0}")]
    Parse(String),

    /// A key holds a value kiln cannot use.
    #[error("kiln.toml: {key} {reason}")]
    Invalid {
        /// Dotted key, e.g. `build.compiler`.
        key: &'static str,
        /// What is wrong with the value.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_display() {
        let err = ConfigError::Parse("expected `]` at line 1".to_string());
        assert_eq!(err.to_string(), "kiln.toml is malformed: expected `]` at line 1");
    }

    #[test]
    fn invalid_display_names_the_key() {
        let err = ConfigError::Invalid {
            key: "build.compiler",
            reason: "is empty".to_string(),
        };
        assert_eq!(err.to_string(), "kiln.toml: build.compiler is empty");
    }

    #[test]
    fn read_display() {
        let err: ConfigError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        let msg = err.to_string();
        assert!(msg.starts_with("cannot read kiln.toml:"));
        assert!(msg.contains("denied"));
    }
}
