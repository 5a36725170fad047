use thiserror::Error;

/// Top-level error type for the Registrar system.
///
/// The chat crate defines its own error type and implements
/// `From<RegistrarError>` so that `?` works across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RegistrarError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for RegistrarError {
    fn from(err: toml::de::Error) -> Self {
        RegistrarError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for RegistrarError {
    fn from(err: toml::ser::Error) -> Self {
        RegistrarError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for RegistrarError {
    fn from(err: serde_json::Error) -> Self {
        RegistrarError::Serialization(err.to_string())
    }
}

/// Convenience alias used throughout the core crate.
pub type Result<T> = std::result::Result<T, RegistrarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RegistrarError::Config("bad latency".to_string());
        assert_eq!(err.to_string(), "Configuration error: bad latency");

        let err = RegistrarError::Serialization("eof".to_string());
        assert_eq!(err.to_string(), "Serialization error: eof");
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: RegistrarError = io.into();
        assert!(matches!(err, RegistrarError::Io(_)));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_from_toml_error() {
        let parse_err = toml::from_str::<toml::Value>("= nope").unwrap_err();
        let err: RegistrarError = parse_err.into();
        assert!(matches!(err, RegistrarError::Config(_)));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: RegistrarError = json_err.into();
        assert!(matches!(err, RegistrarError::Serialization(_)));
    }
}
