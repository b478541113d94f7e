use std::path::PathBuf;

use thiserror::Error;

/// Main error type for comment export operations
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Grammar or pattern initialisation failed
    #[error("Parser error: {0}")]
    Parser(String),

    /// Unreadable source directory, unreadable file, or a syntax error
    #[error("Parse error in {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_failures_are_not_configuration_errors() {
        let err = ExportError::Parser("Failed to set Go language: version mismatch".to_string());

        assert!(!matches!(err, ExportError::Config(_)));
        assert_eq!(
            err.to_string(),
            "Parser error: Failed to set Go language: version mismatch"
        );
    }
}
