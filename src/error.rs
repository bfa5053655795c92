use std::path::PathBuf;
use thiserror::Error;

/// Playground generator error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("{field} must be set in playground[{file}]")]
    MissingMetadata { file: String, field: &'static str },

    #[error("Failed to {op} {path}: {source}")]
    Filesystem {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Template not readable at {path}: {source}")]
    TemplateMissing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    ConfigValidation(String),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Directory walk error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for generator operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a missing metadata error for an example file
    pub fn missing_metadata(file: impl Into<String>, field: &'static str) -> Self {
        Error::MissingMetadata {
            file: file.into(),
            field,
        }
    }

    /// Wrap an IO failure with the operation and path that caused it
    pub fn filesystem(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Filesystem {
            op,
            path: path.into(),
            source,
        }
    }

    /// Create a template missing error
    pub fn template_missing(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::TemplateMissing {
            path: path.into(),
            source,
        }
    }

    /// Create a config validation error
    pub fn config_validation(msg: impl Into<String>) -> Self {
        Error::ConfigValidation(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }
}
