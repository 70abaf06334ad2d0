use std::path::PathBuf;

use thiserror::Error;

/// Boxed cause carried by [`ContextError::Service`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum ContextError {
    /// A pluggable backend (tokenizer, loader, ...) is not available in this build.
    #[error("Missing dependency: {capability} is unavailable: {reason}")]
    MissingDependency { capability: String, reason: String },

    #[error("Missing field: row has no value for `{field}`")]
    MissingField { field: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network or API failure. `message` already contains the cause text.
    #[error("Service error: {message}")]
    Service {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ContextError>;

impl ContextError {
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    pub fn missing_dependency(capability: impl Into<String>, reason: impl ToString) -> Self {
        Self::MissingDependency {
            capability: capability.into(),
            reason: reason.to_string(),
        }
    }

    /// Wraps `source` and appends its message to `context`.
    pub fn service<E>(context: impl AsRef<str>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Service {
            message: format!("{}: {}", context.as_ref(), source),
            source: Some(Box::new(source)),
        }
    }

    /// Service failure with no underlying error value (e.g. a non-2xx status).
    pub fn service_msg(message: impl Into<String>) -> Self {
        Self::Service {
            message: message.into(),
            source: None,
        }
    }
}
