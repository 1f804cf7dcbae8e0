//! Schema errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A property or query referenced a content type that was never registered.
    #[error("Missing content type: no content type with key \"{0}\" has been registered")]
    MissingContentType(String),

    #[error("Duplicate content type key: \"{0}\"")]
    DuplicateKey(String),

    #[error("Invalid definition for \"{key}\": {message}")]
    InvalidDefinition { key: String, message: String },
}

impl SchemaError {
    pub fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            key: key.into(),
            message: message.into(),
        }
    }
}

pub type SchemaResult<T> = Result<T, SchemaError>;
