//! Typed errors for the Graph client.
//!
//! Every failure carries enough context to reproduce it: request-level
//! errors hold the query document and variables that were sent.

use cmsgraph_schema::SchemaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Typed error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorCode {
    // Transport
    GraphUnreachable,
    HttpResponse,

    // GraphQL
    ContentResponse,
    UnexpectedShape,

    // Lookup
    NotFound,

    // Local
    SchemaError,
    ConfigError,
}

impl ErrorCode {
    /// Returns the string representation of the error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::GraphUnreachable => "GRAPH_UNREACHABLE",
            Self::HttpResponse => "HTTP_RESPONSE",
            Self::ContentResponse => "CONTENT_RESPONSE",
            Self::UnexpectedShape => "UNEXPECTED_SHAPE",
            Self::NotFound => "NOT_FOUND",
            Self::SchemaError => "SCHEMA_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }

    /// Returns true for errors caused by the caller's input or setup.
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound | Self::SchemaError | Self::ConfigError | Self::ContentResponse
        )
    }

    /// Returns true for errors reported by or about the Graph service.
    pub const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::GraphUnreachable | Self::HttpResponse | Self::UnexpectedShape
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The request that produced an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphRequest {
    pub query: String,
    pub variables: serde_json::Value,
}

/// One entry of a GraphQL `errors` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQLError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Errors returned by the Graph client.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("could not reach Graph at {url}: {message}. Check the Graph URL or try again later")]
    Unreachable {
        url: String,
        message: String,
        request: Box<GraphRequest>,
    },

    #[error("Graph responded with HTTP {status}: {body}")]
    HttpResponse {
        status: u16,
        body: String,
        request: Box<GraphRequest>,
    },

    #[error("Graph returned errors: {}", join_messages(.errors))]
    ContentResponse {
        status: u16,
        errors: Vec<GraphQLError>,
        request: Box<GraphRequest>,
    },

    #[error("unexpected response from Graph: {message}. This is likely a bug; retry or contact support")]
    UnexpectedShape {
        message: String,
        request: Box<GraphRequest>,
    },

    #[error("no content found for key `{key}`")]
    NoContentForKey { key: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl GraphError {
    /// Returns the typed code of this error.
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Unreachable { .. } => ErrorCode::GraphUnreachable,
            Self::HttpResponse { .. } => ErrorCode::HttpResponse,
            Self::ContentResponse { .. } => ErrorCode::ContentResponse,
            Self::UnexpectedShape { .. } => ErrorCode::UnexpectedShape,
            Self::NoContentForKey { .. } => ErrorCode::NotFound,
            Self::Schema(_) => ErrorCode::SchemaError,
            Self::Config(_) => ErrorCode::ConfigError,
        }
    }

    /// Returns the request that failed, if the error came from one.
    pub fn request(&self) -> Option<&GraphRequest> {
        match self {
            Self::Unreachable { request, .. }
            | Self::HttpResponse { request, .. }
            | Self::ContentResponse { request, .. }
            | Self::UnexpectedShape { request, .. } => Some(request.as_ref()),
            _ => None,
        }
    }

    /// Returns the HTTP status, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpResponse { status, .. } | Self::ContentResponse { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.code().is_client_error()
    }

    pub fn is_server_error(&self) -> bool {
        self.code().is_server_error()
    }
}

fn join_messages(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Type alias for client results.
pub type GraphResult<T> = std::result::Result<T, GraphError>;
