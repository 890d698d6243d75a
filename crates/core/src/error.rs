//! Error types for document loading and validation.
//!
//! Only hard stops live here. Reference resolution failures are reported as
//! `None` by the resolver and logged, never raised.

use thiserror::Error;

/// Result type for oasgen operations
pub type Result<T> = std::result::Result<T, OasError>;

/// Fatal errors raised while loading or validating a document set
#[derive(Error, Debug)]
pub enum OasError {
    #[error("Failed to read {uri}: {source}")]
    Io {
        uri: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP request for {uri} failed: {source}")]
    Http {
        uri: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("HTTP request for {uri} returned status {status}")]
    HttpStatus { uri: String, status: u16 },

    #[error("Document not found: {uri}")]
    NotFound { uri: String },

    #[error("Failed to parse {uri} as JSON ({json}) or YAML ({yaml})")]
    Parse {
        uri: String,
        json: String,
        yaml: String,
    },

    #[error("Invalid URI or path '{input}': {source}")]
    InvalidUri {
        input: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Unsupported URI scheme: {uri}")]
    UnsupportedScheme { uri: String },

    #[error(
        "Duplicate operationId '{operation_id}' found in: {}",
        locations.join(", ")
    )]
    DuplicateOperationId {
        operation_id: String,
        locations: Vec<String>,
    },

    #[error("Invalid configuration in {path}: {message}")]
    Config { path: String, message: String },

    #[error("Schema not found: {name}")]
    SchemaNotFound { name: String },
}

impl OasError {
    /// Whether this error means the document simply does not exist.
    ///
    /// The loader downgrades these to warnings for referenced documents.
    pub fn is_not_found(&self) -> bool {
        match self {
            OasError::NotFound { .. } => true,
            OasError::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            OasError::HttpStatus { status, .. } => *status == 404,
            _ => false,
        }
    }
}
