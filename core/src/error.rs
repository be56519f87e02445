//! Error types for the cloud API client.
//!
//! # Design
//! Failures are split by where they happen. `Validation`, `Serialization`
//! and `Io` are raised while the request is still being assembled, so no
//! bytes have reached the network. `Transport` wraps whatever the injected
//! transport reported and is passed through untouched. `Api` is produced only
//! by the response mediator for non-2xx statuses, carrying the status, the
//! optional machine-readable code and the raw body for debugging.

use std::path::PathBuf;

use bytes::Bytes;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Every failure an [`ApiClient`](crate::ApiClient) call can return.
#[derive(Debug, Error)]
pub enum Error {
    /// Caller-supplied options were rejected before any I/O.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The request payload could not be encoded.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// An attachment could not be opened or read.
    #[error("failed to read attachment {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The server answered with a non-2xx status.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The transport failed before a response was available.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A 2xx response announced JSON but the body did not parse.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// Client configuration could not be loaded.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// The API error carried by this error, if the server rejected the call.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Error::Api(e) => Some(e),
            _ => None,
        }
    }
}

/// A non-2xx response translated into the SDK's error taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("HTTP {status}: {message}")]
pub struct ApiError {
    pub status: u16,
    /// Machine-readable code from the error payload, when the body had one.
    pub code: Option<String>,
    pub message: String,
    pub body: Bytes,
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// The raw body as text, lossily decoded.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Rejection of a pagination option, naming the key and the violated rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unknown option `{key}`")]
    UnknownOption { key: String },

    #[error("option `{key}` must be {expected}")]
    InvalidType { key: String, expected: &'static str },

    #[error("option `{key}` out of range: expected {rule}")]
    OutOfRange { key: String, rule: &'static str },
}

/// Failure reported by a [`Transport`](crate::Transport) implementation.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connection(String),

    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}
