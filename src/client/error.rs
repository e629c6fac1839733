//! Session error type and the warning/error taxonomy

use crate::backend::BackendError;
use crate::config::ConfigError;
use crate::schema::SchemaError;
use crate::store::StoreError;
use std::fmt;
use thiserror::Error;

/// Coarse classification shared by errors and warnings.
///
/// Errors map onto it through [`VfbError::kind`]. Conditions that do not
/// abort an operation (an empty result, an ambiguous match, a failed accessor
/// query) are logged as `warn` events with a `kind` field holding one of
/// these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnresolvedKey,
    EmptyResult,
    Transport,
    AmbiguousMatch,
    MalformedDocument,
    Internal,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::UnresolvedKey => "unresolved_key",
            ErrorKind::EmptyResult => "empty_result",
            ErrorKind::Transport => "transport",
            ErrorKind::AmbiguousMatch => "ambiguous_match",
            ErrorKind::MalformedDocument => "malformed_document",
            ErrorKind::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during session operations
#[derive(Debug, Error)]
pub enum VfbError {
    #[error("Unrecognized key: {0}")]
    UnresolvedKey(String),

    #[error("Query includes unknown term label '{label}': {expression}")]
    UnknownLabel { label: String, expression: String },

    #[error(transparent)]
    MalformedDocument(#[from] SchemaError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Session has been dropped")]
    SessionClosed,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

}

impl VfbError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VfbError::UnresolvedKey(_) | VfbError::UnknownLabel { .. } => ErrorKind::UnresolvedKey,
            VfbError::MalformedDocument(_) => ErrorKind::MalformedDocument,
            VfbError::Backend(_) => ErrorKind::Transport,
            VfbError::Store(_)
            | VfbError::Config(_)
            | VfbError::SessionClosed
            | VfbError::Serialization(_) => ErrorKind::Internal,
        }
    }
}

/// Result type for session operations
pub type VfbResult<T> = Result<T, VfbError>;
