//! Error types for kvdoc
//!
//! Provides a unified error type for all operations.

use std::io;

use thiserror::Error;

/// Result type alias using KvDocError
pub type Result<T> = std::result::Result<T, KvDocError>;

/// Unified error type for kvdoc operations
#[derive(Debug, Error)]
pub enum KvDocError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("Connection failure: {0}")]
    ConnectionFailure(String),

    #[error("Store rejected request: {0}")]
    StoreRejected(String),

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Deadline exceeded")]
    DeadlineExceeded,

    // -------------------------------------------------------------------------
    // Encoding Errors
    // -------------------------------------------------------------------------
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl KvDocError {
    /// Returns `true` if this error means the requested key was absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, KvDocError::NotFound(_))
    }

    /// Returns `true` if the connection that produced this error can no
    /// longer be trusted to be in sync with the server.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            KvDocError::Io(_)
                | KvDocError::ConnectionFailure(_)
                | KvDocError::DeadlineExceeded
                | KvDocError::Protocol(_)
        )
    }

    /// Classifies an I/O error raised while talking to the store.
    ///
    /// Socket timeouts surface as `WouldBlock` on Unix and `TimedOut` on
    /// Windows; both mean the caller's deadline ran out.
    pub(crate) fn from_transport(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => KvDocError::DeadlineExceeded,
            _ => KvDocError::ConnectionFailure(err.to_string()),
        }
    }

    /// Like [`from_transport`](Self::from_transport), but leaves non-I/O
    /// errors (protocol violations, rejections) untouched.
    pub(crate) fn into_transport(self) -> Self {
        match self {
            KvDocError::Io(err) => Self::from_transport(err),
            other => other,
        }
    }
}
