//! Error types for catalog operations.
//!
//! This module defines [`Error`], the primary error type for all catalog
//! operations, along with a convenient [`Result`] type alias.

use common::StorageError;

/// Error type for catalog operations.
///
/// # Error Categories
///
/// - [`Validation`](Error::Validation): the caller supplied invalid input,
///   such as a missing recipe id or a path-escaping object key.
/// - [`Transcode`](Error::Transcode): a source image could not be decoded
///   or re-encoded.
/// - [`Storage`](Error::Storage): the object store failed (I/O, network,
///   authorization).
/// - [`Internal`](Error::Internal): unexpected conditions that indicate a
///   bug or a stopped component.
///
/// A missing recipe on delete is deliberately not an error: deletion is
/// idempotent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid input or parameter errors.
    Validation(String),

    /// A source image could not be decoded or re-encoded.
    Transcode(String),

    /// Errors from the underlying object store.
    Storage(String),

    /// Internal errors indicating bugs or invariant violations.
    Internal(String),
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Validation(msg) => write!(f, "validation error: {}", msg),
            Error::Transcode(msg) => write!(f, "transcode error: {}", msg),
            Error::Storage(msg) => write!(f, "storage error: {}", msg),
            Error::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            // A bad key is a caller mistake, not a backend failure.
            StorageError::InvalidKey(msg) => Error::Validation(msg),
            StorageError::Io(msg) => Error::Storage(msg),
            StorageError::Remote(msg) => Error::Storage(msg),
        }
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Validation(msg.to_string())
    }
}

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;
