//! Unified error types for cep-cache.
//!
//! [`Error`] covers storage-level faults. [`LookupError`] is the taxonomy the
//! lookup orchestrator returns and the boundaries translate into responses.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

use crate::cep::InvalidFormat;
use crate::provider::ProviderError;
use crate::response::{INTERNAL_ERROR_MESSAGE, INVALID_CEP_MESSAGE, NOT_FOUND_MESSAGE, UPSTREAM_ERROR_MESSAGE};

/// Storage-level errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// A stored row could not be turned back into an address record.
    #[error("CACHE_ERROR: invalid record for {cep}: {reason}")]
    InvalidRecord { cep: String, reason: String },
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

/// Outcome taxonomy of a CEP lookup.
///
/// The string payloads carry server-side detail for logs. Callers only ever
/// see [`LookupError::public_message`].
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// The input is not an 8-digit CEP. No I/O was performed.
    #[error("INVALID_FORMAT: {0}")]
    InvalidFormat(#[from] InvalidFormat),

    /// The provider answered authoritatively that the CEP does not exist.
    #[error("NOT_FOUND: {0}")]
    NotFound(String),

    /// The provider could not be reached or answered with a failure status.
    #[error("UPSTREAM_UNAVAILABLE: {0}")]
    UpstreamUnavailable(String),

    /// Anything unexpected: store faults, provider payloads we cannot map.
    #[error("INTERNAL: {0}")]
    Internal(String),
}

impl LookupError {
    /// Message safe to return to the caller.
    pub fn public_message(&self) -> &'static str {
        match self {
            LookupError::InvalidFormat(_) => INVALID_CEP_MESSAGE,
            LookupError::NotFound(_) => NOT_FOUND_MESSAGE,
            LookupError::UpstreamUnavailable(_) => UPSTREAM_ERROR_MESSAGE,
            LookupError::Internal(_) => INTERNAL_ERROR_MESSAGE,
        }
    }
}

impl From<Error> for LookupError {
    fn from(err: Error) -> Self {
        LookupError::Internal(err.to_string())
    }
}

impl From<ProviderError> for LookupError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Unavailable(msg) => LookupError::UpstreamUnavailable(msg),
            ProviderError::Malformed(msg) => LookupError::Internal(format!("unexpected provider payload: {msg}")),
        }
    }
}

impl From<LookupError> for McpError {
    fn from(err: LookupError) -> Self {
        let code = match &err {
            LookupError::InvalidFormat(_) => -32602,
            LookupError::NotFound(_) => -32001,
            LookupError::UpstreamUnavailable(_) => -32008,
            LookupError::Internal(_) => -32603,
        };

        McpError { code: ErrorCode(code), message: err.public_message().into(), data: None }
    }
}
