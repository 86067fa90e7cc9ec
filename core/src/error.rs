//! Error types for the PayWhirl client.
//!
//! # Design
//! Non-200 statuses are not errors at the dispatch level: they come back as
//! `Reply::Status` so callers keep the data-or-status contract. `ApiError`
//! covers everything else (the network, undecodable bodies, malformed
//! parameters) plus the statuses surfaced by the strict `Reply::into_result`.

use thiserror::Error;

/// Errors returned by `PayWhirl` dispatch and endpoint methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404. Only produced by `Reply::into_result`.
    #[error("resource not found")]
    NotFound,

    /// The server returned a status other than 200 and 404. Only produced by
    /// `Reply::into_result`.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// DNS resolution failed, or the connection was refused or reset.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Any other transport-level failure (TLS, protocol, bad URL).
    #[error("transport error: {0}")]
    Transport(String),

    /// A 200 response body was not valid JSON.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// Parameters could not be turned into a query mapping, or an endpoint
    /// path could not be rendered.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
}

impl ApiError {
    /// HTTP status carried by this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::NotFound => Some(404),
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// `true` when the request never produced an HTTP response.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ApiError::Timeout | ApiError::Connection(_) | ApiError::Transport(_)
        )
    }
}
