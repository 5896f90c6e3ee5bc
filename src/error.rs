//!
//! Client-facing error taxonomy
//!
use thiserror::Error;

use crate::model::StatusCode;
use crate::parser::IppParseError;

/// Errors a [`crate::client::CupsClient`] call can return.
#[derive(Debug, Error)]
pub enum IppClientError {
    /// The underlying connection could not be established or was dropped.
    #[error("transport error: {0}")]
    Transport(String),

    /// The HTTP layer returned a non-2xx status unrelated to IPP semantics.
    #[error("HTTP error: {code}")]
    Http { code: u16 },

    /// The response body did not parse as a well-formed IPP message.
    #[error("protocol error: {0}")]
    Protocol(#[from] IppParseError),

    /// The IPP response carried a client- or server-error status.
    #[error("IPP status {code}: {message:?}")]
    IppStatus { code: StatusCode, message: Option<String> },

    /// A caller-supplied argument failed local validation before any request
    /// was sent (e.g. an out-of-range copy count or an unparseable page range).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The request did not complete within the configured timeout.
    #[error("operation timed out")]
    Timeout,

    /// The server requires authentication and none (or insufficient)
    /// credentials were supplied.
    #[error("authentication required")]
    AuthRequired,
}

pub type Result<T> = std::result::Result<T, IppClientError>;
