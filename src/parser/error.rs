//! Error types for the request-head parser.

use std::fmt;

use thiserror::Error;

use crate::parser::handler::Rejection;

/// Terminal faults raised while parsing a request head.
///
/// Every variant is terminal for the request and for the connection. The
/// parser keeps the first fault it raises and hands back a clone of it on
/// every later call, so the type is `Clone + Eq`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The method token is missing or contains non-token bytes.
    #[error("Invalid request method: {0}")]
    BadMethod(String),

    /// The request target is missing, malformed, or not allowed for the method.
    #[error("Invalid request target: {0}")]
    BadTarget(String),

    /// The version is not exactly `HTTP/1.0` or `HTTP/1.1`.
    #[error("Unrecognized HTTP version: {0}")]
    BadVersion(String),

    /// The request line grew past the configured maximum.
    #[error("Request line exceeds {limit} bytes")]
    LineTooLong { limit: usize },

    /// A header line starts with whitespace.
    #[error("Header line starts with whitespace (obsolete line folding)")]
    ObsoleteLineFolding,

    /// The header name is empty or contains non-token bytes.
    #[error("Invalid header name: {0}")]
    InvalidHeaderName(String),

    /// The header line has no colon, or its value holds control bytes.
    #[error("Malformed header line: {0}")]
    MalformedHeaderLine(String),

    /// A line ended in a bare LF, or a CR was followed by something other than LF.
    #[error("Line terminator is not CRLF")]
    MalformedLineEnding,

    /// A header line, the header block, or the header count went over its limit.
    #[error("Request headers too large: {0}")]
    HeadersTooLarge(HeaderLimit),

    /// The connection went away with a request head only partially received.
    #[error("Connection closed before the request head was complete")]
    ConnectionClosedPrematurely,

    /// The handler vetoed the request.
    #[error("Request rejected: {0}")]
    RejectedByHandler(Rejection),
}

/// Which header limit was exceeded, with the configured value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderLimit {
    LineLength(usize),
    TotalBytes(usize),
    Count(usize),
}

impl fmt::Display for HeaderLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderLimit::LineLength(limit) => write!(f, "header line longer than {limit} bytes"),
            HeaderLimit::TotalBytes(limit) => write!(f, "header block larger than {limit} bytes"),
            HeaderLimit::Count(limit) => write!(f, "more than {limit} header fields"),
        }
    }
}

/// Field-less classification of [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadMethod,
    BadTarget,
    BadVersion,
    LineTooLong,
    ObsoleteLineFolding,
    InvalidHeaderName,
    MalformedHeaderLine,
    MalformedLineEnding,
    HeadersTooLarge,
    ConnectionClosedPrematurely,
    RejectedByHandler,
}

impl Error {
    /// The kind of this error, without its detail.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::BadMethod(_) => ErrorKind::BadMethod,
            Error::BadTarget(_) => ErrorKind::BadTarget,
            Error::BadVersion(_) => ErrorKind::BadVersion,
            Error::LineTooLong { .. } => ErrorKind::LineTooLong,
            Error::ObsoleteLineFolding => ErrorKind::ObsoleteLineFolding,
            Error::InvalidHeaderName(_) => ErrorKind::InvalidHeaderName,
            Error::MalformedHeaderLine(_) => ErrorKind::MalformedHeaderLine,
            Error::MalformedLineEnding => ErrorKind::MalformedLineEnding,
            Error::HeadersTooLarge(_) => ErrorKind::HeadersTooLarge,
            Error::ConnectionClosedPrematurely => ErrorKind::ConnectionClosedPrematurely,
            Error::RejectedByHandler(_) => ErrorKind::RejectedByHandler,
        }
    }

    /// The escaped preview of the offending bytes, or the rejection reason,
    /// when the error carries one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Error::BadMethod(detail)
            | Error::BadTarget(detail)
            | Error::BadVersion(detail)
            | Error::InvalidHeaderName(detail)
            | Error::MalformedHeaderLine(detail) => Some(detail),
            Error::RejectedByHandler(rejection) => Some(rejection.reason()),
            _ => None,
        }
    }
}

/// Errors raised while building a parser configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A limit was configured as zero.
    #[error("Parser limit `{0}` must be greater than zero")]
    ZeroLimit(&'static str),

    /// A single header line could never fit the header block.
    #[error("max_header_line_len ({line}) exceeds max_header_bytes ({total})")]
    InconsistentHeaderLimits { line: usize, total: usize },

    /// The receive buffer cannot hold a line the parser would still accept.
    #[error("max_buffer_len ({buffer}) is smaller than the longest accepted line ({line})")]
    BufferTooSmall { buffer: usize, line: usize },

    /// The configuration document could not be read.
    #[error("Invalid parser configuration: {0}")]
    Json(#[from] serde_json::Error),
}
