//! Protocol status codes the layer above answers parser faults with.

use std::fmt;

use crate::parser::Error;

/// HTTP status codes a rejected request head can be answered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    BadRequest = 400,
    Forbidden = 403,
    MethodNotAllowed = 405,
    LengthRequired = 411,
    PayloadTooLarge = 413,
    UriTooLong = 414,
    RequestHeaderFieldsTooLarge = 431,
    NotImplemented = 501,
    HttpVersionNotSupported = 505,
}

impl StatusCode {
    /// Get the reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::LengthRequired => "Length Required",
            StatusCode::PayloadTooLarge => "Payload Too Large",
            StatusCode::UriTooLong => "URI Too Long",
            StatusCode::RequestHeaderFieldsTooLarge => "Request Header Fields Too Large",
            StatusCode::NotImplemented => "Not Implemented",
            StatusCode::HttpVersionNotSupported => "HTTP Version Not Supported",
        }
    }

    /// The numeric code.
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Maps a parser fault to the status the connection should answer with
    /// before closing.
    pub fn for_error(error: &Error) -> Self {
        match error {
            Error::LineTooLong { .. } => StatusCode::UriTooLong,
            Error::HeadersTooLarge(_) => StatusCode::RequestHeaderFieldsTooLarge,
            Error::BadVersion(_) => StatusCode::HttpVersionNotSupported,
            Error::RejectedByHandler(rejection) => {
                rejection.status().unwrap_or(StatusCode::BadRequest)
            }
            Error::BadMethod(_)
            | Error::BadTarget(_)
            | Error::ObsoleteLineFolding
            | Error::InvalidHeaderName(_)
            | Error::MalformedHeaderLine(_)
            | Error::MalformedLineEnding
            | Error::ConnectionClosedPrematurely => StatusCode::BadRequest,
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}
