//! The push-style contract between the parser and the layer above it.

use std::borrow::Cow;
use std::fmt;

use crate::parser::error::Error;
use crate::parser::header::HeaderField;
use crate::parser::request_line::StartLine;
use crate::status::StatusCode;

/// What the handler wants the parser to do after a callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Continue,
    /// Stop parsing; the parser faults with [`Error::RejectedByHandler`].
    Reject(Rejection),
}

impl Decision {
    /// Shorthand for `Decision::Reject(Rejection::new(reason))`.
    pub fn reject(reason: impl Into<Cow<'static, str>>) -> Self {
        Decision::Reject(Rejection::new(reason))
    }
}

/// Why a handler refused a request, and optionally how to answer it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    reason: Cow<'static, str>,
    status: Option<StatusCode>,
}

impl Rejection {
    pub fn new(reason: impl Into<Cow<'static, str>>) -> Self {
        Self {
            reason: reason.into(),
            status: None,
        }
    }

    /// Overrides the default `400 Bad Request` answer.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

/// Receives each token as the parser recognizes it.
///
/// Callbacks run inline inside [`RequestParser::parse`] and block it until
/// they return, so they must not do blocking work. The borrowed views passed
/// in are valid only until the callback returns; copy whatever must be kept.
///
/// [`RequestParser::parse`]: crate::parser::RequestParser::parse
pub trait RequestHandler {
    fn on_start_line(&mut self, line: &StartLine<'_>) -> Decision;

    fn on_header(&mut self, field: &HeaderField<'_>) -> Decision;

    fn on_headers_complete(&mut self) -> Decision;

    /// Called exactly once, when the parser first faults.
    fn on_error(&mut self, _error: &Error) {}
}

impl<H: RequestHandler + ?Sized> RequestHandler for &mut H {
    fn on_start_line(&mut self, line: &StartLine<'_>) -> Decision {
        (**self).on_start_line(line)
    }

    fn on_header(&mut self, field: &HeaderField<'_>) -> Decision {
        (**self).on_header(field)
    }

    fn on_headers_complete(&mut self) -> Decision {
        (**self).on_headers_complete()
    }

    fn on_error(&mut self, error: &Error) {
        (**self).on_error(error)
    }
}
