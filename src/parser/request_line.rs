//! Request-line recognition: method, target, version.

use memchr::memchr;

use crate::parser::error::Error;
use crate::parser::limits::TargetPolicy;
use crate::parser::method::Method;
use crate::parser::token::{
    escape_preview, find_line_end, is_token, is_visible, LineEnd, COLON, PERCENT, QUESTION, SP,
};
use crate::parser::version::HttpVersion;

/// The shape of a request target (RFC 9112 section 3.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetForm {
    /// `/path?query`
    Origin,
    /// `scheme://authority/path?query`
    Absolute,
    /// `host:port`
    Authority,
    /// `*`
    Asterisk,
}

/// A recognized request line.
///
/// Every slice borrows the receive buffer and is only valid while the
/// handler callback that received it runs. Copy out anything that must
/// outlive the callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartLine<'a> {
    pub method: Method,
    /// The raw verb when `method` is [`Method::Custom`], empty otherwise.
    pub custom_method: &'a [u8],
    pub version: HttpVersion,
    /// The target exactly as sent.
    pub target: &'a [u8],
    /// The target up to the first `?`.
    pub path: &'a [u8],
    /// The target after the first `?`; empty when there is none.
    pub query: &'a [u8],
    /// The path contains `%` and must be percent-decoded before use.
    pub path_has_encoding: bool,
    pub target_form: TargetForm,
}

impl<'a> StartLine<'a> {
    /// The method as it appeared on the wire.
    pub fn method_bytes(&self) -> &'a [u8] {
        match self.method {
            Method::Custom => self.custom_method,
            method => method.as_bytes(),
        }
    }

    /// The path as a string. Targets are ASCII-only, so this never fails for
    /// a line the scanner accepted.
    pub fn path_str(&self) -> Option<&'a str> {
        std::str::from_utf8(self.path).ok()
    }

    pub fn query_str(&self) -> Option<&'a str> {
        std::str::from_utf8(self.query).ok()
    }
}

/// Outcome of a single scanner call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scan<T> {
    /// The line is not complete; nothing was consumed. Searching resumes at
    /// `resume` on the next call.
    Incomplete { resume: usize },
    /// A token was recognized; `consumed` includes the CRLF.
    Complete { token: T, consumed: usize },
}

/// Scans the request line at the start of `buf`.
///
/// `resume` is the offset already searched by previous calls for this line.
/// The length limit applies to the whole line including CRLF and is checked
/// on every call, so a line that never terminates fails as soon as it
/// reaches `max_len` bytes.
pub(crate) fn scan_request_line<'a>(
    buf: &'a [u8],
    resume: usize,
    max_len: usize,
    policy: &TargetPolicy,
) -> Result<Scan<StartLine<'a>>, Error> {
    let window = &buf[..buf.len().min(max_len)];
    let cr = match find_line_end(window, resume)? {
        LineEnd::Found(cr) => cr,
        LineEnd::Pending(next) => {
            if buf.len() >= max_len {
                return Err(Error::LineTooLong { limit: max_len });
            }
            return Ok(Scan::Incomplete { resume: next });
        }
    };

    let token = parse_start_line(&buf[..cr], policy)?;
    Ok(Scan::Complete {
        token,
        consumed: cr + 2,
    })
}

fn parse_start_line<'a>(line: &'a [u8], policy: &TargetPolicy) -> Result<StartLine<'a>, Error> {
    let method_end = memchr(SP, line).ok_or_else(|| Error::BadMethod(escape_preview(line)))?;
    let method_token = &line[..method_end];
    let (method, custom_method) = match Method::from_bytes(method_token) {
        Some(method) => (method, &line[..0]),
        None if is_token(method_token) => (Method::Custom, method_token),
        None => return Err(Error::BadMethod(escape_preview(method_token))),
    };

    let rest = &line[method_end + 1..];
    let Some(target_end) = memchr(SP, rest) else {
        // Either no target or no version; a lone token cannot be both.
        return if rest.is_empty() {
            Err(Error::BadTarget(String::new()))
        } else {
            Err(Error::BadVersion(String::new()))
        };
    };
    let target = &rest[..target_end];
    let target_form = classify_target(target)
        .ok_or_else(|| Error::BadTarget(escape_preview(target)))?;
    if !policy.permits(method, target_form) {
        return Err(Error::BadTarget(format!(
            "{} not allowed for {}",
            escape_preview(target),
            escape_preview(method_token)
        )));
    }

    let version_token = &rest[target_end + 1..];
    let version = HttpVersion::from_bytes(version_token)
        .ok_or_else(|| Error::BadVersion(escape_preview(version_token)))?;

    let (path, query) = match target_form {
        TargetForm::Origin | TargetForm::Absolute => match memchr(QUESTION, target) {
            Some(q) => (&target[..q], &target[q + 1..]),
            None => (target, &target[target.len()..]),
        },
        TargetForm::Authority | TargetForm::Asterisk => (target, &target[target.len()..]),
    };

    Ok(StartLine {
        method,
        custom_method,
        version,
        target,
        path,
        query,
        path_has_encoding: memchr(PERCENT, path).is_some(),
        target_form,
    })
}

/// Determines the target form, or `None` when the bytes fit none of them.
fn classify_target(target: &[u8]) -> Option<TargetForm> {
    if target.is_empty() || !target.iter().all(|&b| is_visible(b) && b != b'#') {
        return None;
    }
    if target[0] == b'/' {
        return Some(TargetForm::Origin);
    }
    if target == b"*" {
        return Some(TargetForm::Asterisk);
    }
    if is_absolute_form(target) {
        return Some(TargetForm::Absolute);
    }
    if is_authority_form(target) {
        return Some(TargetForm::Authority);
    }
    None
}

/// `scheme "://" authority ...` with a non-empty authority.
fn is_absolute_form(target: &[u8]) -> bool {
    let Some(colon) = memchr(COLON, target) else {
        return false;
    };
    let scheme = &target[..colon];
    let valid_scheme = scheme.first().is_some_and(u8::is_ascii_alphabetic)
        && scheme
            .iter()
            .all(|&b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.'));
    let after = &target[colon + 1..];
    valid_scheme && after.starts_with(b"//") && after.len() > 2 && after[2] != b'/'
}

/// `host ":" port` with a non-empty host and a decimal port.
fn is_authority_form(target: &[u8]) -> bool {
    if target.iter().any(|&b| matches!(b, b'/' | b'?' | b'@')) {
        return false;
    }
    let Some(colon) = target.iter().rposition(|&b| b == COLON) else {
        return false;
    };
    let (host, port) = (&target[..colon], &target[colon + 1..]);
    !host.is_empty() && !port.is_empty() && port.len() <= 5 && port.iter().all(u8::is_ascii_digit)
}
