//! Header-line recognition.

use memchr::memchr;

use crate::parser::error::{Error, HeaderLimit};
use crate::parser::limits::ParserLimits;
use crate::parser::request_line::Scan;
use crate::parser::token::{
    escape_preview, find_line_end, is_forbidden_value_byte, is_token, trim_lws, LineEnd, COLON,
    CR, HTAB, LF, SP,
};

/// A single header field.
///
/// `name` and `value` borrow the receive buffer and are only valid for the
/// duration of the handler callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderField<'a> {
    pub name: &'a [u8],
    /// The value with surrounding SP / HTAB removed.
    pub value: &'a [u8],
    /// Length of the line on the wire, CRLF included.
    pub line_len: usize,
}

impl<'a> HeaderField<'a> {
    /// Case-insensitive name comparison.
    pub fn name_eq(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.as_bytes())
    }

    /// The name as a string. Names are token bytes, so this always succeeds
    /// for a field the scanner produced.
    pub fn name_str(&self) -> &'a str {
        std::str::from_utf8(self.name).unwrap_or_default()
    }

    pub fn value_str(&self) -> Option<&'a str> {
        std::str::from_utf8(self.value).ok()
    }
}

/// One recognized header-section line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HeaderLine<'a> {
    Field(HeaderField<'a>),
    /// The blank line closing the header section.
    End,
}

/// Header resources already used by the current request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct HeaderUsage {
    pub count: usize,
    pub bytes: usize,
}

/// Scans the header line at the start of `buf`.
///
/// Per-line length, cumulative block size, and field count are checked on
/// every call, so an attacker dribbling an endless line is cut off once the
/// tighter of the line and block budgets is used up.
pub(crate) fn scan_header_line<'a>(
    buf: &'a [u8],
    resume: usize,
    limits: &ParserLimits,
    usage: HeaderUsage,
) -> Result<Scan<HeaderLine<'a>>, Error> {
    let Some(&first) = buf.first() else {
        return Ok(Scan::Incomplete { resume: 0 });
    };
    match first {
        SP | HTAB => return Err(Error::ObsoleteLineFolding),
        LF => return Err(Error::MalformedLineEnding),
        CR => return scan_end_of_headers(buf, limits, usage),
        _ => {}
    }
    if usage.count >= limits.max_header_count {
        return Err(Error::HeadersTooLarge(HeaderLimit::Count(
            limits.max_header_count,
        )));
    }

    let remaining = limits.max_header_bytes.saturating_sub(usage.bytes);
    let (cap, exceeded) = if limits.max_header_line_len <= remaining {
        (
            limits.max_header_line_len,
            HeaderLimit::LineLength(limits.max_header_line_len),
        )
    } else {
        (remaining, HeaderLimit::TotalBytes(limits.max_header_bytes))
    };

    let window = &buf[..buf.len().min(cap)];
    let cr = match find_line_end(window, resume)? {
        LineEnd::Found(cr) => cr,
        LineEnd::Pending(next) => {
            if buf.len() >= cap {
                return Err(Error::HeadersTooLarge(exceeded));
            }
            return Ok(Scan::Incomplete { resume: next });
        }
    };

    let field = parse_field(&buf[..cr])?;
    Ok(Scan::Complete {
        token: HeaderLine::Field(field),
        consumed: field.line_len,
    })
}

fn scan_end_of_headers<'a>(
    buf: &'a [u8],
    limits: &ParserLimits,
    usage: HeaderUsage,
) -> Result<Scan<HeaderLine<'a>>, Error> {
    match buf.get(1) {
        None => Ok(Scan::Incomplete { resume: 0 }),
        Some(&LF) => {
            if usage.bytes + 2 > limits.max_header_bytes {
                return Err(Error::HeadersTooLarge(HeaderLimit::TotalBytes(
                    limits.max_header_bytes,
                )));
            }
            Ok(Scan::Complete {
                token: HeaderLine::End,
                consumed: 2,
            })
        }
        Some(_) => Err(Error::MalformedLineEnding),
    }
}

fn parse_field(line: &[u8]) -> Result<HeaderField<'_>, Error> {
    let colon =
        memchr(COLON, line).ok_or_else(|| Error::MalformedHeaderLine(escape_preview(line)))?;
    let name = &line[..colon];
    if !is_token(name) {
        return Err(Error::InvalidHeaderName(escape_preview(name)));
    }
    let value = trim_lws(&line[colon + 1..]);
    if value.iter().any(|&b| is_forbidden_value_byte(b)) {
        return Err(Error::MalformedHeaderLine(escape_preview(line)));
    }
    Ok(HeaderField {
        name,
        value,
        line_len: line.len() + 2,
    })
}
