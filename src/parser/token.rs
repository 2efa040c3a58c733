//! Stateless byte-level primitives shared by the line scanners.

use memchr::memchr2;

use crate::parser::error::Error;

pub(crate) const SP: u8 = b' ';
pub(crate) const HTAB: u8 = b'\t';
pub(crate) const CR: u8 = b'\r';
pub(crate) const LF: u8 = b'\n';
pub(crate) const COLON: u8 = b':';
pub(crate) const QUESTION: u8 = b'?';
pub(crate) const PERCENT: u8 = b'%';

/// Longest byte preview copied into an error detail.
const PREVIEW_LEN: usize = 64;

/// RFC 9110 `tchar`: visible ASCII minus the separator set.
static TCHAR: [bool; 256] = build_tchar_table();

const fn build_tchar_table() -> [bool; 256] {
    let mut table = [false; 256];
    let mut b = 0usize;
    while b < 256 {
        table[b] = matches!(
            b as u8,
            b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^' | b'_'
                | b'`' | b'|' | b'~' | b'0'..=b'9' | b'A'..=b'Z' | b'a'..=b'z'
        );
        b += 1;
    }
    table
}

/// Where the current line stands after a terminator search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineEnd {
    /// CRLF found; the index is the CR.
    Found(usize),
    /// No complete terminator yet; resume searching at this index.
    Pending(usize),
}

#[inline]
pub(crate) fn is_token_char(b: u8) -> bool {
    TCHAR[b as usize]
}

/// A non-empty run of `tchar`.
#[inline]
pub(crate) fn is_token(bytes: &[u8]) -> bool {
    !bytes.is_empty() && bytes.iter().all(|&b| is_token_char(b))
}

/// Printable ASCII, excluding space.
#[inline]
pub(crate) fn is_visible(b: u8) -> bool {
    (0x21..=0x7e).contains(&b)
}

/// Control bytes allowed nowhere in a header value. HTAB is the exception.
#[inline]
pub(crate) fn is_forbidden_value_byte(b: u8) -> bool {
    (b < 0x20 && b != HTAB) || b == 0x7f
}

/// Strips leading and trailing SP / HTAB.
pub(crate) fn trim_lws(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|&b| b != SP && b != HTAB)
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|&b| b != SP && b != HTAB)
        .map_or(start, |i| i + 1);
    &bytes[start..end]
}

/// Searches `buf[from..]` for the line terminator.
///
/// Only CRLF terminates a line. A bare LF, or a CR followed by any other
/// byte, is rejected the moment it is seen. A trailing CR with nothing after
/// it yet is left pending so the next search starts on it.
pub(crate) fn find_line_end(buf: &[u8], from: usize) -> Result<LineEnd, Error> {
    let from = from.min(buf.len());
    let Some(offset) = memchr2(CR, LF, &buf[from..]) else {
        return Ok(LineEnd::Pending(buf.len()));
    };
    let at = from + offset;
    if buf[at] == LF {
        return Err(Error::MalformedLineEnding);
    }
    match buf.get(at + 1) {
        Some(&LF) => Ok(LineEnd::Found(at)),
        Some(_) => Err(Error::MalformedLineEnding),
        None => Ok(LineEnd::Pending(at)),
    }
}

/// Renders up to [`PREVIEW_LEN`] bytes for an error message, escaping
/// anything that is not printable ASCII.
pub(crate) fn escape_preview(bytes: &[u8]) -> String {
    let shown = &bytes[..bytes.len().min(PREVIEW_LEN)];
    let mut out = String::with_capacity(shown.len() + 3);
    for &b in shown {
        if b == SP || is_visible(b) {
            out.push(b as char);
        } else {
            out.push_str(&format!("\\x{b:02X}"));
        }
    }
    if bytes.len() > PREVIEW_LEN {
        out.push_str("...");
    }
    out
}
