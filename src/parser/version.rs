//! HTTP protocol versions.

use std::fmt;
use std::str::FromStr;

use crate::parser::error::Error;

/// Supported HTTP protocol versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpVersion {
    Http10,
    Http11,
}

impl HttpVersion {
    /// Matches the version token byte-for-byte. There is no tolerance for
    /// case differences, extra whitespace, or other minor versions.
    pub fn from_bytes(token: &[u8]) -> Option<Self> {
        match token {
            b"HTTP/1.0" => Some(HttpVersion::Http10),
            b"HTTP/1.1" => Some(HttpVersion::Http11),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVersion::Http10 => "HTTP/1.0",
            HttpVersion::Http11 => "HTTP/1.1",
        }
    }
}

impl FromStr for HttpVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpVersion::from_bytes(s.as_bytes()).ok_or_else(|| Error::BadVersion(s.to_string()))
    }
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
