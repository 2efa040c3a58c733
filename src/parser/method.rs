//! HTTP request methods.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::parser::error::Error;

/// HTTP request methods as defined in RFC 9110, plus a marker for
/// extension methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Method {
    /// GET method: Requests a representation of the specified resource.
    GET,
    /// HEAD method: Same as GET but only transfers the status line and header section.
    HEAD,
    /// POST method: Submits data to be processed to the identified resource.
    POST,
    /// PUT method: Replaces all current representations of the target resource with the request payload.
    PUT,
    /// DELETE method: Deletes the specified resource.
    DELETE,
    /// CONNECT method: Establishes a tunnel to the server identified by the target.
    CONNECT,
    /// OPTIONS method: Describes the communication options for the target resource.
    OPTIONS,
    /// TRACE method: Performs a message loop-back test along the path to the target resource.
    TRACE,
    /// PATCH method: Applies partial modifications to a resource.
    PATCH,
    /// A grammatically valid method outside the set above. The raw token is
    /// carried next to the method wherever one is recognized.
    Custom,
}

impl Method {
    pub(crate) const COUNT: usize = 10;

    /// Classifies a method token. Comparison is case-sensitive; anything not
    /// in the fixed set yields `None`.
    pub fn from_bytes(token: &[u8]) -> Option<Self> {
        match token {
            b"GET" => Some(Method::GET),
            b"HEAD" => Some(Method::HEAD),
            b"POST" => Some(Method::POST),
            b"PUT" => Some(Method::PUT),
            b"DELETE" => Some(Method::DELETE),
            b"CONNECT" => Some(Method::CONNECT),
            b"OPTIONS" => Some(Method::OPTIONS),
            b"TRACE" => Some(Method::TRACE),
            b"PATCH" => Some(Method::PATCH),
            _ => None,
        }
    }

    /// The wire spelling of a standard method; empty for [`Method::Custom`].
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            Method::GET => b"GET",
            Method::HEAD => b"HEAD",
            Method::POST => b"POST",
            Method::PUT => b"PUT",
            Method::DELETE => b"DELETE",
            Method::CONNECT => b"CONNECT",
            Method::OPTIONS => b"OPTIONS",
            Method::TRACE => b"TRACE",
            Method::PATCH => b"PATCH",
            Method::Custom => b"",
        }
    }

    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::from_bytes(s.as_bytes()).ok_or_else(|| Error::BadMethod(s.to_string()))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}
