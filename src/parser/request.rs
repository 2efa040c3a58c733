//! An owning request head and the handler that builds it.

use crate::parser::handler::{Decision, Rejection, RequestHandler};
use crate::parser::header::HeaderField;
use crate::parser::method::Method;
use crate::parser::request_line::{StartLine, TargetForm};
use crate::parser::version::HttpVersion;
use crate::status::StatusCode;

/// A request head copied out of the receive buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHead {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The method as sent; differs from `method` only for extension methods
    pub method_token: String,
    /// The request target as sent
    pub target: String,
    /// The target up to the first `?`
    pub path: String,
    /// The target after the first `?`
    pub query: String,
    /// Whether `path` still needs percent-decoding
    pub path_has_encoding: bool,
    pub target_form: TargetForm,
    /// The HTTP version
    pub version: HttpVersion,
    /// Header fields in arrival order, names as sent
    pub headers: Vec<(String, Vec<u8>)>,
}

impl RequestHead {
    fn from_start_line(line: &StartLine<'_>) -> Self {
        Self {
            method: line.method,
            method_token: String::from_utf8_lossy(line.method_bytes()).into_owned(),
            target: String::from_utf8_lossy(line.target).into_owned(),
            path: String::from_utf8_lossy(line.path).into_owned(),
            query: String::from_utf8_lossy(line.query).into_owned(),
            path_has_encoding: line.path_has_encoding,
            target_form: line.target_form,
            version: line.version,
            headers: Vec::new(),
        }
    }

    /// Get the first value of a header as raw bytes (case-insensitive name).
    pub fn get_header_bytes(&self, name: &str) -> Option<&[u8]> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_slice())
    }

    /// Get the first value of a header, if it is valid UTF-8.
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.get_header_bytes(name)
            .and_then(|v| std::str::from_utf8(v).ok())
    }

    /// All values of a header, in arrival order.
    pub fn get_headers<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a [u8]> + 'a {
        self.headers
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_slice())
    }

    /// Check if a header exists (case-insensitive).
    pub fn has_header(&self, name: &str) -> bool {
        self.get_header_bytes(name).is_some()
    }

    /// The declared body length, if a valid Content-Length was sent.
    pub fn content_length(&self) -> Option<u64> {
        self.get_header("Content-Length")
            .and_then(|v| v.parse().ok())
    }

    /// Whether the client asked to keep the connection open.
    ///
    /// A `close` token anywhere in `Connection` wins; otherwise `keep-alive`
    /// or an HTTP/1.1 request keeps the connection.
    pub fn is_keep_alive(&self) -> bool {
        let mut keep_alive = false;
        for value in self.get_headers("Connection") {
            let value = String::from_utf8_lossy(value);
            for token in value.split(',').map(str::trim) {
                if token.eq_ignore_ascii_case("close") {
                    return false;
                }
                if token.eq_ignore_ascii_case("keep-alive") {
                    keep_alive = true;
                }
            }
        }
        keep_alive || self.version == HttpVersion::Http11
    }
}

/// Framing checks applied by [`HeadCollector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadPolicy {
    /// Reject HTTP/1.1 requests without exactly one Host header.
    pub require_host: bool,
    /// Reject requests declaring a larger body with `413`.
    pub max_content_length: Option<u64>,
}

impl Default for HeadPolicy {
    fn default() -> Self {
        Self {
            require_host: true,
            max_content_length: None,
        }
    }
}

/// A [`RequestHandler`] that copies every token into a [`RequestHead`].
///
/// On top of the scanner's grammar checks it rejects the header
/// combinations that make message framing ambiguous: duplicate Host,
/// conflicting Content-Length values, and Content-Length together with
/// Transfer-Encoding.
#[derive(Debug, Default)]
pub struct HeadCollector {
    policy: HeadPolicy,
    head: Option<RequestHead>,
    host_count: usize,
    content_length: Option<u64>,
    transfer_encoding: bool,
    complete: bool,
}

impl HeadCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: HeadPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// The head being assembled, complete or not.
    pub fn head(&self) -> Option<&RequestHead> {
        self.head.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Takes the finished head and readies the collector for the next request.
    pub fn take(&mut self) -> Option<RequestHead> {
        if !self.complete {
            return None;
        }
        let head = self.head.take();
        self.clear();
        head
    }

    /// Forgets any partial state.
    pub fn clear(&mut self) {
        self.head = None;
        self.host_count = 0;
        self.content_length = None;
        self.transfer_encoding = false;
        self.complete = false;
    }

    fn check_content_length(&mut self, value: &[u8]) -> Decision {
        let parsed = std::str::from_utf8(value)
            .ok()
            .filter(|v| !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|v| v.parse::<u64>().ok());
        let Some(length) = parsed else {
            return Decision::reject("invalid Content-Length");
        };
        if self.content_length.is_some_and(|seen| seen != length) {
            return Decision::reject("conflicting Content-Length headers");
        }
        if self.policy.max_content_length.is_some_and(|max| length > max) {
            return Decision::Reject(
                Rejection::new("declared body too large").with_status(StatusCode::PayloadTooLarge),
            );
        }
        self.content_length = Some(length);
        Decision::Continue
    }
}

impl RequestHandler for HeadCollector {
    fn on_start_line(&mut self, line: &StartLine<'_>) -> Decision {
        self.clear();
        self.head = Some(RequestHead::from_start_line(line));
        Decision::Continue
    }

    fn on_header(&mut self, field: &HeaderField<'_>) -> Decision {
        if field.name_eq("Host") {
            self.host_count += 1;
            if self.host_count > 1 {
                return Decision::reject("multiple Host headers");
            }
        } else if field.name_eq("Content-Length") {
            if let Decision::Reject(rejection) = self.check_content_length(field.value) {
                return Decision::Reject(rejection);
            }
        } else if field.name_eq("Transfer-Encoding") {
            self.transfer_encoding = true;
        }
        if self.transfer_encoding && self.content_length.is_some() {
            return Decision::reject("both Transfer-Encoding and Content-Length present");
        }

        if let Some(head) = self.head.as_mut() {
            head.headers
                .push((field.name_str().to_string(), field.value.to_vec()));
        }
        Decision::Continue
    }

    fn on_headers_complete(&mut self) -> Decision {
        let needs_host = self
            .head
            .as_ref()
            .is_some_and(|head| head.version == HttpVersion::Http11);
        if self.policy.require_host && needs_host && self.host_count == 0 {
            return Decision::reject("missing Host header");
        }
        self.complete = true;
        Decision::Continue
    }
}
