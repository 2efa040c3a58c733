//! An incremental, zero-copy HTTP/1.x request-head parser.
//!
//! The parser consumes the request line and header section of an HTTP/1.0 or
//! HTTP/1.1 request from whatever bytes have arrived so far. Each recognized
//! token is pushed to a [`RequestHandler`] as a view into the caller's
//! buffer, and the caller learns how many leading bytes it may release.
//!
//! # Features
//!
//! - Resumable parsing across arbitrarily fragmented deliveries
//! - Borrowed views for method, target, path, query, and header fields
//! - Explicit limits on request-line length, header-line length, header count,
//!   and total header size, loadable from JSON
//! - Configurable target-form policy (origin, absolute, authority, asterisk)
//! - Handler veto with an optional status code for the error response
//! - An async connection driver for tokio streams with a drain hook
//!
//! # Examples
//!
//! ## Basic usage
//!
//! ```
//! use h1_intake::{HeadCollector, ParserLimits, RequestParser};
//!
//! let limits = ParserLimits::new(8192, 8192, 65536, 100).unwrap();
//! let mut parser = RequestParser::new(limits).unwrap();
//! let mut collector = HeadCollector::new();
//!
//! let mut buf = b"GET /index.html?lang=en HTTP/1.1\r\nHo".to_vec();
//! let progress = parser.parse(&buf, &mut collector).unwrap();
//! assert!(!progress.is_complete());
//! buf.drain(..progress.consumed);
//!
//! buf.extend_from_slice(b"st: example.com\r\n\r\n");
//! let progress = parser.parse(&buf, &mut collector).unwrap();
//! assert!(progress.is_complete());
//!
//! let head = collector.take().unwrap();
//! assert_eq!(head.path, "/index.html");
//! assert_eq!(head.query, "lang=en");
//! assert_eq!(head.get_header("Host"), Some("example.com"));
//! ```
//!
//! ## Error handling
//!
//! ```
//! use h1_intake::{HeadCollector, ParserError, ParserLimits, RequestParser, StatusCode};
//!
//! let limits = ParserLimits::new(8192, 8192, 65536, 100).unwrap();
//! let mut parser = RequestParser::new(limits).unwrap();
//!
//! match parser.parse(b"GET / HTTP/2.0\r\n", &mut HeadCollector::new()) {
//!     Ok(_) => println!("Request head accepted"),
//!     Err(err @ ParserError::BadVersion(_)) => {
//!         assert_eq!(StatusCode::for_error(&err), StatusCode::HttpVersionNotSupported);
//!     }
//!     Err(err) => println!("Other error: {}", err),
//! }
//! ```
//!
//! ## Custom handlers
//!
//! ```
//! use h1_intake::{Decision, HeaderField, ParserLimits, RequestHandler, RequestParser, StartLine};
//!
//! // Count header fields without copying anything
//! #[derive(Default)]
//! struct CountHeaders(usize);
//!
//! impl RequestHandler for CountHeaders {
//!     fn on_start_line(&mut self, _line: &StartLine<'_>) -> Decision {
//!         Decision::Continue
//!     }
//!
//!     fn on_header(&mut self, field: &HeaderField<'_>) -> Decision {
//!         if field.name_eq("Cookie") {
//!             return Decision::reject("cookies not accepted");
//!         }
//!         self.0 += 1;
//!         Decision::Continue
//!     }
//!
//!     fn on_headers_complete(&mut self) -> Decision {
//!         Decision::Continue
//!     }
//! }
//!
//! let limits = ParserLimits::new(8192, 8192, 65536, 100).unwrap();
//! let mut parser = RequestParser::new(limits).unwrap();
//! let mut counter = CountHeaders::default();
//! parser
//!     .parse(b"GET / HTTP/1.0\r\nAccept: */*\r\nUser-Agent: x\r\n\r\n", &mut counter)
//!     .unwrap();
//! assert_eq!(counter.0, 2);
//! ```
//!
//! See `demos/echo_head.rs` for a TCP server built on [`connection::Connection`].

// Export the parser module
pub mod parser;

// Export the connection driver
pub mod connection;

pub mod status;

// Re-export commonly used items for convenience
pub use parser::{
    Decision, Error as ParserError, HeadCollector, HeaderField, HttpVersion, Method, ParserLimits,
    Progress, RequestHandler, RequestHead, RequestParser, StartLine, TargetPolicy,
};
pub use connection::{Connection, ConnectionConfig, DrainHandle, Error as ConnectionError};
pub use status::StatusCode;
