//! Incremental HTTP/1.x request-head parser.
//!
//! The scanners in this module never copy out of the receive buffer. Each
//! recognized token is pushed to a [`RequestHandler`] as a borrowed view, and
//! the [`RequestParser`] state machine carries the resume position from one
//! delivery to the next.

mod error;
mod handler;
mod header;
mod limits;
mod method;
mod request;
mod request_line;
mod state;
mod token;
mod version;

// Re-export public items
pub use error::{ConfigError, Error, ErrorKind, HeaderLimit};
pub use handler::{Decision, Rejection, RequestHandler};
pub use header::HeaderField;
pub use limits::{MethodSet, ParserLimits, TargetPolicy};
pub use method::Method;
pub use request::{HeadCollector, HeadPolicy, RequestHead};
pub use request_line::{StartLine, TargetForm};
pub use state::{ParseStatus, Phase, Progress, RequestParser};
pub use version::HttpVersion;
