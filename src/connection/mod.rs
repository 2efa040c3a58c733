//! Async connection driver for the request-head parser.
//!
//! This module adapts a tokio byte stream to the sans-I/O
//! [`RequestParser`](crate::parser::RequestParser): it owns the receive
//! buffer, releases exactly the bytes the parser consumed, and answers a
//! fault with a bare status line before closing.

mod buffer;
mod config;
mod drain;
mod driver;
mod error;

// Re-export public items
pub use buffer::RecvBuffer;
pub use config::ConnectionConfig;
pub use drain::{DrainHandle, DrainSignal};
pub use driver::{Connection, HeadOutcome};
pub use error::Error;
