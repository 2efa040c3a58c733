//! Error types for the connection driver.

use thiserror::Error;

use crate::parser::Error as ParserError;

/// Errors that end a connection.
#[derive(Debug, Error)]
pub enum Error {
    /// The request head was rejected or cut short.
    #[error("Parse error: {0}")]
    ParseError(#[from] ParserError),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The receive buffer is full of unconsumed bytes.
    #[error("Receive buffer full ({limit} bytes unconsumed)")]
    BufferFull { limit: usize },
}
