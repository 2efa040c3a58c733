//! Connection configuration.

use serde::Deserialize;

use crate::parser::{ConfigError, ParserLimits};

/// Receive-buffer configuration for a [`Connection`](super::Connection).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Bytes requested from the stream per read.
    pub read_buffer_size: usize,
    /// Upper bound on unconsumed bytes held for one connection.
    pub max_buffer_len: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            read_buffer_size: 8192,
            max_buffer_len: 64 * 1024,
        }
    }
}

impl ConnectionConfig {
    /// Checks the buffer against the parser limits it will serve.
    ///
    /// The parser holds at most one unfinished line, so a buffer at least as
    /// large as the longest accepted line always lets the parser reach its
    /// own limit first.
    pub fn validate(&self, limits: &ParserLimits) -> Result<(), ConfigError> {
        if self.read_buffer_size == 0 {
            return Err(ConfigError::ZeroLimit("read_buffer_size"));
        }
        let line = limits.max_request_line_len.max(limits.max_header_line_len);
        if self.max_buffer_len < line {
            return Err(ConfigError::BufferTooSmall {
                buffer: self.max_buffer_len,
                line,
            });
        }
        Ok(())
    }
}
