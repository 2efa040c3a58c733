//! Drives a [`RequestParser`] from an async byte stream.

use log::{debug, info, warn};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::connection::buffer::RecvBuffer;
use crate::connection::config::ConnectionConfig;
use crate::connection::drain::DrainSignal;
use crate::connection::error::Error;
use crate::parser::{
    ConfigError, Error as ParserError, ParserLimits, Phase, RequestHandler, RequestParser,
};
use crate::status::StatusCode;

/// How a call to [`Connection::read_head`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadOutcome {
    /// A complete request head was delivered to the handler.
    Ready,
    /// The peer closed the connection between requests.
    Closed,
    /// Draining was requested while the connection was idle.
    Drained,
}

/// One client connection: the stream, its receive buffer, and its parser.
///
/// Bytes after a complete head stay in the buffer. Use
/// [`buffered`](Self::buffered) and [`consume`](Self::consume) to take a
/// body, then call [`read_head`](Self::read_head) again for the next request.
pub struct Connection<S> {
    stream: S,
    parser: RequestParser,
    buffer: RecvBuffer,
    drain: Option<DrainSignal>,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Create a new connection with a parser built from `limits`.
    ///
    /// Fails if the limits are unusable or the receive buffer could fill up
    /// before the parser reaches its own line limits.
    pub fn new(
        stream: S,
        limits: ParserLimits,
        config: &ConnectionConfig,
    ) -> Result<Self, ConfigError> {
        Self::with_parser(stream, RequestParser::new(limits)?, config)
    }

    pub fn with_parser(
        stream: S,
        parser: RequestParser,
        config: &ConnectionConfig,
    ) -> Result<Self, ConfigError> {
        config.validate(parser.limits())?;
        Ok(Self {
            stream,
            parser,
            buffer: RecvBuffer::new(config.read_buffer_size, config.max_buffer_len),
            drain: None,
        })
    }

    /// Stop before the next request once `signal` fires.
    pub fn with_drain(mut self, signal: DrainSignal) -> Self {
        self.drain = Some(signal);
        self
    }

    pub fn is_draining(&self) -> bool {
        self.drain.as_ref().is_some_and(DrainSignal::is_draining)
    }

    /// Reads until the next request head is complete, feeding each token to
    /// `handler`.
    ///
    /// On a parser fault a bare error response is written, the stream is
    /// shut down, and the fault is returned. Later calls return the same
    /// fault without touching the stream.
    pub async fn read_head<H>(&mut self, handler: &mut H) -> Result<HeadOutcome, Error>
    where
        H: RequestHandler + ?Sized,
    {
        if let Some(fault) = self.parser.fault() {
            return Err(Error::ParseError(fault.clone()));
        }
        if self.parser.phase() == Phase::Complete {
            self.parser.reset();
        }

        loop {
            let idle = self.parser.phase() == Phase::AwaitingStartLine;
            if idle && self.is_draining() {
                debug!("connection drained with {} bytes buffered", self.buffer.len());
                return Ok(HeadOutcome::Drained);
            }

            if !self.buffer.is_empty() {
                match self.parser.parse(self.buffer.filled(), handler) {
                    Ok(progress) => {
                        self.buffer.consume(progress.consumed);
                        if progress.is_complete() {
                            return Ok(HeadOutcome::Ready);
                        }
                    }
                    Err(e) => return Err(self.close_with_error(e).await),
                }
            }

            let read = match self.drain.as_mut() {
                Some(drain) if self.parser.phase() == Phase::AwaitingStartLine => {
                    tokio::select! {
                        biased;
                        _ = drain.drained() => continue,
                        read = self.buffer.read_from(&mut self.stream) => read,
                    }
                }
                _ => self.buffer.read_from(&mut self.stream).await,
            };
            let n = match read {
                Ok(n) => n,
                Err(e) => {
                    // The stream is unusable; a partial head is cut short.
                    if let Err(fault) = self.parser.abort(handler) {
                        debug!("request head abandoned after read error: {fault}");
                    }
                    return Err(e);
                }
            };

            if n == 0 {
                return match self.parser.abort(handler) {
                    Ok(()) => {
                        debug!("peer closed the connection");
                        Ok(HeadOutcome::Closed)
                    }
                    Err(e) => Err(self.close_with_error(e).await),
                };
            }
        }
    }

    /// Unconsumed bytes after the last complete head.
    pub fn buffered(&self) -> &[u8] {
        self.buffer.filled()
    }

    /// Releases `n` buffered bytes, typically a body the caller has handled.
    pub fn consume(&mut self, n: usize) {
        self.buffer.consume(n);
    }

    /// Readies the parser for the next request. Returns `false` if a request
    /// is still in progress or the connection has faulted.
    pub fn finish_request(&mut self) -> bool {
        self.parser.reset()
    }

    pub fn parser(&self) -> &RequestParser {
        &self.parser
    }

    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    pub fn into_inner(self) -> S {
        self.stream
    }

    async fn close_with_error(&mut self, error: ParserError) -> Error {
        let status = StatusCode::for_error(&error);
        info!("closing connection with {status}: {error}");

        let response =
            format!("HTTP/1.1 {status}\r\nConnection: close\r\nContent-Length: 0\r\n\r\n");
        if let Err(e) = self.stream.write_all(response.as_bytes()).await {
            warn!("Failed to write error response: {e}");
        } else if let Err(e) = self.stream.shutdown().await {
            debug!("Failed to shut down stream: {e}");
        }
        Error::ParseError(error)
    }
}
