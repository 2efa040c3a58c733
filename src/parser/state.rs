//! The incremental state machine driving the line scanners.

use log::{debug, trace, warn};

use crate::parser::error::{ConfigError, Error};
use crate::parser::handler::{Decision, RequestHandler};
use crate::parser::header::{scan_header_line, HeaderLine, HeaderUsage};
use crate::parser::limits::{ParserLimits, TargetPolicy};
use crate::parser::request_line::{scan_request_line, Scan};

/// Where the parser is within the current request head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No byte of the next request has been seen.
    AwaitingStartLine,
    /// Part of the request line has been delivered.
    InStartLine,
    /// At the start of a header line (or the blank line).
    AwaitingHeader,
    /// Part of a header line has been delivered.
    InHeader,
    /// The head is complete; call [`RequestParser::reset`] before the next request.
    Complete,
    /// A fault was raised; the connection must close.
    Faulted,
}

/// Whether the request head is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStatus {
    Incomplete,
    Complete,
}

/// Result of one [`RequestParser::parse`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Bytes at the front of the buffer that the caller may now release.
    pub consumed: usize,
    pub status: ParseStatus,
}

impl Progress {
    pub fn is_complete(&self) -> bool {
        self.status == ParseStatus::Complete
    }
}

enum Step {
    Advanced(usize),
    NeedMore,
}

/// [`Phase`] minus `Faulted`, which is derived from the stored fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    AwaitingStartLine,
    InStartLine,
    AwaitingHeader,
    InHeader,
    Complete,
}

impl From<Stage> for Phase {
    fn from(stage: Stage) -> Self {
        match stage {
            Stage::AwaitingStartLine => Phase::AwaitingStartLine,
            Stage::InStartLine => Phase::InStartLine,
            Stage::AwaitingHeader => Phase::AwaitingHeader,
            Stage::InHeader => Phase::InHeader,
            Stage::Complete => Phase::Complete,
        }
    }
}

/// Incremental HTTP/1.x request-head parser.
///
/// One instance belongs to one connection. Feed it the receive buffer with
/// [`parse`](Self::parse): the slice must start at the first byte not yet
/// reported as consumed, and may be the same storage grown in place or a
/// freshly compacted copy. The parser keeps no pointer into it between
/// calls, only the offset already searched in the current line.
#[derive(Debug, Clone)]
pub struct RequestParser {
    limits: ParserLimits,
    policy: TargetPolicy,
    stage: Stage,
    /// Offset into the current line already searched for its terminator.
    cursor: usize,
    usage: HeaderUsage,
    total_consumed: u64,
    fault: Option<Error>,
}

impl RequestParser {
    /// Create a parser with the default target policy.
    ///
    /// Fails if the limits are unusable; there are no implicit defaults.
    pub fn new(limits: ParserLimits) -> Result<Self, ConfigError> {
        Self::with_policy(limits, TargetPolicy::default())
    }

    pub fn with_policy(limits: ParserLimits, policy: TargetPolicy) -> Result<Self, ConfigError> {
        limits.validate()?;
        Ok(Self {
            limits,
            policy,
            stage: Stage::AwaitingStartLine,
            cursor: 0,
            usage: HeaderUsage::default(),
            total_consumed: 0,
            fault: None,
        })
    }

    pub fn phase(&self) -> Phase {
        match self.fault {
            Some(_) => Phase::Faulted,
            None => self.stage.into(),
        }
    }

    pub fn fault(&self) -> Option<&Error> {
        self.fault.as_ref()
    }

    pub fn limits(&self) -> &ParserLimits {
        &self.limits
    }

    pub fn policy(&self) -> &TargetPolicy {
        &self.policy
    }

    /// Offset already searched within the line currently being received.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Header fields accepted so far in the current request.
    pub fn header_count(&self) -> usize {
        self.usage.count
    }

    /// Header-section bytes accepted so far in the current request.
    pub fn header_bytes(&self) -> usize {
        self.usage.bytes
    }

    /// Bytes consumed over the lifetime of the parser, across requests.
    pub fn total_consumed(&self) -> u64 {
        self.total_consumed
    }

    /// Scans as far into `buf` as possible, notifying `handler` of every
    /// token recognized on the way.
    ///
    /// Returns how many leading bytes of `buf` were consumed and whether the
    /// head is complete. Bytes after a complete head (a body, or a pipelined
    /// request) are left unconsumed. Once faulted, every call returns the
    /// same error without looking at `buf`.
    pub fn parse<H>(&mut self, buf: &[u8], handler: &mut H) -> Result<Progress, Error>
    where
        H: RequestHandler + ?Sized,
    {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }

        let mut consumed = 0;
        loop {
            let rest = &buf[consumed..];
            let step = match self.stage {
                Stage::Complete => {
                    return Ok(Progress {
                        consumed,
                        status: ParseStatus::Complete,
                    })
                }
                Stage::AwaitingStartLine | Stage::InStartLine => {
                    self.step_start_line(rest, handler)
                }
                Stage::AwaitingHeader | Stage::InHeader => self.step_header(rest, handler),
            };

            match step {
                Ok(Step::Advanced(n)) => {
                    consumed += n;
                    self.total_consumed += n as u64;
                }
                Ok(Step::NeedMore) => {
                    trace!(
                        "request head incomplete: stage={:?} consumed={consumed} cursor={}",
                        self.stage,
                        self.cursor
                    );
                    return Ok(Progress {
                        consumed,
                        status: ParseStatus::Incomplete,
                    });
                }
                Err(error) => return Err(self.fail(error, handler)),
            }
        }
    }

    /// Readies a parser whose head is complete for the next request on the
    /// same connection.
    ///
    /// Returns `true` when the parser now awaits a new start line. A faulted
    /// parser stays faulted, and a request still in progress is left alone.
    pub fn reset(&mut self) -> bool {
        if self.fault.is_some() {
            return false;
        }
        match self.stage {
            Stage::Complete => {
                self.stage = Stage::AwaitingStartLine;
                self.cursor = 0;
                self.usage = HeaderUsage::default();
                true
            }
            Stage::AwaitingStartLine => true,
            _ => false,
        }
    }

    /// Signals that the connection is closing.
    ///
    /// A request that was only partially received faults with
    /// [`Error::ConnectionClosedPrematurely`]. An idle parser, or one holding
    /// a complete head, closes cleanly.
    pub fn abort<H>(&mut self, handler: &mut H) -> Result<(), Error>
    where
        H: RequestHandler + ?Sized,
    {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }
        match self.stage {
            Stage::AwaitingStartLine | Stage::Complete => Ok(()),
            _ => Err(self.fail(Error::ConnectionClosedPrematurely, handler)),
        }
    }

    fn step_start_line<H>(&mut self, rest: &[u8], handler: &mut H) -> Result<Step, Error>
    where
        H: RequestHandler + ?Sized,
    {
        if rest.is_empty() {
            return Ok(Step::NeedMore);
        }
        let max_len = self.limits.max_request_line_len;
        match scan_request_line(rest, self.cursor, max_len, &self.policy)? {
            Scan::Incomplete { resume } => {
                self.cursor = resume;
                self.stage = Stage::InStartLine;
                Ok(Step::NeedMore)
            }
            Scan::Complete { token, consumed } => {
                debug!(
                    "request line: {} {} {}",
                    String::from_utf8_lossy(token.method_bytes()),
                    String::from_utf8_lossy(token.target),
                    token.version
                );
                if let Decision::Reject(rejection) = handler.on_start_line(&token) {
                    return Err(Error::RejectedByHandler(rejection));
                }
                self.cursor = 0;
                self.stage = Stage::AwaitingHeader;
                Ok(Step::Advanced(consumed))
            }
        }
    }

    fn step_header<H>(&mut self, rest: &[u8], handler: &mut H) -> Result<Step, Error>
    where
        H: RequestHandler + ?Sized,
    {
        if rest.is_empty() {
            return Ok(Step::NeedMore);
        }
        match scan_header_line(rest, self.cursor, &self.limits, self.usage)? {
            Scan::Incomplete { resume } => {
                self.cursor = resume;
                self.stage = Stage::InHeader;
                Ok(Step::NeedMore)
            }
            Scan::Complete {
                token: HeaderLine::Field(field),
                consumed,
            } => {
                if let Decision::Reject(rejection) = handler.on_header(&field) {
                    return Err(Error::RejectedByHandler(rejection));
                }
                self.usage.count += 1;
                self.usage.bytes += consumed;
                self.cursor = 0;
                self.stage = Stage::AwaitingHeader;
                Ok(Step::Advanced(consumed))
            }
            Scan::Complete {
                token: HeaderLine::End,
                consumed,
            } => {
                if let Decision::Reject(rejection) = handler.on_headers_complete() {
                    return Err(Error::RejectedByHandler(rejection));
                }
                self.usage.bytes += consumed;
                self.cursor = 0;
                self.stage = Stage::Complete;
                debug!(
                    "request head complete: {} headers, {} header bytes",
                    self.usage.count, self.usage.bytes
                );
                Ok(Step::Advanced(consumed))
            }
        }
    }

    fn fail<H>(&mut self, error: Error, handler: &mut H) -> Error
    where
        H: RequestHandler + ?Sized,
    {
        warn!("request head fault in {:?}: {error}", self.stage);
        handler.on_error(&error);
        self.fault = Some(error.clone());
        error
    }
}
