//! The per-connection receive buffer.

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::connection::error::Error;

/// A growable receive buffer that releases bytes as the parser consumes them.
///
/// `filled()` always starts at the first unconsumed byte, which is the slice
/// shape [`RequestParser::parse`](crate::parser::RequestParser::parse)
/// expects. Consumed space is reclaimed by shifting the unconsumed tail to
/// the front when a read would otherwise have to grow the allocation.
#[derive(Debug)]
pub struct RecvBuffer {
    buf: Vec<u8>,
    start: usize,
    end: usize,
    read_size: usize,
    max_len: usize,
}

impl RecvBuffer {
    pub fn new(read_size: usize, max_len: usize) -> Self {
        Self {
            buf: Vec::with_capacity(read_size),
            start: 0,
            end: 0,
            read_size: read_size.max(1),
            max_len: max_len.max(1),
        }
    }

    /// Unconsumed bytes.
    pub fn filled(&self) -> &[u8] {
        &self.buf[self.start..self.end]
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Releases `n` bytes from the front.
    pub fn consume(&mut self, n: usize) {
        self.start = (self.start + n).min(self.end);
        if self.start == self.end {
            self.start = 0;
            self.end = 0;
        }
    }

    /// Appends bytes delivered by something other than the stream.
    pub fn extend_from_slice(&mut self, data: &[u8]) -> Result<(), Error> {
        if self.len() + data.len() > self.max_len {
            return Err(Error::BufferFull {
                limit: self.max_len,
            });
        }
        self.reserve(data.len());
        self.buf[self.end..self.end + data.len()].copy_from_slice(data);
        self.end += data.len();
        Ok(())
    }

    /// Reads once from `reader`, returning the number of bytes appended.
    /// Zero means end of stream.
    pub async fn read_from<R>(&mut self, reader: &mut R) -> Result<usize, Error>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let room = self.max_len - self.len();
        if room == 0 {
            return Err(Error::BufferFull {
                limit: self.max_len,
            });
        }
        let want = self.read_size.min(room);
        self.reserve(want);
        let n = reader.read(&mut self.buf[self.end..self.end + want]).await?;
        self.end += n;
        Ok(n)
    }

    /// Makes `additional` writable bytes available after `end`.
    fn reserve(&mut self, additional: usize) {
        if self.buf.len() - self.end >= additional {
            return;
        }
        if self.start > 0 {
            self.buf.copy_within(self.start..self.end, 0);
            self.end -= self.start;
            self.start = 0;
        }
        if self.buf.len() - self.end < additional {
            self.buf.resize(self.end + additional, 0);
        }
    }
}
