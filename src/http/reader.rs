//! Buffered reads over a connection's byte stream.
//!
//! [`BufferedReader`] keeps one fixed-capacity buffer per connection and
//! serves two kinds of reads out of it: "up to N bytes" ([`read_upto`]) and
//! "one `\n`-terminated line" ([`read_line`]). Both consume from the same
//! buffer, so a line read that stops early leaves the rest of the line in
//! place for the next call.
//!
//! [`read_upto`]: BufferedReader::read_upto
//! [`read_line`]: BufferedReader::read_line

use std::io;

use tokio::io::{AsyncRead, AsyncReadExt};

/// Default capacity of the per-connection read buffer.
pub const BUFFER_CAPACITY: usize = 4096;

/// Byte written after the last copied byte of a line.
pub const END_MARKER: u8 = 0;

/// Result of a single attempt to refill the buffer.
enum Fill {
    Filled,
    Interrupted,
    Eof,
}

pub struct BufferedReader<S> {
    stream: S,
    buf: Box<[u8]>,
    /// Count of valid, unconsumed bytes starting at `cursor`.
    unread: usize,
    /// Index of the next unconsumed byte.
    cursor: usize,
}

impl<S: AsyncRead + Unpin> BufferedReader<S> {
    pub fn new(stream: S) -> Self {
        Self::with_capacity(stream, BUFFER_CAPACITY)
    }

    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(stream: S, capacity: usize) -> Self {
        assert!(capacity > 0, "buffer capacity must be non-zero");
        Self {
            stream,
            buf: vec![0u8; capacity].into_boxed_slice(),
            unread: 0,
            cursor: 0,
        }
    }

    /// Bytes read from the stream but not yet handed out.
    pub fn buffered(&self) -> &[u8] {
        &self.buf[self.cursor..self.cursor + self.unread]
    }

    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    /// Mutable access to the stream. Writes go straight to it; reads through
    /// it skip whatever is still buffered.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    /// One read of up to `capacity` bytes. Only called with an empty buffer.
    async fn fill(&mut self) -> io::Result<Fill> {
        debug_assert_eq!(self.unread, 0);

        match self.stream.read(&mut self.buf).await {
            Ok(0) => Ok(Fill::Eof),
            Ok(n) => {
                self.cursor = 0;
                self.unread = n;
                Ok(Fill::Filled)
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(Fill::Interrupted),
            Err(e) => Err(e),
        }
    }

    /// Copies `min(dst.len(), unread)` bytes into `dst`, refilling first if
    /// the buffer is empty.
    ///
    /// Returns the number of bytes copied. A short count is normal; `Ok(0)`
    /// is returned only at end of stream (or for an empty `dst`).
    pub async fn read_upto(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        if dst.is_empty() {
            return Ok(0);
        }

        while self.unread == 0 {
            match self.fill().await? {
                Fill::Filled => {}
                Fill::Interrupted => continue,
                Fill::Eof => return Ok(0),
            }
        }

        let count = dst.len().min(self.unread);
        dst[..count].copy_from_slice(&self.buf[self.cursor..self.cursor + count]);
        self.cursor += count;
        self.unread -= count;

        Ok(count)
    }

    /// Reads until `dst` is full or the stream ends, returning the total.
    pub async fn read_full(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        let mut total = 0;

        while total < dst.len() {
            let n = self.read_upto(&mut dst[total..]).await?;
            if n == 0 {
                break;
            }
            total += n;
        }

        Ok(total)
    }

    /// Reads one line, terminator included, into `dst`.
    ///
    /// At most `dst.len() - 1` bytes are copied and [`END_MARKER`] is written
    /// right after the last one. A longer line is cut at that point; the rest
    /// stays buffered and is returned by the next read.
    ///
    /// Returns the number of bytes copied, not counting the end marker.
    /// `Ok(0)` means the stream ended before any byte arrived.
    pub async fn read_line(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        if dst.len() < 2 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "line buffer must hold at least one byte and the end marker",
            ));
        }

        let limit = dst.len() - 1;
        let mut copied = 0;

        while copied < limit {
            let mut byte = [0u8; 1];
            if self.read_upto(&mut byte).await? == 0 {
                break;
            }

            dst[copied] = byte[0];
            copied += 1;

            if byte[0] == b'\n' {
                break;
            }
        }

        dst[copied] = END_MARKER;
        Ok(copied)
    }
}
