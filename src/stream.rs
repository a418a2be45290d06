//! Stream contract consumed by fields, plus in-memory and std-io adapters.

use std::io;

use crate::errors::{EndOfStream, SinkError};

/// Sequential cursor-based byte source/sink.
///
/// The cursor only moves forward; the engine never seeks or rewinds. A read
/// either returns exactly the requested bytes or fails. Cancellation and
/// timeouts belong to implementations, not to this contract.
pub trait Stream {
    /// Reads exactly `n` bytes.
    fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>, EndOfStream>;

    /// Writes all of `bytes`.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), SinkError>;
}

/// In-memory stream over a byte buffer. Reads advance a cursor over the
/// buffer; writes append to it, so one instance can serve a write pass and
/// then be re-read for a round trip.
#[derive(Debug, Clone, Default)]
pub struct BufStream {
    data: Vec<u8>,
    cursor: usize,
}

impl BufStream {
    /// Empty stream, ready to be written to.
    pub fn new() -> Self {
        BufStream::default()
    }

    /// Stream positioned at the start of `data`.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        BufStream { data, cursor: 0 }
    }

    /// Current read cursor, in bytes from the start of the buffer.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Bytes left between the cursor and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    /// Consumes the stream and returns the underlying buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

impl Stream for BufStream {
    fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>, EndOfStream> {
        if n > self.data.len() - self.cursor {
            return Err(EndOfStream { requested: n });
        }

        let bytes = self.data[self.cursor..self.cursor + n].to_vec();
        self.cursor += n;

        Ok(bytes)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), SinkError> {
        self.data.extend_from_slice(bytes);
        Ok(())
    }
}

/// Adapter exposing any [io::Read] (file, socket, ...) as a read-only [Stream].
#[derive(Debug)]
pub struct ReadStream<R> {
    inner: R,
}

impl<R: io::Read> ReadStream<R> {
    pub fn new(inner: R) -> Self {
        ReadStream { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: io::Read> Stream for ReadStream<R> {
    fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>, EndOfStream> {
        let mut buf = vec![0u8; n];
        self.inner
            .read_exact(&mut buf)
            .map_err(|_| EndOfStream { requested: n })?;

        Ok(buf)
    }

    fn write_bytes(&mut self, _bytes: &[u8]) -> Result<(), SinkError> {
        Err(SinkError("stream is read-only".to_string()))
    }
}

/// Adapter exposing any [io::Write] as a write-only [Stream].
#[derive(Debug)]
pub struct WriteStream<W> {
    inner: W,
}

impl<W: io::Write> WriteStream<W> {
    pub fn new(inner: W) -> Self {
        WriteStream { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: io::Write> Stream for WriteStream<W> {
    fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>, EndOfStream> {
        Err(EndOfStream { requested: n })
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), SinkError> {
        self.inner
            .write_all(bytes)
            .map_err(|err| SinkError(err.to_string()))
    }
}
