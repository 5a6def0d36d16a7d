//! Buffered frame reader for accumulating partial reads.
//!
//! Uses `bytes::BytesMut` for buffer management. Socket reads land in an
//! internal accumulation buffer; read primitives suspend until enough bytes
//! are buffered or the channel closes. Consumed prefixes are split off after
//! every read, so memory stays bounded by the largest unconsumed frame.
//!
//! # Example
//!
//! ```ignore
//! use evalwire::protocol::FrameReader;
//!
//! let mut reader = FrameReader::new(stream);
//! let tag = reader.read_tag().await?;
//! let code = reader.read_text().await?;
//! ```

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

use super::wire_format::{check_frame_len, DEFAULT_MAX_FRAME_LEN};
use crate::error::{EvalwireError, Result};

/// Chunk size for channel reads.
const READ_CHUNK: usize = 64 * 1024;

/// Buffered reader exposing fixed-size and length-prefixed frame reads.
pub struct FrameReader<R> {
    /// The byte channel (socket read half).
    inner: R,
    /// Accumulated bytes not yet consumed.
    buffer: BytesMut,
    /// Maximum allowed text frame length.
    max_frame_len: usize,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    /// Create a new frame reader with the default frame bound (64 MiB).
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buffer: BytesMut::with_capacity(READ_CHUNK),
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
        }
    }

    /// Create a new frame reader with a custom frame bound.
    pub fn with_max_frame_len(inner: R, max_frame_len: usize) -> Self {
        Self {
            inner,
            buffer: BytesMut::with_capacity(READ_CHUNK),
            max_frame_len,
        }
    }

    /// Read exactly `n` bytes, accumulating from the channel as needed.
    ///
    /// # Errors
    ///
    /// Returns [`EvalwireError::ConnectionClosed`] if the channel returns
    /// zero bytes before `n` are buffered. This is fatal: the caller's
    /// processing loop must terminate.
    pub async fn read_exact(&mut self, n: usize) -> Result<Bytes> {
        while self.buffer.len() < n {
            self.buffer.reserve(READ_CHUNK);
            let read = self.inner.read_buf(&mut self.buffer).await?;
            if read == 0 {
                return Err(EvalwireError::ConnectionClosed);
            }
        }
        Ok(self.buffer.split_to(n).freeze())
    }

    /// Read one byte as a discriminant tag.
    pub async fn read_tag(&mut self) -> Result<u8> {
        let byte = self.read_exact(1).await?;
        Ok(byte[0])
    }

    /// Read a 4-byte big-endian signed integer.
    pub async fn read_int(&mut self) -> Result<i32> {
        let bytes = self.read_exact(4).await?;
        Ok(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a length-prefixed frame as raw bytes.
    ///
    /// Callers that must keep the stream aligned across several frames of
    /// one message read the raw frames first and decode afterwards, so a
    /// decode failure cannot leave later frames unconsumed.
    ///
    /// # Errors
    ///
    /// A negative or oversized length prefix is connection-fatal
    /// ([`EvalwireError::Frame`]); so is a channel close mid-frame.
    pub async fn read_text_bytes(&mut self) -> Result<Bytes> {
        let len = self.read_int().await?;
        let len = check_frame_len(len, self.max_frame_len)?;
        self.read_exact(len).await
    }

    /// Read a length-prefixed UTF-8 text frame.
    ///
    /// # Errors
    ///
    /// A negative or oversized length prefix is connection-fatal
    /// ([`EvalwireError::Frame`]). Invalid UTF-8 inside the frame is
    /// recoverable ([`EvalwireError::Utf8`]): the frame bytes were fully
    /// consumed, so the stream position is still trustworthy.
    pub async fn read_text(&mut self) -> Result<String> {
        let bytes = self.read_text_bytes().await?;
        Ok(String::from_utf8(bytes.to_vec())?)
    }

    /// Get the number of buffered, unconsumed bytes.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }
}
