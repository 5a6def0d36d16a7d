//! Buffered frame writer.
//!
//! Write primitives append to an internal buffer; [`FrameWriter::flush`]
//! hands the whole accumulated response to the channel as a single write, so
//! a response is an atomic unit on the wire and no peer ever observes a
//! partial response. The buffer is detached before the write, so a failed
//! flush can never resend stale bytes from a previous response.

use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::{EvalwireError, Result};

/// Buffered writer exposing tag, integer, and length-prefixed text writes.
pub struct FrameWriter<W> {
    /// The byte channel (socket write half).
    inner: W,
    /// Bytes accumulated for the next flush.
    buffer: BytesMut,
}

impl<W: AsyncWrite + Unpin> FrameWriter<W> {
    /// Create a new frame writer.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            buffer: BytesMut::with_capacity(4 * 1024),
        }
    }

    /// Append a discriminant tag byte.
    pub fn write_tag(&mut self, tag: u8) {
        self.buffer.put_u8(tag);
    }

    /// Append a 4-byte big-endian signed integer.
    pub fn write_int(&mut self, value: i32) {
        self.buffer.put_i32(value);
    }

    /// Append a length-prefixed UTF-8 text frame.
    ///
    /// # Errors
    ///
    /// Returns [`EvalwireError::Frame`] if the text's byte length does not
    /// fit a 4-byte signed prefix.
    pub fn write_text(&mut self, text: &str) -> Result<()> {
        let len = i32::try_from(text.len()).map_err(|_| {
            EvalwireError::Frame(format!("text of {} bytes overflows length prefix", text.len()))
        })?;
        self.buffer.put_i32(len);
        self.buffer.extend_from_slice(text.as_bytes());
        Ok(())
    }

    /// Flush the accumulated buffer to the channel as one write.
    ///
    /// The buffer is cleared even if the write fails, so a retry attempt
    /// never resends partial-previous-response bytes.
    ///
    /// # Errors
    ///
    /// Write or flush failure is fatal to the connection.
    pub async fn flush(&mut self) -> Result<()> {
        let frame = self.buffer.split().freeze();
        if frame.is_empty() {
            return Ok(());
        }
        self.inner.write_all(&frame).await?;
        self.inner.flush().await?;
        Ok(())
    }

    /// Get the number of bytes pending flush.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}
