//! Error types for evalwire.

use thiserror::Error;

/// Main error type for all evalwire operations.
#[derive(Debug, Error)]
pub enum EvalwireError {
    /// I/O error on the underlying byte channel.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decode error for a wire-encoded value.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A text frame contained invalid UTF-8.
    #[error("invalid UTF-8 in text frame: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Framing violation (untrustworthy length prefix, oversized frame).
    ///
    /// Always connection-fatal: without a trustworthy length prefix the
    /// reader cannot know where the next frame begins.
    #[error("malformed frame: {0}")]
    Frame(String),

    /// A decoded value exceeded the nesting depth limit.
    #[error("value nesting exceeds depth limit {0}")]
    ValueTooDeep(usize),

    /// Unknown request discriminant tag.
    ///
    /// The message text is part of the wire contract: it is sent verbatim
    /// in the Failure response body.
    #[error("Unrecognized message type: {0}")]
    UnrecognizedMessage(u8),

    /// The peer closed the connection (zero-byte read).
    #[error("Connection closed")]
    ConnectionClosed,
}

impl EvalwireError {
    /// Whether this error must terminate the connection.
    ///
    /// Channel-level and framing-level faults are fatal; everything else is
    /// reported to the peer as a Failure response and the session loop
    /// continues.
    pub fn is_connection_fatal(&self) -> bool {
        matches!(
            self,
            EvalwireError::Io(_) | EvalwireError::Frame(_) | EvalwireError::ConnectionClosed
        )
    }
}

/// Result type alias using EvalwireError.
pub type Result<T> = std::result::Result<T, EvalwireError>;

/// Render an error and its source chain as multi-line diagnostic text.
///
/// Used to fill the trace field of Failure responses for faults that carry
/// no evaluator-provided trace of their own.
pub fn diagnostic_trace(err: &(dyn std::error::Error + 'static)) -> String {
    let mut trace = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        trace.push_str("\n  caused by: ");
        trace.push_str(&cause.to_string());
        source = cause.source();
    }
    trace
}
