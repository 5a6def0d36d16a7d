//! Wire format constants and length-prefix rules.
//!
//! Every message is framed as:
//! ```text
//! ┌──────────┬────────────────────────────────┐
//! │ Tag      │ Variant payload                │
//! │ 1 byte   │ length-prefixed text field(s)  │
//! └──────────┴────────────────────────────────┘
//! ```
//!
//! A text field is a 4-byte big-endian signed length followed by that many
//! bytes of UTF-8. All multi-byte integers are Big Endian.

use crate::error::{EvalwireError, Result};

/// Size of a discriminant tag in bytes.
pub const TAG_SIZE: usize = 1;

/// Size of a length prefix in bytes (4-byte big-endian signed integer).
pub const LEN_SIZE: usize = 4;

/// Default maximum length of a single text frame (64 MiB).
///
/// Length prefixes must be trusted absolutely (there is no resync point in
/// the stream), so anything beyond this bound is treated as stream
/// corruption and kills the connection.
pub const DEFAULT_MAX_FRAME_LEN: usize = 64 * 1024 * 1024;

/// Request tag: execute a code fragment for effect, no return value.
pub const STATEMENT_TAG: u8 = 0;

/// Request tag: evaluate a code fragment and return its value.
pub const EXPRESSION_TAG: u8 = 1;

/// Request tag: bind a name to a JSON-encoded value in the environment.
pub const ASSIGNMENT_TAG: u8 = 2;

/// Response tag: request succeeded.
pub const SUCCESS_TAG: u8 = 0;

/// Response tag: request failed; message and trace frames follow.
pub const ERROR_TAG: u8 = 1;

/// Validate a decoded length prefix against the frame bound.
///
/// Returns the length as `usize` on success.
///
/// # Errors
///
/// Returns a connection-fatal [`EvalwireError::Frame`] if the prefix is
/// negative or exceeds `max_frame_len`.
pub fn check_frame_len(len: i32, max_frame_len: usize) -> Result<usize> {
    if len < 0 {
        return Err(EvalwireError::Frame(format!(
            "negative length prefix: {len}"
        )));
    }
    let len = len as usize;
    if len > max_frame_len {
        return Err(EvalwireError::Frame(format!(
            "length prefix {len} exceeds maximum {max_frame_len}"
        )));
    }
    Ok(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_tags_are_stable() {
        // These values are the wire contract; they must never shift.
        assert_eq!(STATEMENT_TAG, 0);
        assert_eq!(EXPRESSION_TAG, 1);
        assert_eq!(ASSIGNMENT_TAG, 2);
    }

    #[test]
    fn test_response_tags_are_stable() {
        assert_eq!(SUCCESS_TAG, 0);
        assert_eq!(ERROR_TAG, 1);
    }

    #[test]
    fn test_check_frame_len_accepts_valid() {
        assert_eq!(check_frame_len(0, DEFAULT_MAX_FRAME_LEN).unwrap(), 0);
        assert_eq!(check_frame_len(1024, DEFAULT_MAX_FRAME_LEN).unwrap(), 1024);
        assert_eq!(check_frame_len(100, 100).unwrap(), 100);
    }

    #[test]
    fn test_check_frame_len_rejects_negative() {
        let result = check_frame_len(-1, DEFAULT_MAX_FRAME_LEN);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.is_connection_fatal());
        assert!(err.to_string().contains("negative length prefix"));
    }

    #[test]
    fn test_check_frame_len_rejects_oversized() {
        let result = check_frame_len(101, 100);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.is_connection_fatal());
        assert!(err.to_string().contains("exceeds maximum"));
    }
}
