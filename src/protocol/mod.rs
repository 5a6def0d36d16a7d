//! Protocol module - wire format and buffered framing.
//!
//! [`FrameReader`] accumulates raw channel bytes and exposes exact-size,
//! tag, integer, and length-prefixed text reads. [`FrameWriter`] buffers a
//! whole response and flushes it to the channel as a single write.

mod reader;
pub mod wire_format;
mod writer;

pub use reader::FrameReader;
pub use wire_format::{
    check_frame_len, ASSIGNMENT_TAG, DEFAULT_MAX_FRAME_LEN, ERROR_TAG, EXPRESSION_TAG, LEN_SIZE,
    STATEMENT_TAG, SUCCESS_TAG, TAG_SIZE,
};
pub use writer::FrameWriter;
