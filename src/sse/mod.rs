//! Stream decoding for the generation server's event stream.
//!
//! The wire format is a reduced form of Server-Sent Events:
//! - `data: <payload>` - payload line, trimmed and appended verbatim
//! - `data: [DONE]` - end of the response
//! - any other line - ignored
//!
//! # Module structure
//! - `events` - [`StreamEvent`] and single-line parsing
//! - `decoder` - [`StreamDecoder`], buffering partial lines across chunks

mod decoder;
mod events;

pub use decoder::{decode_chunk, StreamDecoder};
pub use events::{parse_line, StreamEvent, DATA_PREFIX, DONE_SENTINEL};
