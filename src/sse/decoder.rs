//! Chunk-to-event decoding.
//!
//! Transport chunks arrive at arbitrary byte boundaries. [`StreamDecoder`]
//! keeps the unterminated tail of the previous chunk so a line split across
//! two chunks (including a split inside a multi-byte UTF-8 sequence) is
//! decoded once it is complete.

use super::events::{parse_line, StreamEvent};

/// Stateful line decoder for one response body.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    /// Bytes after the last newline seen so far
    pending: Vec<u8>,
}

impl StreamDecoder {
    /// Create a new decoder with an empty line buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and return the events for every line it completes.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        self.pending.extend_from_slice(chunk);

        let Some(last_newline) = self.pending.iter().rposition(|b| *b == b'\n') else {
            return Vec::new();
        };

        let rest = self.pending.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.pending, rest);

        decode_chunk(&String::from_utf8_lossy(&complete))
    }

    /// Flush the unterminated tail at end-of-stream.
    pub fn finish(&mut self) -> Option<StreamEvent> {
        if self.pending.is_empty() {
            return None;
        }
        let tail = std::mem::take(&mut self.pending);
        parse_line(&String::from_utf8_lossy(&tail))
    }

    /// Number of buffered bytes waiting for a newline.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Discard any buffered partial line.
    pub fn reset(&mut self) {
        self.pending.clear();
    }
}

/// Decode every line of a self-contained chunk.
///
/// Holds no state: a trailing line without a newline is decoded as if it
/// were complete.
pub fn decode_chunk(chunk: &str) -> Vec<StreamEvent> {
    chunk.split('\n').filter_map(parse_line).collect()
}
