//! Protocol events produced by the stream decoder.

/// Line prefix that marks a payload-carrying line.
pub const DATA_PREFIX: &str = "data: ";

/// Payload that ends a generated response.
pub const DONE_SENTINEL: &str = "[DONE]";

/// A decoded protocol event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Incremental text to append to the assistant message, verbatim.
    Fragment(String),
    /// The `[DONE]` sentinel: the response is complete.
    Terminal,
}

/// Decode a single line (without its trailing newline).
///
/// Returns `None` for lines that carry no event: anything not starting with
/// `data: `, and `data: ` lines whose trimmed payload is empty.
pub fn parse_line(line: &str) -> Option<StreamEvent> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let payload = line.strip_prefix(DATA_PREFIX)?.trim();

    if payload == DONE_SENTINEL {
        Some(StreamEvent::Terminal)
    } else if payload.is_empty() {
        None
    } else {
        Some(StreamEvent::Fragment(payload.to_string()))
    }
}
