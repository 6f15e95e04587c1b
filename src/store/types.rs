//! Messages exchanged between a generation session and the store.

use std::fmt;

use crate::error::GenerationError;

/// Identifies one generation session within a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// How a session ended.
#[derive(Debug, Clone)]
pub enum SessionOutcome {
    /// Stream finished; `terminal` is true when `[DONE]` was received
    /// rather than the body simply ending.
    Completed { terminal: bool },
    /// Stopped through the cancellation handle. Not an error.
    Cancelled,
    /// Transport or read failure.
    Failed(GenerationError),
}

/// Progress reported by a session's read loop, applied in order by
/// [`ConversationStore::apply`](super::ConversationStore::apply).
#[derive(Debug, Clone)]
pub enum SessionMessage {
    /// Text to append to the session's assistant message
    Fragment { session: SessionId, text: String },
    /// The session is over; always the last message of a session
    Finished {
        session: SessionId,
        outcome: SessionOutcome,
    },
}

impl SessionMessage {
    /// Session this message belongs to.
    pub fn session(&self) -> SessionId {
        match self {
            SessionMessage::Fragment { session, .. } | SessionMessage::Finished { session, .. } => {
                *session
            }
        }
    }
}

/// Result of [`ConversationStore::send_message`](super::ConversationStore::send_message).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// A session was started
    Started(SessionId),
    /// There is no active conversation to send into
    NoActiveConversation,
    /// A session is already generating; nothing was changed
    Busy,
}

impl SendOutcome {
    /// Whether a session was started.
    pub fn is_started(&self) -> bool {
        matches!(self, SendOutcome::Started(_))
    }
}
