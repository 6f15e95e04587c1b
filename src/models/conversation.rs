use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Message;

/// Id of the conversation every store starts with.
pub const DEFAULT_CONVERSATION_ID: &str = "default";

/// An independent chat thread.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Conversation {
    /// Unique identifier, stable for the life of the store
    pub id: String,
    /// Display name
    pub name: String,
    /// Messages in send order
    #[serde(default)]
    pub messages: Vec<Message>,
    /// When the conversation was created
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    /// Create an empty conversation with an explicit id.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            messages: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Create an empty conversation with a fresh random id.
    pub fn with_generated_id(name: impl Into<String>) -> Self {
        Self::new(format!("conv-{}", Uuid::new_v4()), name)
    }

    /// Default display name for the `sequence`-th conversation.
    pub fn default_name(sequence: u64) -> String {
        format!("Conversation {}", sequence)
    }

    /// Content of the most recent message, if any.
    pub fn last_message_preview(&self) -> Option<&str> {
        self.messages.last().map(|m| m.content.as_str())
    }
}
