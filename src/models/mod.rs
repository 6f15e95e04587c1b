//! Data types shared by the store, the session and the client.

mod conversation;
mod message;
mod metrics;
mod request;

pub use conversation::{Conversation, DEFAULT_CONVERSATION_ID};
pub use message::{Message, MessageRole};
pub use metrics::{MetricsEnvelope, ServerMetrics};
pub use request::GenerateRequest;
