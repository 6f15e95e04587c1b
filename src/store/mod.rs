//! Conversation store: the aggregate that owns every conversation and the
//! state of the in-flight generation.
//!
//! All mutation goes through `&mut ConversationStore`. A generation session
//! runs as a separate task and reports back through [`SessionMessage`]s,
//! which the owner feeds to [`ConversationStore::apply`] (directly, or via
//! [`ConversationStore::process_pending`] / [`ConversationStore::run_until_settled`]).
//!
//! # Example
//!
//! ```ignore
//! use parley::store::ConversationStore;
//!
//! let mut store = ConversationStore::new(client);
//! store.send_message("hi");
//! store.run_until_settled().await;
//! println!("{}", store.current_messages()[1].content);
//! ```

mod conversations;
mod generation;
mod state;
mod types;

pub use state::{ActiveSession, GenerationState};
pub use types::{SendOutcome, SessionId, SessionMessage, SessionOutcome};

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::client::GenerationClient;
use crate::models::{Conversation, Message, DEFAULT_CONVERSATION_ID};

/// Owner of all conversations and generation state.
#[derive(Debug)]
pub struct ConversationStore {
    /// Newest first
    conversations: Vec<Conversation>,
    active_conversation_id: String,
    /// Sequence number of the most recently created conversation
    conversation_count: u64,
    generation: GenerationState,
    next_session_id: u64,
    client: Arc<GenerationClient>,
    message_tx: mpsc::UnboundedSender<SessionMessage>,
    message_rx: mpsc::UnboundedReceiver<SessionMessage>,
}

impl ConversationStore {
    /// Create a store holding a single empty default conversation.
    pub fn new(client: GenerationClient) -> Self {
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        let default = Conversation::new(DEFAULT_CONVERSATION_ID, Conversation::default_name(1));

        Self {
            active_conversation_id: default.id.clone(),
            conversations: vec![default],
            conversation_count: 1,
            generation: GenerationState::default(),
            next_session_id: 1,
            client: Arc::new(client),
            message_tx,
            message_rx,
        }
    }

    /// All conversations, most recently created first.
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    /// Id of the active conversation.
    pub fn active_conversation_id(&self) -> &str {
        &self.active_conversation_id
    }

    /// Look up a conversation by id.
    pub fn conversation(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    fn conversation_mut(&mut self, id: &str) -> Option<&mut Conversation> {
        self.conversations.iter_mut().find(|c| c.id == id)
    }

    /// The active conversation.
    pub fn current_conversation(&self) -> Option<&Conversation> {
        self.conversation(&self.active_conversation_id)
    }

    /// Messages of the active conversation (empty if there is none).
    pub fn current_messages(&self) -> &[Message] {
        self.current_conversation()
            .map(|c| c.messages.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_loading(&self) -> bool {
        self.generation.is_loading
    }

    pub fn is_generating(&self) -> bool {
        self.generation.is_generating
    }

    /// User-facing error from the last session, if it failed.
    pub fn error(&self) -> Option<&str> {
        self.generation.error.as_deref()
    }

    /// Read-only view of the generation state.
    pub fn generation_state(&self) -> &GenerationState {
        &self.generation
    }

    /// Whether no session is waiting to be finalized.
    pub fn is_settled(&self) -> bool {
        self.generation.session.is_none()
    }

    pub fn client(&self) -> &GenerationClient {
        &self.client
    }

    /// Apply one message from a session.
    ///
    /// Returns `true` if the message changed the store. Messages from a
    /// session that is no longer current are ignored, as are fragments that
    /// arrive after `stop_generating` cleared the cancellation handle.
    pub fn apply(&mut self, message: SessionMessage) -> bool {
        match message {
            SessionMessage::Fragment { session, text } => self.apply_fragment(session, &text),
            SessionMessage::Finished { session, outcome } => {
                self.finish_session(session, outcome)
            }
        }
    }

    /// Wait for the next session message without applying it.
    pub async fn next_message(&mut self) -> Option<SessionMessage> {
        self.message_rx.recv().await
    }

    /// Apply every message that is already queued. Returns how many changed
    /// the store.
    pub fn process_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(message) = self.message_rx.try_recv() {
            if self.apply(message) {
                applied += 1;
            }
        }
        applied
    }

    /// Apply session messages until the current session is finalized.
    pub async fn run_until_settled(&mut self) {
        while !self.is_settled() {
            match self.message_rx.recv().await {
                Some(message) => {
                    self.apply(message);
                }
                None => break,
            }
        }
    }
}
