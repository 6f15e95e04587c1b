//! Starting, stopping and settling generation sessions.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::models::Message;
use crate::session::spawn_session;

use super::state::ActiveSession;
use super::types::{SendOutcome, SessionId, SessionOutcome};
use super::ConversationStore;

impl ConversationStore {
    /// Send `content` in the active conversation and start streaming the reply.
    ///
    /// The user message and an empty assistant message are appended before
    /// this returns; the reply fills in as session messages are applied.
    /// While a session still holds its cancellation handle the call is
    /// rejected with [`SendOutcome::Busy`] and nothing changes.
    ///
    /// Must be called from within a tokio runtime.
    pub fn send_message(&mut self, content: impl Into<String>) -> SendOutcome {
        let content = content.into();

        if self.generation.cancel_handle().is_some() {
            tracing::warn!("send_message rejected: a response is still generating");
            return SendOutcome::Busy;
        }

        let conversation_id = self.active_conversation_id.clone();
        let Some(conversation) = self.conversation_mut(&conversation_id) else {
            return SendOutcome::NoActiveConversation;
        };

        conversation.messages.push(Message::user(content.clone()));
        let message_index = conversation.messages.len();
        conversation.messages.push(Message::assistant_placeholder());

        let session = SessionId(self.next_session_id);
        self.next_session_id += 1;

        let cancel = CancellationToken::new();
        self.generation.is_loading = true;
        self.generation.is_generating = true;
        self.generation.error = None;
        self.generation.session = Some(ActiveSession {
            id: session,
            conversation_id: conversation_id.clone(),
            message_index,
            cancel: Some(cancel.clone()),
        });

        tracing::info!(
            "Starting {} in conversation {} ({} bytes)",
            session,
            conversation_id,
            content.len()
        );

        spawn_session(
            Arc::clone(&self.client),
            content,
            session,
            cancel,
            self.message_tx.clone(),
        );

        SendOutcome::Started(session)
    }

    /// Cancel the in-flight generation, if any.
    ///
    /// Fragments already received stay in the message; nothing after this
    /// call is applied. Calling it again is a no-op.
    pub fn stop_generating(&mut self) {
        let Some(session) = self.generation.session.as_mut() else {
            return;
        };
        let Some(cancel) = session.cancel.take() else {
            return;
        };

        cancel.cancel();
        self.generation.is_generating = false;
        tracing::info!("Stopped {}", session.id);
    }

    pub(super) fn apply_fragment(&mut self, session: SessionId, text: &str) -> bool {
        let Some(active) = self.generation.current(session).filter(|s| s.is_live()) else {
            tracing::trace!("Dropping fragment from inactive {}", session);
            return false;
        };
        let conversation_id = active.conversation_id.clone();
        let message_index = active.message_index;

        match self
            .conversation_mut(&conversation_id)
            .and_then(|c| c.messages.get_mut(message_index))
        {
            Some(message) => {
                message.append_fragment(text);
                true
            }
            None => false,
        }
    }

    pub(super) fn finish_session(&mut self, session: SessionId, outcome: SessionOutcome) -> bool {
        if self.generation.current(session).is_none() {
            tracing::debug!("Ignoring outcome of superseded {}", session);
            return false;
        }

        match outcome {
            SessionOutcome::Completed { terminal } => {
                tracing::info!("{} complete (terminal signal: {})", session, terminal);
            }
            SessionOutcome::Cancelled => {
                tracing::info!("{} aborted", session);
            }
            SessionOutcome::Failed(err) => {
                tracing::error!("{} failed: {}", session, err);
                self.generation.error = Some(err.user_message());
            }
        }

        self.generation.finalize();
        true
    }
}
