//! Transient generation state owned by the store.

use tokio_util::sync::CancellationToken;

use super::types::SessionId;

/// The session whose progress the store currently applies.
#[derive(Debug)]
pub struct ActiveSession {
    pub id: SessionId,
    /// Conversation holding the assistant message being filled
    pub conversation_id: String,
    /// Index of that assistant message
    pub message_index: usize,
    /// Cleared by `stop_generating`; fragments are only applied while set
    pub cancel: Option<CancellationToken>,
}

impl ActiveSession {
    /// Whether the session can still be cancelled and receive fragments.
    pub fn is_live(&self) -> bool {
        self.cancel.is_some()
    }
}

/// Store-wide flags describing the in-flight request.
#[derive(Debug, Default)]
pub struct GenerationState {
    pub is_loading: bool,
    pub is_generating: bool,
    pub error: Option<String>,
    pub session: Option<ActiveSession>,
}

impl GenerationState {
    /// The live cancellation handle, if any.
    pub fn cancel_handle(&self) -> Option<&CancellationToken> {
        self.session.as_ref().and_then(|s| s.cancel.as_ref())
    }

    /// The session with this id, if it is the current one.
    pub fn current(&self, id: SessionId) -> Option<&ActiveSession> {
        self.session.as_ref().filter(|s| s.id == id)
    }

    /// Reset everything a finished session leaves behind.
    pub fn finalize(&mut self) {
        self.is_loading = false;
        self.is_generating = false;
        self.session = None;
    }

    /// Clear the flags that conversation navigation resets.
    pub fn clear_transient(&mut self) {
        self.error = None;
        self.is_loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(id: u64, live: bool) -> ActiveSession {
        ActiveSession {
            id: SessionId(id),
            conversation_id: "c".to_string(),
            message_index: 1,
            cancel: live.then(CancellationToken::new),
        }
    }

    #[test]
    fn test_cancel_handle_requires_live_session() {
        let mut state = GenerationState::default();
        assert!(state.cancel_handle().is_none());

        state.session = Some(session(1, false));
        assert!(state.cancel_handle().is_none());

        state.session = Some(session(1, true));
        assert!(state.cancel_handle().is_some());
    }

    #[test]
    fn test_current_matches_id() {
        let state = GenerationState {
            session: Some(session(5, true)),
            ..Default::default()
        };
        assert!(state.current(SessionId(5)).is_some());
        assert!(state.current(SessionId(4)).is_none());
    }

    #[test]
    fn test_finalize_keeps_error() {
        let mut state = GenerationState {
            is_loading: true,
            is_generating: true,
            error: Some("boom".to_string()),
            session: Some(session(1, true)),
        };
        state.finalize();
        assert!(!state.is_loading);
        assert!(!state.is_generating);
        assert!(state.session.is_none());
        assert_eq!(state.error.as_deref(), Some("boom"));
    }
}
