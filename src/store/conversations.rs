//! Conversation collection operations.

use crate::models::Conversation;

use super::ConversationStore;

impl ConversationStore {
    /// Create an empty conversation, put it first and make it active.
    ///
    /// Returns the new conversation's id.
    pub fn create_new_conversation(&mut self) -> String {
        self.conversation_count += 1;

        let conversation =
            Conversation::with_generated_id(Conversation::default_name(self.conversation_count));
        let id = conversation.id.clone();

        self.conversations.insert(0, conversation);
        self.active_conversation_id = id.clone();
        self.generation.clear_transient();

        tracing::debug!("Created conversation {}", id);
        id
    }

    /// Make `id` the active conversation.
    ///
    /// Unknown ids leave the active pointer where it is. Transient error and
    /// loading state is cleared either way; an in-flight generation keeps
    /// writing into the conversation it was started in.
    pub fn switch_conversation(&mut self, id: &str) -> bool {
        let found = self.conversation(id).is_some();
        if found {
            self.active_conversation_id = id.to_string();
        } else {
            tracing::debug!("switch_conversation: no conversation {}", id);
        }
        self.generation.clear_transient();
        found
    }

    /// Remove a conversation.
    ///
    /// Deleting the active conversation activates the most recently created
    /// remaining one; deleting the last one creates a fresh replacement. A
    /// generation writing into the deleted conversation is stopped first.
    pub fn delete_conversation(&mut self, id: &str) -> bool {
        let Some(index) = self.conversations.iter().position(|c| c.id == id) else {
            return false;
        };

        let targets_deleted = self
            .generation
            .session
            .as_ref()
            .is_some_and(|s| s.conversation_id == id);
        if targets_deleted {
            self.stop_generating();
        }

        self.conversations.remove(index);
        tracing::debug!("Deleted conversation {}", id);

        if id == self.active_conversation_id {
            match self.conversations.first() {
                Some(next) => self.active_conversation_id = next.id.clone(),
                None => {
                    self.create_new_conversation();
                }
            }
        }
        true
    }

    /// Rename a conversation to `new_name`, trimmed.
    ///
    /// Blank names and unknown ids are ignored.
    pub fn update_conversation_name(&mut self, id: &str, new_name: &str) -> bool {
        let name = new_name.trim();
        if name.is_empty() {
            return false;
        }
        match self.conversation_mut(id) {
            Some(conversation) => {
                conversation.name = name.to_string();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::test_store;
    use crate::models::DEFAULT_CONVERSATION_ID;

    fn assert_invariant(store: &super::ConversationStore) {
        assert!(!store.conversations().is_empty());
        let active = store
            .conversations()
            .iter()
            .filter(|c| c.id == store.active_conversation_id())
            .count();
        assert_eq!(active, 1);
    }

    #[test]
    fn test_create_prepends_and_activates() {
        let mut store = test_store();
        let id = store.create_new_conversation();

        assert_eq!(store.conversations().len(), 2);
        assert_eq!(store.conversations()[0].id, id);
        assert_eq!(store.conversations()[0].name, "Conversation 2");
        assert_eq!(store.active_conversation_id(), id);
        assert_invariant(&store);
    }

    #[test]
    fn test_create_ids_are_unique() {
        let mut store = test_store();
        let ids: Vec<String> = (0..50).map(|_| store.create_new_conversation()).collect();
        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), ids.len());
        assert_eq!(store.conversations()[0].name, "Conversation 51");
    }

    #[test]
    fn test_switch_conversation() {
        let mut store = test_store();
        store.create_new_conversation();

        assert!(store.switch_conversation(DEFAULT_CONVERSATION_ID));
        assert_eq!(store.active_conversation_id(), DEFAULT_CONVERSATION_ID);
        assert_invariant(&store);
    }

    #[test]
    fn test_switch_to_unknown_keeps_pointer() {
        let mut store = test_store();
        assert!(!store.switch_conversation("nope"));
        assert_eq!(store.active_conversation_id(), DEFAULT_CONVERSATION_ID);
        assert_invariant(&store);
    }

    #[test]
    fn test_switch_clears_error() {
        let mut store = test_store();
        store.generation.error = Some("old failure".to_string());
        store.generation.is_loading = true;

        store.switch_conversation(DEFAULT_CONVERSATION_ID);
        assert!(store.error().is_none());
        assert!(!store.is_loading());
    }

    #[test]
    fn test_delete_active_activates_newest_remaining() {
        let mut store = test_store();
        let second = store.create_new_conversation();
        let third = store.create_new_conversation();

        assert!(store.delete_conversation(&third));
        assert_eq!(store.active_conversation_id(), second);
        assert_eq!(store.conversations().len(), 2);
        assert_invariant(&store);
    }

    #[test]
    fn test_delete_inactive_keeps_active() {
        let mut store = test_store();
        let second = store.create_new_conversation();

        assert!(store.delete_conversation(DEFAULT_CONVERSATION_ID));
        assert_eq!(store.active_conversation_id(), second);
        assert_invariant(&store);
    }

    #[test]
    fn test_delete_last_creates_replacement() {
        let mut store = test_store();
        assert!(store.delete_conversation(DEFAULT_CONVERSATION_ID));

        assert_eq!(store.conversations().len(), 1);
        let replacement = &store.conversations()[0];
        assert_ne!(replacement.id, DEFAULT_CONVERSATION_ID);
        assert_eq!(replacement.name, "Conversation 2");
        assert_eq!(store.active_conversation_id(), replacement.id);
        assert_invariant(&store);
    }

    #[test]
    fn test_delete_unknown_is_noop() {
        let mut store = test_store();
        assert!(!store.delete_conversation("missing"));
        assert_eq!(store.conversations().len(), 1);
        assert_invariant(&store);
    }

    #[test]
    fn test_rename_trims() {
        let mut store = test_store();
        assert!(store.update_conversation_name(DEFAULT_CONVERSATION_ID, "  Trip plans "));
        assert_eq!(store.current_conversation().unwrap().name, "Trip plans");
    }

    #[test]
    fn test_rename_blank_is_noop() {
        let mut store = test_store();
        assert!(!store.update_conversation_name(DEFAULT_CONVERSATION_ID, "   "));
        assert_eq!(store.current_conversation().unwrap().name, "Conversation 1");
    }

    #[test]
    fn test_rename_unknown_is_noop() {
        let mut store = test_store();
        assert!(!store.update_conversation_name("missing", "Name"));
    }
}
