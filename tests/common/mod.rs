//! Common test utilities for integration tests.
//!
//! This module provides reusable fixtures for building a store over a
//! scripted transport and for driving it to completion.
//!
//! # Example
//!
//! ```ignore
//! use common::{settle, store_with, MockHttpConfig};
//!
//! let mut store = store_with(MockHttpConfig::new().with_stream(&["data: hi\n"]).build());
//! store.send_message("hello");
//! settle(&mut store).await;
//! ```

pub mod mocks;

pub use mocks::*;

use std::sync::Arc;
use std::time::Duration;

use parley::client::GenerationClient;
use parley::config::ClientConfig;
use parley::store::ConversationStore;

/// Upper bound for any single wait in integration tests.
#[allow(dead_code)]
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Creates a store whose client talks to `mock`.
#[allow(dead_code)]
pub fn store_with(mock: MockHttpClient) -> ConversationStore {
    ConversationStore::new(GenerationClient::with_http(
        ClientConfig::default(),
        Arc::new(mock),
    ))
}

/// Applies session messages until the current session is finalized.
///
/// Panics if that takes longer than [`TEST_TIMEOUT`].
#[allow(dead_code)]
pub async fn settle(store: &mut ConversationStore) {
    tokio::time::timeout(TEST_TIMEOUT, store.run_until_settled())
        .await
        .expect("session did not settle in time");
}

/// Applies session messages until `text` has been streamed into the
/// assistant message at `index` of the active conversation.
#[allow(dead_code)]
pub async fn wait_for_content(store: &mut ConversationStore, index: usize, text: &str) {
    let wait = async {
        while store.current_messages()[index].content != text {
            match store.next_message().await {
                Some(message) => {
                    store.apply(message);
                }
                None => break,
            }
        }
    };
    tokio::time::timeout(TEST_TIMEOUT, wait)
        .await
        .expect("content did not arrive in time");
}
