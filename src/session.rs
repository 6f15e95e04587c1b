//! Generation session read loop.
//!
//! A session runs as its own task. It never touches the store: each decoded
//! fragment and the final outcome are sent over the store's channel, and the
//! store applies them in arrival order.

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::client::GenerationClient;
use crate::error::GenerationError;
use crate::sse::{StreamDecoder, StreamEvent};
use crate::store::{SessionId, SessionMessage, SessionOutcome};

/// Sends `Finished` when dropped, so the store is settled even if the task
/// panics or is aborted before reporting an outcome.
struct Finalizer {
    session: SessionId,
    tx: mpsc::UnboundedSender<SessionMessage>,
    outcome: Option<SessionOutcome>,
}

impl Finalizer {
    fn new(session: SessionId, tx: mpsc::UnboundedSender<SessionMessage>) -> Self {
        Self {
            session,
            tx,
            outcome: None,
        }
    }
}

impl Drop for Finalizer {
    fn drop(&mut self) {
        let outcome = self
            .outcome
            .take()
            .unwrap_or(SessionOutcome::Failed(GenerationError::Interrupted));
        let _ = self.tx.send(SessionMessage::Finished {
            session: self.session,
            outcome,
        });
    }
}

/// Spawn the read loop for one session.
///
/// Must be called from within a tokio runtime.
pub fn spawn_session(
    client: Arc<GenerationClient>,
    prompt: String,
    session: SessionId,
    cancel: CancellationToken,
    tx: mpsc::UnboundedSender<SessionMessage>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut finalizer = Finalizer::new(session, tx.clone());
        let outcome = run_session(&client, &prompt, session, &cancel, &tx).await;
        match &outcome {
            SessionOutcome::Completed { terminal } => {
                tracing::debug!("{} completed (terminal signal: {})", session, terminal)
            }
            SessionOutcome::Cancelled => tracing::debug!("{} cancelled", session),
            SessionOutcome::Failed(e) => tracing::error!("{} failed: {}", session, e),
        }
        finalizer.outcome = Some(outcome);
    })
}

async fn run_session(
    client: &GenerationClient,
    prompt: &str,
    session: SessionId,
    cancel: &CancellationToken,
    tx: &mpsc::UnboundedSender<SessionMessage>,
) -> SessionOutcome {
    let opened = tokio::select! {
        biased;
        _ = cancel.cancelled() => return SessionOutcome::Cancelled,
        opened = client.open_stream(prompt) => opened,
    };

    let mut stream = match opened {
        Ok(stream) => stream,
        Err(e) => return SessionOutcome::Failed(e),
    };

    let mut decoder = StreamDecoder::new();
    let mut chunks = 0usize;

    let outcome = loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => break SessionOutcome::Cancelled,
            next = stream.next() => next,
        };

        match next {
            Some(Ok(chunk)) => {
                chunks += 1;
                tracing::debug!("{} chunk {} ({} bytes)", session, chunks, chunk.len());
                if let Some(outcome) = deliver(decoder.feed(&chunk), session, cancel, tx) {
                    break outcome;
                }
            }
            Some(Err(e)) => break SessionOutcome::Failed(GenerationError::StreamRead(e)),
            None => {
                let tail = decoder.finish().into_iter().collect();
                break deliver(tail, session, cancel, tx)
                    .unwrap_or(SessionOutcome::Completed { terminal: false });
            }
        }
    };

    drop(stream);
    tracing::debug!("{} released stream reader after {} chunks", session, chunks);

    outcome
}

/// Forward decoded events in order. Returns the outcome if one of them ends
/// the session.
fn deliver(
    events: Vec<StreamEvent>,
    session: SessionId,
    cancel: &CancellationToken,
    tx: &mpsc::UnboundedSender<SessionMessage>,
) -> Option<SessionOutcome> {
    for event in events {
        if cancel.is_cancelled() {
            return Some(SessionOutcome::Cancelled);
        }
        match event {
            StreamEvent::Fragment(text) => {
                if tx.send(SessionMessage::Fragment { session, text }).is_err() {
                    // Store is gone; nobody is listening.
                    return Some(SessionOutcome::Cancelled);
                }
            }
            StreamEvent::Terminal => return Some(SessionOutcome::Completed { terminal: true }),
        }
    }
    None
}
