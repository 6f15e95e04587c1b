//! Line-oriented interactive loop.
//!
//! Reads stdin, forwards session messages to the store and prints the
//! transcript to stdout. Diagnostics go through `tracing` on stderr.

use std::io::Write;

use color_eyre::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::models::{MessageRole, ServerMetrics};
use crate::store::{ConversationStore, SendOutcome, SessionMessage};

use super::command::{parse_input, Input, SlashCommand, HELP};

/// Whether the loop should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Handle one line of user input.
pub async fn dispatch<W: Write>(
    store: &mut ConversationStore,
    line: &str,
    out: &mut W,
) -> Result<Flow> {
    let command = match parse_input(line) {
        Ok(Input::Empty) => return Ok(Flow::Continue),
        Ok(Input::Message(text)) => {
            match store.send_message(text) {
                SendOutcome::Started(_) => {}
                SendOutcome::Busy => {
                    writeln!(out, "! still generating; /stop or Ctrl+C first")?
                }
                SendOutcome::NoActiveConversation => writeln!(out, "! no active conversation")?,
            }
            return Ok(Flow::Continue);
        }
        Ok(Input::Command(command)) => command,
        Err(e) => {
            writeln!(out, "! {}", e)?;
            return Ok(Flow::Continue);
        }
    };

    match command {
        SlashCommand::New => {
            let id = store.create_new_conversation();
            writeln!(out, "Started {}", id)?;
        }
        SlashCommand::List => write!(out, "{}", render_conversation_list(store))?,
        SlashCommand::Switch(id) => {
            if store.switch_conversation(&id) {
                write!(out, "{}", render_transcript(store))?;
            } else {
                writeln!(out, "! no conversation {}", id)?;
            }
        }
        SlashCommand::Delete(id) => {
            if store.delete_conversation(&id) {
                writeln!(
                    out,
                    "Deleted {}; active is now {}",
                    id,
                    store.active_conversation_id()
                )?;
            } else {
                writeln!(out, "! no conversation {}", id)?;
            }
        }
        SlashCommand::Rename { id, name } => {
            if !store.update_conversation_name(&id, &name) {
                writeln!(out, "! could not rename {}", id)?;
            }
        }
        SlashCommand::Stop => {
            if store.is_generating() {
                store.stop_generating();
                writeln!(out, "\n[stopped]")?;
            }
        }
        SlashCommand::Metrics => match store.client().fetch_metrics().await {
            Ok(metrics) => write!(out, "{}", render_metrics(&metrics))?,
            Err(e) => writeln!(out, "! {}", e)?,
        },
        SlashCommand::Help => writeln!(out, "{}", HELP)?,
        SlashCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

/// Apply a session message and echo its effect.
///
/// Fragments are written as they are applied; a finished session ends the
/// line and prints the error, if any.
pub fn report<W: Write>(
    store: &mut ConversationStore,
    message: SessionMessage,
    out: &mut W,
) -> std::io::Result<()> {
    let fragment = match &message {
        SessionMessage::Fragment { text, .. } => Some(text.clone()),
        SessionMessage::Finished { .. } => None,
    };

    if !store.apply(message) {
        return Ok(());
    }

    match fragment {
        Some(text) => write!(out, "{}", text)?,
        None => {
            writeln!(out)?;
            if let Some(error) = store.error() {
                writeln!(out, "! {}", error)?;
            }
        }
    }
    out.flush()
}

/// One line per conversation, newest first, `*` marking the active one.
pub fn render_conversation_list(store: &ConversationStore) -> String {
    let mut listing = String::new();
    for conversation in store.conversations() {
        let marker = if conversation.id == store.active_conversation_id() {
            '*'
        } else {
            ' '
        };
        let preview = conversation
            .last_message_preview()
            .map(|p| format!(" - {}", p))
            .unwrap_or_default();
        listing.push_str(&format!(
            "{} {}  {} ({} messages){}\n",
            marker,
            conversation.id,
            conversation.name,
            conversation.messages.len(),
            preview
        ));
    }
    listing
}

/// The active conversation's messages.
pub fn render_transcript(store: &ConversationStore) -> String {
    let mut transcript = String::new();
    if let Some(conversation) = store.current_conversation() {
        transcript.push_str(&format!("== {} ==\n", conversation.name));
        for message in &conversation.messages {
            let who = match message.role {
                MessageRole::User => "you",
                MessageRole::Assistant => "assistant",
            };
            transcript.push_str(&format!("{}> {}\n", who, message.content));
        }
    }
    transcript
}

pub fn render_metrics(metrics: &ServerMetrics) -> String {
    format!(
        "uptime:           {:.0}s\n\
         tokens/s:         {:.2}\n\
         prompt latency:   {:.1} ms\n\
         gen latency:      {:.1} ms\n\
         busy slots:       {:.0}%\n\
         requests:         {} ({} failed, {:.1}% ok)\n\
         kv cache:         {} tokens, {} cells\n\
         tokens:           {} prompt, {} generated\n\
         decode calls:     {}\n",
        metrics.uptime_seconds,
        metrics.tokens_per_second,
        metrics.avg_prompt_latency_ms,
        metrics.avg_generation_latency_ms,
        metrics.busy_slots_ratio * 100.0,
        metrics.total_requests,
        metrics.failed_requests,
        metrics.success_rate * 100.0,
        metrics.kv_cache_tokens,
        metrics.kv_cache_used_cells,
        metrics.total_prompt_tokens,
        metrics.total_generated_tokens,
        metrics.total_decode_calls,
    )
}

/// Run the interactive loop until `/quit`, end of input, or Ctrl+C while
/// idle.
pub async fn run(mut store: ConversationStore) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();

    writeln!(
        stdout,
        "Connected to {} - type /help for commands",
        store.client().config().base_url
    )?;

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => {
                    if dispatch(&mut store, &line, &mut stdout).await? == Flow::Quit {
                        break;
                    }
                    stdout.flush()?;
                }
                None => break,
            },
            Some(message) = store.next_message() => {
                report(&mut store, message, &mut stdout)?;
            }
            signal = tokio::signal::ctrl_c() => {
                signal?;
                if store.is_generating() {
                    store.stop_generating();
                    writeln!(stdout, "\n[stopped]")?;
                } else {
                    break;
                }
            }
        }
    }

    store.stop_generating();
    store.run_until_settled().await;
    tracing::debug!("Interactive loop finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use crate::client::GenerationClient;
    use crate::config::ClientConfig;
    use crate::traits::Response;
    use bytes::Bytes;
    use std::sync::Arc;

    fn store_with(mock: MockHttpClient) -> ConversationStore {
        ConversationStore::new(GenerationClient::with_http(
            ClientConfig::default(),
            Arc::new(mock),
        ))
    }

    async fn run_line(store: &mut ConversationStore, line: &str) -> (Flow, String) {
        let mut out = Vec::new();
        let flow = dispatch(store, line, &mut out).await.unwrap();
        (flow, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn test_message_streams_into_transcript() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::Stream(vec![
            Bytes::from("data: Hi\ndata:  there\n"),
            Bytes::from("data: [DONE]\n"),
        ]));
        let mut store = store_with(mock);

        let (flow, _) = run_line(&mut store, "hello").await;
        assert_eq!(flow, Flow::Continue);

        let mut out = Vec::new();
        while !store.is_settled() {
            let message = store.next_message().await.unwrap();
            report(&mut store, message, &mut out).unwrap();
        }

        assert_eq!(String::from_utf8(out).unwrap(), "Hithere\n");
        assert_eq!(store.current_messages()[1].content, "Hithere");
    }

    #[tokio::test]
    async fn test_failure_is_reported() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::Error(crate::traits::HttpError::ServerError {
            status: 503,
            message: String::new(),
        }));
        let mut store = store_with(mock);

        run_line(&mut store, "hello").await;
        let mut out = Vec::new();
        while !store.is_settled() {
            let message = store.next_message().await.unwrap();
            report(&mut store, message, &mut out).unwrap();
        }

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\n! Failed to send message: HTTP error! status: 503\n"
        );
    }

    #[tokio::test]
    async fn test_busy_send_is_reported() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::StreamThenPending(vec![]));
        let mut store = store_with(mock);

        run_line(&mut store, "one").await;
        let (_, output) = run_line(&mut store, "two").await;
        assert!(output.contains("still generating"));

        let (_, output) = run_line(&mut store, "/stop").await;
        assert!(output.contains("[stopped]"));
        assert!(!store.is_generating());
    }

    #[tokio::test]
    async fn test_conversation_commands() {
        let mut store = store_with(MockHttpClient::new());

        let (_, output) = run_line(&mut store, "/new").await;
        let id = store.active_conversation_id().to_string();
        assert_eq!(output, format!("Started {}\n", id));

        run_line(&mut store, &format!("/rename {} Groceries", id)).await;
        let (_, listing) = run_line(&mut store, "/list").await;
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(&format!("* {}  Groceries", id)));
        assert!(lines[1].starts_with("  default  Conversation 1"));

        let (_, output) = run_line(&mut store, "/switch default").await;
        assert_eq!(output, "== Conversation 1 ==\n");
        assert_eq!(store.active_conversation_id(), "default");

        let (_, output) = run_line(&mut store, "/switch nope").await;
        assert_eq!(output, "! no conversation nope\n");

        let (_, output) = run_line(&mut store, &format!("/delete {}", id)).await;
        assert_eq!(output, format!("Deleted {}; active is now default\n", id));
    }

    #[tokio::test]
    async fn test_metrics_command() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://localhost:8080/metrics",
            MockResponse::Success(Response::new(
                200,
                Bytes::from(
                    r#"{"status":"success","data":{"uptime_seconds":12.0,"total_requests":3,"failed_requests":1,"success_rate":0.6667}}"#,
                ),
            )),
        );
        let mut store = store_with(mock);

        let (_, output) = run_line(&mut store, "/metrics").await;
        assert!(output.contains("uptime:           12s"));
        assert!(output.contains("requests:         3 (1 failed, 66.7% ok)"));
    }

    #[tokio::test]
    async fn test_unknown_command_and_quit() {
        let mut store = store_with(MockHttpClient::new());

        let (flow, output) = run_line(&mut store, "/bogus").await;
        assert_eq!(flow, Flow::Continue);
        assert!(output.starts_with("! unknown command"));

        let (flow, _) = run_line(&mut store, "/quit").await;
        assert_eq!(flow, Flow::Quit);
    }

    #[test]
    fn test_render_metrics_scales_ratios() {
        let rendered = render_metrics(&ServerMetrics {
            total_requests: 3,
            failed_requests: 1,
            success_rate: 0.6667,
            busy_slots_ratio: 0.5,
            ..Default::default()
        });
        assert!(rendered.contains("requests:         3 (1 failed, 66.7% ok)"));
        assert!(rendered.contains("busy slots:       50%"));
    }

    #[test]
    fn test_render_metrics_defaults() {
        let rendered = render_metrics(&ServerMetrics::default());
        assert!(rendered.contains("decode calls:     0"));
    }
}
