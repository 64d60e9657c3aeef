//! Interactive streaming chat in the terminal.
//!
//! Plays the part of the UI: prints deltas as they arrive, carries the session
//! id from one turn to the next, and shows a fallback message when the
//! transport fails. Ctrl-C cancels the turn in progress.
//!
//! Start the backend, then run:
//!   RUST_LOG=debug cargo run --example chat -p chatstream-client

use std::io::Write;

use chatstream_client::{ChatClient, ChatError, StreamCallbacks};
use chatstream_types::ChatRequest;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

/// Shown in place of the assistant turn when the request fails.
const FALLBACK_REPLY: &str =
    "Sorry, the request failed. Please check that the backend service is running.";

/// Prints one assistant turn and remembers the session it belongs to.
struct Terminal<'a> {
    session_id: &'a mut Option<String>,
}

impl StreamCallbacks for Terminal<'_> {
    fn on_session(&mut self, session_id: &str) {
        *self.session_id = Some(session_id.to_string());
    }

    fn on_delta(&mut self, text: &str) {
        print!("{text}");
        let _ = std::io::stdout().flush();
    }

    fn on_done(&mut self) {
        println!();
    }

    fn on_error(&mut self, error: &ChatError) {
        tracing::warn!(%error, "chat turn failed");
        println!("\n{FALLBACK_REPLY}");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let client = ChatClient::from_env()?;
    match client.health().await {
        Ok(health) if health.is_ok() => {}
        Ok(health) => eprintln!("backend reports status {:?}", health.status),
        Err(e) => eprintln!("health check failed: {e}"),
    }

    let mut session_id: Option<String> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Type a message (\"/new\" starts a new chat, Ctrl-D quits).");
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if message == "/new" {
            session_id = None;
            println!("(new chat)");
            continue;
        }

        let mut request = ChatRequest::new(message);
        request.session_id = session_id.clone();

        let cancel = CancellationToken::new();
        let ctrl_c = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancel.cancel();
                }
            })
        };

        let mut terminal = Terminal {
            session_id: &mut session_id,
        };
        // Errors were already shown by `on_error`.
        let _ = client
            .stream_message_with(&request, &mut terminal, &cancel)
            .await;
        ctrl_c.abort();

        if cancel.is_cancelled() {
            println!("\n(cancelled)");
        }
    }

    Ok(())
}
