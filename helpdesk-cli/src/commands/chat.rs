//! Interactive chat session against the helpdesk assistant.

use std::sync::Arc;

use anyhow::{Context, Result};
use shared::config::client::Config;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::{debug, info};
use widget::{ChatController, HelpdeskClient, UiEvent};

use crate::terminal::TerminalSink;

/// Lines that end the session, besides end of input.
const QUIT_COMMANDS: [&str; 2] = ["/quit", "/exit"];

/// Runs the chat loop on stdin/stdout until the user quits or input ends.
///
/// # Errors
/// Returns an error if the HTTP client cannot be built or stdin cannot be read.
pub async fn start_chat(config: &Config) -> Result<()> {
    let client = HelpdeskClient::from_config(config).context("failed to build helpdesk client")?;
    info!(api = %client.api_base(), "starting chat session");

    let sink = Arc::new(TerminalSink::stdout());
    let controller =
        Arc::new(ChatController::new(Arc::new(client), sink).with_greeting(config.greeting.clone()));
    controller.start();
    println!("(type /quit to leave)");

    let (events, receiver) = mpsc::channel(16);
    let listener = tokio::spawn(Arc::clone(&controller).listen(receiver));

    let forwarded = forward_input(BufReader::new(tokio::io::stdin()), &events).await;
    // The listener drains anything already submitted before stopping.
    let _ = events.send(UiEvent::Close).await;
    drop(events);
    listener.await.context("chat listener panicked")?;

    forwarded?;
    debug!(messages = controller.history().len(), "chat session ended");
    Ok(())
}

/// Forwards each input line as a submission until a quit command or EOF.
async fn forward_input<R>(reader: R, events: &mpsc::Sender<UiEvent>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await.context("failed to read input")? {
        if QUIT_COMMANDS.contains(&line.trim()) {
            break;
        }
        if events.send(UiEvent::Submit(line)).await.is_err() {
            break;
        }
    }
    Ok(())
}
