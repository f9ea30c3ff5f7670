//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use hiroba_server::infrastructure::dto::websocket::EnvelopeDto;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::{
    net::TcpStream,
    sync::{mpsc, oneshot, watch},
};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite::protocol::Message};

use super::{
    domain::{HELP_TEXT, InputAction, classify_input},
    error::ClientError,
    formatter::MessageFormatter,
    ui::{CHAT_PROMPT, USERNAME_PROMPT, print_above_prompt},
};

/// Run the interactive session over an established connection.
///
/// Returns `Ok` when the user quits or the server closes the connection,
/// and `ClientError::ConnectionLost` when the transport fails.
pub async fn run_client_session(
    ws_stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
) -> Result<(), ClientError> {
    let (mut write, mut read) = ws_stream.split();

    // The read task redraws whichever prompt the input thread currently shows
    let (prompt_tx, prompt_rx) = watch::channel(USERNAME_PROMPT.to_string());

    // Spawn a task to handle incoming messages
    let mut read_task = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let line = match serde_json::from_str::<EnvelopeDto>(text.as_str()) {
                        Ok(envelope) => MessageFormatter::format_envelope(&envelope),
                        Err(_) => MessageFormatter::format_raw_message(text.as_str()),
                    };
                    let prompt = prompt_rx.borrow().clone();
                    print_above_prompt(&line, &prompt);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    println!("\nDisconnected from server.");
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    return Err(ClientError::ConnectionLost);
                }
                _ => {}
            }
        }

        Err(ClientError::ConnectionLost)
    });

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();
    let (ready_tx, ready_rx) = oneshot::channel::<Result<(), String>>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => {
                ready_tx.send(Ok(())).ok();
                rl
            }
            Err(e) => {
                ready_tx.send(Err(e.to_string())).ok();
                return;
            }
        };

        let mut username_sent = false;

        loop {
            let prompt = if username_sent {
                CHAT_PROMPT
            } else {
                USERNAME_PROMPT
            };

            match rl.readline(prompt) {
                Ok(line) => match classify_input(&line) {
                    InputAction::Skip => {
                        if !username_sent {
                            println!("Username cannot be empty.");
                        }
                    }
                    InputAction::Quit => break,
                    InputAction::Help => println!("\n{}\n", HELP_TEXT),
                    InputAction::Send(text) => {
                        rl.add_history_entry(text.as_str()).ok();
                        if input_tx.send(text).is_err() {
                            // Channel closed, exit thread
                            break;
                        }
                        if !username_sent {
                            username_sent = true;
                            prompt_tx.send_replace(CHAT_PROMPT.to_string());
                        }
                    }
                },
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    match ready_rx.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            read_task.abort();
            return Err(ClientError::Readline(e));
        }
        Err(_) => {
            read_task.abort();
            return Err(ClientError::Readline("input thread exited".to_string()));
        }
    }

    // Spawn a task to forward typed lines to the server
    let mut write_task = tokio::spawn(async move {
        while let Some(line) = input_rx.recv().await {
            if let Err(e) = write.send(Message::Text(line.into())).await {
                tracing::warn!("Failed to send message: {}", e);
                return Err(ClientError::ConnectionLost);
            }
        }

        // Input ended (/quit, Ctrl+C or Ctrl+D)
        write.send(Message::Close(None)).await.ok();
        Ok(())
    });

    // If any one of the tasks completes, abort the other
    let outcome = tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            read_result
        }
        write_result = &mut write_task => {
            read_task.abort();
            write_result
        }
    };

    match outcome {
        Ok(result) => result,
        Err(e) => Err(ClientError::ConnectionError(e.to_string())),
    }
}
