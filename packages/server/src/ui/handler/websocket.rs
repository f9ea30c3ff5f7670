//! WebSocket connection handlers.
//!
//! Each connection runs two tasks: a receiver that feeds inbound payloads to
//! the protocol use case in arrival order, and a pusher that is the only
//! writer of the socket sink. When either ends, the other is aborted and the
//! client is disconnected.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade, close_code},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::{
    sync::mpsc,
    task::{AbortHandle, JoinHandle},
};

use crate::{
    domain::{ClientId, OutboundFrame, RegistryError},
    ui::state::AppState,
    usecase::{ConnectError, ReceiveMessageError},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Guarantees the disconnect path runs however the connection handler ends.
///
/// On the normal path `finish` runs the disconnect inline. If the handler
/// future is dropped first (runtime shutdown, cancellation), `Drop` aborts the
/// connection tasks and schedules the same disconnect.
struct DisconnectGuard {
    state: Arc<AppState>,
    client_id: Option<ClientId>,
    tasks: Vec<AbortHandle>,
}

impl DisconnectGuard {
    fn new(state: Arc<AppState>, client_id: ClientId) -> Self {
        Self {
            state,
            client_id: Some(client_id),
            tasks: Vec::new(),
        }
    }

    fn watch<T>(&mut self, task: &JoinHandle<T>) {
        self.tasks.push(task.abort_handle());
    }

    async fn finish(mut self) {
        if let Some(client_id) = &self.client_id {
            disconnect(&self.state, client_id).await;
        }
        self.client_id = None;
    }
}

impl Drop for DisconnectGuard {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
        let Some(client_id) = self.client_id.take() else {
            return;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No runtime to clean up client '{}'", client_id);
            return;
        };
        let state = self.state.clone();
        runtime.spawn(async move {
            disconnect(&state, &client_id).await;
        });
    }
}

async fn disconnect(state: &AppState, client_id: &ClientId) {
    match state.disconnect_client_usecase.execute(client_id).await {
        Ok(Some(_)) => tracing::debug!("Client '{}' removed from registry", client_id),
        Ok(None) => tracing::debug!("Client '{}' was already removed", client_id),
        Err(e) => tracing::warn!("Failed to broadcast leave for '{}': {}", client_id, e),
    }
}

/// Spawns the writer task: drains the client's channel into the WebSocket sink.
///
/// The task ends on a `Close` frame or on the first write error; dropping the
/// receiver makes every later push to this client fail.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<OutboundFrame>,
    mut sender: SplitSink<WebSocket, Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            match frame {
                OutboundFrame::Text(payload) => {
                    if sender.send(Message::Text(payload.into())).await.is_err() {
                        break;
                    }
                }
                OutboundFrame::Close => {
                    let close = CloseFrame {
                        code: close_code::AWAY,
                        reason: Utf8Bytes::from_static("server shutting down"),
                    };
                    if let Err(e) = sender.send(Message::Close(Some(close))).await {
                        tracing::debug!("Failed to send close frame: {}", e);
                    }
                    break;
                }
            }
        }
    })
}

/// Spawns the reader task: hands every inbound payload to the protocol use case.
fn receiver_loop(
    mut receiver: SplitStream<WebSocket>,
    state: Arc<AppState>,
    client_id: ClientId,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error from '{}': {}", client_id, e);
                    break;
                }
            };

            let result = match msg {
                Message::Text(text) => {
                    state
                        .receive_message_usecase
                        .execute(&client_id, text.as_str())
                        .await
                }
                Message::Binary(data) => match std::str::from_utf8(&data) {
                    Ok(text) => state.receive_message_usecase.execute(&client_id, text).await,
                    Err(e) => {
                        tracing::warn!("Malformed payload from '{}': {}", client_id, e);
                        if let Err(e) = state
                            .receive_message_usecase
                            .report_malformed(&client_id)
                            .await
                        {
                            tracing::warn!("Failed to report error to '{}': {}", client_id, e);
                        }
                        continue;
                    }
                },
                Message::Ping(_) | Message::Pong(_) => {
                    // Ping/pong is handled automatically by the WebSocket protocol
                    continue;
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", client_id);
                    break;
                }
            };

            match result {
                Ok(outcome) => tracing::debug!(?outcome, "Handled message from '{}'", client_id),
                Err(ReceiveMessageError::ClientNotFound(_)) => {
                    tracing::debug!("Client '{}' is no longer registered", client_id);
                    break;
                }
                Err(e) => tracing::warn!("Failed to handle message from '{}': {}", client_id, e),
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    // Create a channel for this client to receive messages
    let (tx, rx) = mpsc::unbounded_channel();

    // Register the client (Unnamed) and queue its welcome message
    let client = match state.connect_client_usecase.execute(tx).await {
        Ok(client) => client,
        Err(ConnectError::Registry(RegistryError::Closed)) => {
            tracing::debug!("Server is shutting down, dropping new connection");
            return;
        }
        Err(e) => {
            tracing::error!("Failed to register connection: {}", e);
            return;
        }
    };

    let mut guard = DisconnectGuard::new(state.clone(), client.id.clone());
    let (sender, receiver) = socket.split();

    let mut send_task = pusher_loop(rx, sender);
    guard.watch(&send_task);
    let mut recv_task = receiver_loop(receiver, state, client.id);
    guard.watch(&recv_task);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    guard.finish().await;
}
