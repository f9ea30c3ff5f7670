//! Client execution logic: connect, then hand over to the interactive session.

use std::time::Duration;

use tokio::time::timeout;
use tokio_tungstenite::connect_async;

use super::{error::ClientError, session::run_client_session};

/// How long to wait for the WebSocket handshake
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Run the WebSocket client.
///
/// A lost connection ends the session; there is no reconnect.
pub async fn run_client(url: &str) -> Result<(), ClientError> {
    tracing::info!("Attempting to connect to {}", url);

    let (ws_stream, _response) = match timeout(CONNECT_TIMEOUT, connect_async(url)).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => return Err(ClientError::ConnectionError(e.to_string())),
        Err(_) => return Err(ClientError::ConnectionTimeout(url.to_string())),
    };

    tracing::info!("Connected to chat server!");
    println!(
        "\nConnected to {}. Type /quit or press Ctrl+C to exit.\n",
        url
    );

    run_client_session(ws_stream).await?;
    tracing::info!("Client session ended normally");
    Ok(())
}
