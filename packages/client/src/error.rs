//! Error types for the chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server did not accept the connection in time
    #[error("Timed out connecting to {0}")]
    ConnectionTimeout(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The connection dropped without a close handshake
    #[error("Connection lost")]
    ConnectionLost,

    /// The terminal could not be initialized
    #[error("Readline error: {0}")]
    Readline(String),
}
