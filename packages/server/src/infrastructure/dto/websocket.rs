//! WebSocket message DTOs.
//!
//! Every outbound frame is one JSON object:
//!
//! ```json
//! {"type":"message","username":"Alice","content":"hi","timestamp":"2024-01-01T00:00:00.000Z","clientId":"client_..."}
//! ```
//!
//! Optional fields are omitted when absent.

use serde::{Deserialize, Serialize};

/// Message type discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Message,
    Join,
    Leave,
    Error,
}

/// Envelope as serialized on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeDto {
    pub r#type: MessageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}
