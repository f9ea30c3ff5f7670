//! Conversion logic between DTOs and domain entities.

use crate::domain::{Envelope, EnvelopeKind};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// Domain Entity → DTO
// ========================================

impl From<EnvelopeKind> for dto::MessageType {
    fn from(kind: EnvelopeKind) -> Self {
        match kind {
            EnvelopeKind::Message => Self::Message,
            EnvelopeKind::Join => Self::Join,
            EnvelopeKind::Leave => Self::Leave,
            EnvelopeKind::Error => Self::Error,
        }
    }
}

impl From<&Envelope> for dto::EnvelopeDto {
    fn from(envelope: &Envelope) -> Self {
        Self {
            r#type: envelope.kind().into(),
            username: envelope.username().map(|name| name.as_str().to_string()),
            content: envelope.content().map(str::to_string),
            timestamp: envelope.timestamp().to_iso8601(),
            client_id: envelope.client_id().map(|id| id.as_str().to_string()),
        }
    }
}

/// Serialize an envelope to its on-wire JSON text
pub fn encode_envelope(envelope: &Envelope) -> Result<String, serde_json::Error> {
    serde_json::to_string(&dto::EnvelopeDto::from(envelope))
}
