//! Identifier generation.

use uuid::Uuid;

use super::value_object::ClientId;

/// Generates collision-resistant client identifiers (`client_<uuid>`).
pub struct ClientIdFactory;

impl ClientIdFactory {
    pub fn generate() -> ClientId {
        ClientId(format!("client_{}", Uuid::new_v4().simple()))
    }
}
