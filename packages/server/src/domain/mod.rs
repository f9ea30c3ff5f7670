//! Domain layer: value objects, entities and the ports the use cases depend on.

pub mod entity;
pub mod error;
pub mod factory;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use entity::{Client, ClientState, Envelope, EnvelopeKind};
pub use error::{MessagePushError, RegistryError, ValueObjectError};
pub use factory::ClientIdFactory;
pub use message_pusher::{MessagePusher, OutboundFrame, PusherChannel};
pub use repository::ClientRegistry;
pub use value_object::{ClientId, DisplayName, MessageContent, Timestamp};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
