//! Shared fixtures for use case tests.

use std::sync::Arc;

use hiroba_shared::time::{Clock, FixedClock};
use tokio::sync::mpsc;

use crate::{
    domain::{
        Client, ClientId, ClientRegistry, DisplayName, Envelope, MessagePusher, OutboundFrame,
        Timestamp,
    },
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryClientRegistry,
    },
};

pub(crate) type Inbox = mpsc::UnboundedReceiver<OutboundFrame>;

pub(crate) struct TestContext {
    pub registry: Arc<InMemoryClientRegistry>,
    pub pusher: Arc<WebSocketMessagePusher>,
    pub clock: Arc<FixedClock>,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(InMemoryClientRegistry::new()),
            pusher: Arc::new(WebSocketMessagePusher::new()),
            clock: Arc::new(FixedClock::from_millis(1_704_067_200_000)),
        }
    }

    pub fn timestamp(&self) -> Timestamp {
        Timestamp::new(self.clock.now())
    }

    /// Register an Unnamed client and discard its welcome frame.
    pub async fn connect(&self, id: &str) -> (ClientId, Inbox) {
        let client_id = ClientId::new(id.to_string()).unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        self.pusher
            .register_client(client_id.clone(), tx, &Envelope::welcome(self.timestamp()))
            .await
            .unwrap();
        self.registry
            .insert(Client::new(client_id.clone(), self.timestamp()))
            .await
            .unwrap();
        rx.recv().await;
        (client_id, rx)
    }

    /// Register a Named client without emitting any envelope.
    pub async fn connect_named(&self, id: &str, name: &str) -> (ClientId, Inbox) {
        let (client_id, rx) = self.connect(id).await;
        self.registry
            .assign_name(&client_id, DisplayName::new(name).unwrap())
            .await
            .unwrap();
        (client_id, rx)
    }
}

/// Collect every JSON frame currently queued in an inbox.
pub(crate) fn drain(inbox: &mut Inbox) -> Vec<serde_json::Value> {
    let mut frames = Vec::new();
    while let Ok(frame) = inbox.try_recv() {
        match frame {
            OutboundFrame::Text(json) => frames.push(serde_json::from_str(&json).unwrap()),
            OutboundFrame::Close => frames.push(serde_json::json!({ "close": true })),
        }
    }
    frames
}
