//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `PusherChannel`（writer タスクへのチャンネル）を管理
//! - Envelope を JSON にシリアライズし、チャンネルに積む（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成と writer タスクの起動は UI 層（`ui/handler/websocket.rs`）で行われます。
//! writer タスクが終了するとチャンネルの受信側が破棄され、以降の送信は失敗します。
//! broadcast はこの失敗を「書き込み失敗」として呼び出し元に返します。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{ClientId, Envelope, MessagePushError, MessagePusher, OutboundFrame, PusherChannel},
    infrastructure::dto::conversion::encode_envelope,
};

/// WebSocket を使った MessagePusher 実装
#[derive(Default)]
pub struct WebSocketMessagePusher {
    /// Key: client_id, Value: writer タスクへのチャンネル
    clients: Mutex<HashMap<ClientId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new() -> Self {
        Self::default()
    }
}

fn encode(envelope: &Envelope) -> Result<String, MessagePushError> {
    encode_envelope(envelope).map_err(|e| MessagePushError::EncodeFailed(e.to_string()))
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(
        &self,
        client_id: ClientId,
        sender: PusherChannel,
        greeting: &Envelope,
    ) -> Result<(), MessagePushError> {
        let payload = encode(greeting)?;

        let mut clients = self.clients.lock().await;
        sender
            .send(OutboundFrame::Text(payload))
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Client '{}' registered to MessagePusher", client_id);
        clients.insert(client_id, sender);
        Ok(())
    }

    async fn unregister_client(&self, client_id: &ClientId) {
        let mut clients = self.clients.lock().await;
        if clients.remove(client_id).is_some() {
            tracing::debug!("Client '{}' unregistered from MessagePusher", client_id);
        }
    }

    async fn push_to(
        &self,
        client_id: &ClientId,
        envelope: &Envelope,
    ) -> Result<(), MessagePushError> {
        let payload = encode(envelope)?;
        let clients = self.clients.lock().await;

        let sender = clients
            .get(client_id)
            .ok_or_else(|| MessagePushError::ClientNotFound(client_id.as_str().to_string()))?;
        sender
            .send(OutboundFrame::Text(payload))
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed message to client '{}'", client_id);
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: &[ClientId],
        envelope: &Envelope,
    ) -> Result<Vec<ClientId>, MessagePushError> {
        let payload = encode(envelope)?;
        let clients = self.clients.lock().await;

        let mut failed = Vec::new();
        for target in targets {
            match clients.get(target) {
                Some(sender) => {
                    // ブロードキャストでは一部の送信失敗を許容
                    if let Err(e) = sender.send(OutboundFrame::Text(payload.clone())) {
                        tracing::warn!("Failed to push message to client '{}': {}", target, e);
                        failed.push(target.clone());
                    }
                }
                None => {
                    tracing::debug!("Client '{}' not found during broadcast, skipping", target);
                }
            }
        }

        Ok(failed)
    }

    async fn close_all(&self) -> usize {
        let mut clients = self.clients.lock().await;
        let closed = clients.len();
        for (client_id, sender) in clients.drain() {
            if sender.send(OutboundFrame::Close).is_err() {
                tracing::debug!("Client '{}' was already closed", client_id);
            }
        }
        closed
    }
}
