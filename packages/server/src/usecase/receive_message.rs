//! UseCase: 受信メッセージ処理（プロトコル状態機械）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ReceiveMessageUseCase::execute() メソッド
//! - Unnamed: 最初のメッセージを表示名として登録し、join を他の全員に配信
//! - Named: メッセージをチャットとして送信者以外の全員に配信
//!
//! ### なぜこのテストが必要か
//! - join は一度だけ、送信者には自分のメッセージが返らないことを保証する
//! - 空の表示名は拒否され、Unnamed のまま再入力できることを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：名前登録、チャット送信
//! - 異常系：空の表示名、未登録のクライアント、不正なペイロード
//! - エッジケース：空白のみのチャット

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{
    ClientId, ClientRegistry, ClientState, DisplayName, Envelope, MessageContent, MessagePusher,
    Timestamp,
};

use super::{
    broadcast::{BroadcastReport, BroadcastUseCase},
    error::ReceiveMessageError,
};

const EMPTY_NAME_ERROR: &str = "Username cannot be empty. Please type a username.";
const MALFORMED_PAYLOAD_ERROR: &str = "Error processing your message";

/// 受信メッセージ処理の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiveOutcome {
    /// 表示名を登録した（Unnamed → Named）
    Registered(DisplayName),
    /// 空の表示名を拒否した（Unnamed のまま）
    NameRejected,
    /// チャットを配信した
    Broadcasted(BroadcastReport),
}

/// 受信メッセージ処理のユースケース
pub struct ReceiveMessageUseCase {
    registry: Arc<dyn ClientRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
    broadcast: Arc<BroadcastUseCase>,
    clock: Arc<dyn Clock>,
}

impl ReceiveMessageUseCase {
    pub fn new(
        registry: Arc<dyn ClientRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
        broadcast: Arc<BroadcastUseCase>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
            broadcast,
            clock,
        }
    }

    /// クライアントから受信したテキストを処理する
    ///
    /// # Arguments
    ///
    /// * `client_id` - 送信元のクライアント ID
    /// * `payload` - 受信した生のテキスト
    pub async fn execute(
        &self,
        client_id: &ClientId,
        payload: &str,
    ) -> Result<ReceiveOutcome, ReceiveMessageError> {
        let client = self
            .registry
            .get(client_id)
            .await
            .ok_or_else(|| ReceiveMessageError::ClientNotFound(client_id.as_str().to_string()))?;

        match client.state {
            ClientState::Unnamed => self.register_name(client_id, payload).await,
            ClientState::Named(name) => self.send_chat(client_id, &name, payload).await,
        }
    }

    /// 解釈できないペイロードを受信したことを送信者にだけ通知する
    pub async fn report_malformed(&self, client_id: &ClientId) -> Result<(), ReceiveMessageError> {
        let envelope = Envelope::error(MALFORMED_PAYLOAD_ERROR, self.now());
        self.message_pusher.push_to(client_id, &envelope).await?;
        Ok(())
    }

    async fn register_name(
        &self,
        client_id: &ClientId,
        payload: &str,
    ) -> Result<ReceiveOutcome, ReceiveMessageError> {
        let Ok(name) = DisplayName::new(payload) else {
            tracing::debug!("Client {} sent an empty username", client_id);
            let envelope = Envelope::error(EMPTY_NAME_ERROR, self.now());
            self.message_pusher.push_to(client_id, &envelope).await?;
            return Ok(ReceiveOutcome::NameRejected);
        };

        self.registry.assign_name(client_id, name.clone()).await?;
        tracing::info!("Client {} set username: {}", client_id, name);

        // 1. 他の全クライアントに join を配信
        let joined = Envelope::joined(client_id, &name, self.now());
        self.broadcast.execute(joined, Some(client_id)).await?;

        // 2. 本人にだけ登録完了を通知
        let registered = Envelope::registered(&name, self.now());
        self.message_pusher.push_to(client_id, &registered).await?;

        Ok(ReceiveOutcome::Registered(name))
    }

    async fn send_chat(
        &self,
        client_id: &ClientId,
        name: &DisplayName,
        payload: &str,
    ) -> Result<ReceiveOutcome, ReceiveMessageError> {
        // 空白のみのペイロードも空の本文のチャットとして配信する
        let content = MessageContent::new(payload);
        tracing::info!("Message from {}: {}", name, content.as_str());
        let chat = Envelope::chat(client_id, name, content, self.now());
        let report = self.broadcast.execute(chat, Some(client_id)).await?;

        Ok(ReceiveOutcome::Broadcasted(report))
    }

    fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now())
    }
}
