//! UseCase: クライアント接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectClientUseCase::execute() メソッド
//! - ID の生成、Unnamed 状態での Registry 登録、挨拶メッセージの送信
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規クライアントの接続
//! - 異常系：チャンネルが既に閉じている（挨拶の送信失敗）

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{
    Client, ClientIdFactory, ClientRegistry, Envelope, MessagePusher, PusherChannel, Timestamp,
};

use super::error::ConnectError;

/// クライアント接続のユースケース
pub struct ConnectClientUseCase {
    /// Registry（データアクセス層の抽象化）
    registry: Arc<dyn ClientRegistry>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl ConnectClientUseCase {
    /// 新しい ConnectClientUseCase を作成
    pub fn new(
        registry: Arc<dyn ClientRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
            clock,
        }
    }

    /// クライアント接続を実行
    ///
    /// # Arguments
    ///
    /// * `sender` - クライアントへのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(Client)` - 接続成功（Unnamed 状態のクライアント）
    /// * `Err(ConnectError)` - 接続失敗
    pub async fn execute(&self, sender: PusherChannel) -> Result<Client, ConnectError> {
        let connected_at = Timestamp::new(self.clock.now());
        let client = Client::new(ClientIdFactory::generate(), connected_at);

        // 1. 挨拶メッセージを最初のフレームとして送信し、MessagePusher に登録
        self.message_pusher
            .register_client(client.id.clone(), sender, &Envelope::welcome(connected_at))
            .await?;

        // 2. Registry に追加（ここからブロードキャストの宛先になる）
        if let Err(e) = self.registry.insert(client.clone()).await {
            self.message_pusher.unregister_client(&client.id).await;
            return Err(e.into());
        }

        tracing::info!(
            "Client {} connected. Total clients: {}",
            client.id,
            self.registry.count().await
        );

        Ok(client)
    }
}
