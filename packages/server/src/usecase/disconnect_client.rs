//! UseCase: クライアント切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectClientUseCase::execute() メソッド
//! - Registry からの削除と、Named クライアントの leave 配信
//!
//! ### なぜこのテストが必要か
//! - 切断後に Registry のエントリが残らないことを保証する
//! - leave は Named クライアントの切断時に一度だけ配信されることを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：Named / Unnamed クライアントの切断
//! - エッジケース：同じクライアントの二重切断、最後のクライアントの切断

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{Client, ClientId, ClientRegistry, Envelope, MessagePusher, Timestamp};

use super::{broadcast::BroadcastUseCase, error::BroadcastError};

/// クライアント切断のユースケース
pub struct DisconnectClientUseCase {
    registry: Arc<dyn ClientRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
    broadcast: Arc<BroadcastUseCase>,
    clock: Arc<dyn Clock>,
}

impl DisconnectClientUseCase {
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

    /// クライアント切断を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Client))` - 削除したクライアント
    /// * `Ok(None)` - 既に削除済み（何もしない）
    /// * `Err(BroadcastError)` - leave の配信に失敗（クライアントは削除済み）
    pub async fn execute(&self, client_id: &ClientId) -> Result<Option<Client>, BroadcastError> {
        // 1. Registry から削除（最初の呼び出しだけが Some を受け取る）
        let Some(client) = self.registry.remove(client_id).await else {
            self.message_pusher.unregister_client(client_id).await;
            return Ok(None);
        };

        // 2. MessagePusher から登録解除
        self.message_pusher.unregister_client(client_id).await;

        tracing::info!(
            "Client {} ({}) disconnected. Total clients: {}",
            client_id,
            client
                .display_name()
                .map(|name| name.as_str())
                .unwrap_or("unknown"),
            self.registry.count().await
        );

        // 3. Named なら残りのクライアントに leave を配信
        if let Some(name) = client.display_name() {
            let left = Envelope::left(client_id, name, Timestamp::new(self.clock.now()));
            self.broadcast.execute(left, Some(client_id)).await?;
        }

        Ok(Some(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::{TestContext, drain};

    fn usecase(ctx: &TestContext) -> DisconnectClientUseCase {
        let broadcast = Arc::new(BroadcastUseCase::new(
            ctx.registry.clone(),
            ctx.pusher.clone(),
            ctx.clock.clone(),
        ));
        DisconnectClientUseCase::new(
            ctx.registry.clone(),
            ctx.pusher.clone(),
            broadcast,
            ctx.clock.clone(),
        )
    }

    #[tokio::test]
    async fn test_disconnect_named_client_broadcasts_one_leave() {
        // テスト項目: Named クライアントの切断で残りの全員に leave が一度だけ届く
        // given (前提条件):
        let ctx = TestContext::new();
        let (alice, _alice_rx) = ctx.connect_named("alice", "Alice").await;
        let (_bob, mut bob_rx) = ctx.connect_named("bob", "Bob").await;
        let (_carol, mut carol_rx) = ctx.connect("carol").await;

        // when (操作):
        let removed = usecase(&ctx).execute(&alice).await.unwrap();

        // then (期待する結果):
        assert_eq!(removed.map(|c| c.id), Some(alice.clone()));
        assert_eq!(ctx.registry.count().await, 2);
        for rx in [&mut bob_rx, &mut carol_rx] {
            let frames = drain(rx);
            assert_eq!(frames.len(), 1);
            assert_eq!(frames[0]["type"], "leave");
            assert_eq!(frames[0]["username"], "Alice");
            assert_eq!(frames[0]["content"], "Alice left the chat");
        }
    }

    #[tokio::test]
    async fn test_disconnect_unnamed_client_is_silent() {
        // テスト項目: Unnamed クライアントの切断では leave が配信されない
        // given (前提条件):
        let ctx = TestContext::new();
        let (carol, _carol_rx) = ctx.connect("carol").await;
        let (_bob, mut bob_rx) = ctx.connect_named("bob", "Bob").await;

        // when (操作):
        let removed = usecase(&ctx).execute(&carol).await.unwrap();

        // then (期待する結果):
        assert!(removed.is_some());
        assert_eq!(ctx.registry.count().await, 1);
        assert!(drain(&mut bob_rx).is_empty());
    }

    #[tokio::test]
    async fn test_disconnect_twice_emits_single_leave() {
        // テスト項目: 同じクライアントを二度切断しても leave は一度だけ
        // given (前提条件):
        let ctx = TestContext::new();
        let usecase = usecase(&ctx);
        let (alice, _alice_rx) = ctx.connect_named("alice", "Alice").await;
        let (_bob, mut bob_rx) = ctx.connect_named("bob", "Bob").await;

        // when (操作):
        let first = usecase.execute(&alice).await.unwrap();
        let second = usecase.execute(&alice).await.unwrap();

        // then (期待する結果):
        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(drain(&mut bob_rx).len(), 1);
    }

    #[tokio::test]
    async fn test_disconnect_last_client() {
        // テスト項目: 最後のクライアントの切断で Registry が空になる
        // given (前提条件):
        let ctx = TestContext::new();
        let (alice, _alice_rx) = ctx.connect_named("alice", "Alice").await;

        // when (操作):
        usecase(&ctx).execute(&alice).await.unwrap();

        // then (期待する結果):
        assert_eq!(ctx.registry.count().await, 0);
    }
}
