//! UseCase: サーバー停止時の全接続クローズ

use std::sync::Arc;

use crate::domain::{ClientRegistry, MessagePusher};

/// 停止処理の結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Close フレームを送った接続数
    pub closed_connections: usize,
    /// Registry から削除したクライアント数
    pub removed_clients: usize,
}

/// 全接続をクローズし、Registry を空にするユースケース
///
/// leave は配信しません。何度呼び出しても安全です。
pub struct ShutdownUseCase {
    registry: Arc<dyn ClientRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl ShutdownUseCase {
    pub fn new(registry: Arc<dyn ClientRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    pub async fn execute(&self) -> ShutdownReport {
        // 1. 全接続に Close を送る
        let closed_connections = self.message_pusher.close_all().await;
        // 2. Registry を空にし、以降の接続を登録させない
        let removed_clients = self.registry.close().await.len();

        ShutdownReport {
            closed_connections,
            removed_clients,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::RegistryError,
        usecase::{
            ConnectClientUseCase, ConnectError,
            test_support::{TestContext, drain},
        },
    };
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_shutdown_closes_every_connection() {
        // テスト項目: 全接続に Close が送られ、Registry が空になる
        // given (前提条件):
        let ctx = TestContext::new();
        let usecase = ShutdownUseCase::new(ctx.registry.clone(), ctx.pusher.clone());
        let (_alice, mut alice_rx) = ctx.connect_named("alice", "Alice").await;
        let (_carol, mut carol_rx) = ctx.connect("carol").await;

        // when (操作):
        let report = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(
            report,
            ShutdownReport {
                closed_connections: 2,
                removed_clients: 2,
            }
        );
        assert_eq!(ctx.registry.count().await, 0);
        // leave は配信されず、Close だけが届く
        assert_eq!(drain(&mut alice_rx), vec![serde_json::json!({ "close": true })]);
        assert_eq!(drain(&mut carol_rx), vec![serde_json::json!({ "close": true })]);
    }

    #[tokio::test]
    async fn test_shutdown_is_idempotent() {
        // テスト項目: 二度目の停止処理は何もしない
        // given (前提条件):
        let ctx = TestContext::new();
        let usecase = ShutdownUseCase::new(ctx.registry.clone(), ctx.pusher.clone());
        let (_alice, _alice_rx) = ctx.connect("alice").await;
        usecase.execute().await;

        // when (操作):
        let report = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(report, ShutdownReport::default());
        assert_eq!(ctx.registry.count().await, 0);
    }

    #[tokio::test]
    async fn test_connection_after_shutdown_is_not_registered() {
        // テスト項目: 停止処理の後に届いた接続は登録されず、送信チャンネルも解放される
        // given (前提条件):
        let ctx = TestContext::new();
        let shutdown = ShutdownUseCase::new(ctx.registry.clone(), ctx.pusher.clone());
        let connect =
            ConnectClientUseCase::new(ctx.registry.clone(), ctx.pusher.clone(), ctx.clock.clone());
        shutdown.execute().await;
        let (tx, mut rx) = mpsc::unbounded_channel();

        // when (操作):
        let result = connect.execute(tx).await;

        // then (期待する結果):
        assert_eq!(result, Err(ConnectError::Registry(RegistryError::Closed)));
        assert_eq!(ctx.registry.count().await, 0);
        // 挨拶の後、チャンネルは閉じられる（writer タスクが終了する）
        drain(&mut rx);
        assert!(rx.recv().await.is_none());
        // 後続の停止処理でも数え直されない
        assert_eq!(shutdown.execute().await, ShutdownReport::default());
    }
}
