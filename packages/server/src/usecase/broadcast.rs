//! UseCase: ブロードキャスト（fan-out）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - BroadcastUseCase::execute() メソッド
//! - 除外指定した送信者以外の全クライアントへの配信
//! - 送信に失敗したクライアントの切断処理（他の宛先への配信を妨げない）
//!
//! ### どのような状況を想定しているか
//! - 正常系：送信者以外の全員に届く
//! - 異常系：一部の宛先の書き込み失敗（Named なら leave が連鎖する）
//! - エッジケース：宛先が 0 件

use std::{collections::VecDeque, sync::Arc};

use hiroba_shared::time::Clock;

use crate::domain::{ClientId, ClientRegistry, Envelope, MessagePusher, Timestamp};

use super::error::BroadcastError;

/// ブロードキャストの結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// 配信に成功したフレーム数（連鎖した leave を含む）
    pub delivered: usize,
    /// 書き込み失敗により切断されたクライアント
    pub dropped: Vec<ClientId>,
}

/// ブロードキャストのユースケース
pub struct BroadcastUseCase {
    registry: Arc<dyn ClientRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl BroadcastUseCase {
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

    /// Envelope を `exclude` 以外の全クライアントに配信する
    ///
    /// 書き込みに失敗した宛先は切断として扱います。Registry から削除し、
    /// Named であればその宛先自身の leave を残りのクライアントに配信します。
    /// leave の配信中に失敗した宛先も同様に処理されます。
    pub async fn execute(
        &self,
        envelope: Envelope,
        exclude: Option<&ClientId>,
    ) -> Result<BroadcastReport, BroadcastError> {
        let mut report = BroadcastReport::default();
        let mut pending = VecDeque::from([(envelope, exclude.cloned())]);

        while let Some((envelope, exclude)) = pending.pop_front() {
            let targets = self.targets(exclude.as_ref()).await;
            let failed = self.message_pusher.broadcast(&targets, &envelope).await?;
            report.delivered += targets.len().saturating_sub(failed.len());

            for client_id in failed {
                self.message_pusher.unregister_client(&client_id).await;
                let Some(client) = self.registry.remove(&client_id).await else {
                    continue;
                };
                tracing::info!(
                    "Client '{}' dropped after write failure. Total clients: {}",
                    client_id,
                    self.registry.count().await
                );
                if let Some(name) = client.display_name() {
                    let left = Envelope::left(&client_id, name, Timestamp::new(self.clock.now()));
                    pending.push_back((left, Some(client_id.clone())));
                }
                report.dropped.push(client_id);
            }
        }

        Ok(report)
    }

    async fn targets(&self, exclude: Option<&ClientId>) -> Vec<ClientId> {
        self.registry
            .snapshot()
            .await
            .into_iter()
            .map(|client| client.id)
            .filter(|id| Some(id) != exclude)
            .collect()
    }
}
