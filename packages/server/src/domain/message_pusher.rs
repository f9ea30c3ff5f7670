//! MessagePusher trait 定義
//!
//! クライアントへのメッセージ送信（通知）のインターフェース。
//! ソケットへの書き込みは接続ごとの writer タスクが担当し、
//! MessagePusher はそのタスクのチャンネルにフレームを積むだけです。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ClientId, Envelope, MessagePushError};

/// Frame queued for a connection's writer task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundFrame {
    /// Serialized envelope
    Text(String),
    /// Close the connection
    Close,
}

/// 接続ごとの送信チャンネル
pub type PusherChannel = mpsc::UnboundedSender<OutboundFrame>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントを登録し、挨拶メッセージを最初のフレームとして送信する
    ///
    /// 登録と挨拶の送信は不可分に行われるため、他のクライアント由来の
    /// メッセージが挨拶より先に届くことはありません。
    async fn register_client(
        &self,
        client_id: ClientId,
        sender: PusherChannel,
        greeting: &Envelope,
    ) -> Result<(), MessagePushError>;

    /// クライアントの登録を解除（存在しない場合は何もしない）
    async fn unregister_client(&self, client_id: &ClientId);

    /// 特定のクライアントに送信
    async fn push_to(
        &self,
        client_id: &ClientId,
        envelope: &Envelope,
    ) -> Result<(), MessagePushError>;

    /// 複数のクライアントに送信
    ///
    /// Envelope は一度だけシリアライズされます。一部の送信失敗で中断せず、
    /// 送信に失敗したクライアントの ID を返します。
    async fn broadcast(
        &self,
        targets: &[ClientId],
        envelope: &Envelope,
    ) -> Result<Vec<ClientId>, MessagePushError>;

    /// 全てのクライアントに Close フレームを送り、登録を全て解除する
    ///
    /// 解除したクライアント数を返します。
    async fn close_all(&self) -> usize;
}
