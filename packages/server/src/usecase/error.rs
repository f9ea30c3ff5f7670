//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::{MessagePushError, RegistryError};

/// 接続処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("failed to register client: {0}")]
    Registry(#[from] RegistryError),

    #[error("failed to greet client: {0}")]
    Push(#[from] MessagePushError),
}

/// ブロードキャストのエラー（個々の宛先の送信失敗はエラーにならない）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BroadcastError {
    #[error("broadcast failed: {0}")]
    Push(#[from] MessagePushError),
}

/// 受信メッセージ処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReceiveMessageError {
    #[error("client '{0}' is not registered")]
    ClientNotFound(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Broadcast(#[from] BroadcastError),

    #[error("failed to reply to sender: {0}")]
    Push(#[from] MessagePushError),
}
