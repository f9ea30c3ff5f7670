//! ドメイン層のエラー型

use thiserror::Error;

/// 値オブジェクトの生成エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    /// クライアント ID が空
    #[error("client id must not be empty")]
    EmptyClientId,

    /// 表示名が空（前後の空白を除去した結果）
    #[error("display name must not be empty")]
    EmptyDisplayName,
}

/// Registry 操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// 同じ ID のクライアントが既に登録されている（ID 生成方式上、発生してはならない）
    #[error("client '{0}' is already registered")]
    DuplicateClientId(String),

    /// 対象のクライアントが登録されていない
    #[error("client '{0}' is not registered")]
    ClientNotFound(String),

    /// 停止処理が始まり、Registry が閉じられている
    #[error("registry is closed")]
    Closed,

    /// 表示名は一度しか設定できない
    #[error("client '{0}' already has a display name")]
    NameAlreadyAssigned(String),
}

/// メッセージ送信（通知）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// 送信先のクライアントが見つからない
    #[error("client '{0}' not found")]
    ClientNotFound(String),

    /// 送信に失敗した（接続が既に閉じている）
    #[error("failed to push message: {0}")]
    PushFailed(String),

    /// Envelope のシリアライズに失敗した
    #[error("failed to encode envelope: {0}")]
    EncodeFailed(String),
}
