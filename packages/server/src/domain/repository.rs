//! Repository trait 定義
//!
//! ドメイン層が必要とするクライアント Registry のインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{Client, ClientId, DisplayName, RegistryError};

/// 接続中クライアントの Registry
///
/// 全ての操作は実装側で同期されます。`snapshot` はコピーを返すため、
/// ブロードキャスト中に他のタスクが insert / remove しても影響を受けません。
#[async_trait]
pub trait ClientRegistry: Send + Sync {
    /// クライアントを追加（同じ ID が存在する場合、close 済みの場合はエラー）
    async fn insert(&self, client: Client) -> Result<(), RegistryError>;

    /// クライアントを削除（存在しない ID の削除は何もしない）
    async fn remove(&self, client_id: &ClientId) -> Option<Client>;

    /// クライアントを取得
    async fn get(&self, client_id: &ClientId) -> Option<Client>;

    /// 表示名を設定し、Unnamed から Named に遷移させる
    async fn assign_name(
        &self,
        client_id: &ClientId,
        name: DisplayName,
    ) -> Result<Client, RegistryError>;

    /// 接続中の全クライアントのスナップショットを取得
    async fn snapshot(&self) -> Vec<Client>;

    /// 接続中のクライアント数を取得
    async fn count(&self) -> usize;

    /// 全クライアントを削除し、以降の insert を拒否する
    ///
    /// 削除したクライアントを返します。2 回目以降の呼び出しは空を返します。
    async fn close(&self) -> Vec<Client>;
}
