//! UseCase: 接続中クライアント数の取得

use std::sync::Arc;

use crate::domain::ClientRegistry;

/// 接続中クライアント数取得のユースケース（監視用途のみ）
pub struct GetClientCountUseCase {
    registry: Arc<dyn ClientRegistry>,
}

impl GetClientCountUseCase {
    pub fn new(registry: Arc<dyn ClientRegistry>) -> Self {
        Self { registry }
    }

    pub async fn execute(&self) -> usize {
        self.registry.count().await
    }
}
