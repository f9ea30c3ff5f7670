//! InMemory Client Registry 実装
//!
//! ドメイン層が定義する ClientRegistry trait の具体的な実装。
//! HashMap をインメモリ DB として使用し、`tokio::sync::Mutex` で全ての操作を直列化します。
//! `close` の後は追加を受け付けません（停止処理中に接続したクライアントが残らない）。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Client, ClientId, ClientRegistry, ClientState, DisplayName, RegistryError};

#[derive(Default)]
struct RegistryState {
    /// Key: client_id, Value: Client
    clients: HashMap<ClientId, Client>,
    closed: bool,
}

/// インメモリ Client Registry 実装
#[derive(Default)]
pub struct InMemoryClientRegistry {
    state: Mutex<RegistryState>,
}

impl InMemoryClientRegistry {
    /// 新しい InMemoryClientRegistry を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClientRegistry for InMemoryClientRegistry {
    async fn insert(&self, client: Client) -> Result<(), RegistryError> {
        let mut state = self.state.lock().await;
        if state.closed {
            return Err(RegistryError::Closed);
        }
        if state.clients.contains_key(&client.id) {
            return Err(RegistryError::DuplicateClientId(client.id.into_string()));
        }
        state.clients.insert(client.id.clone(), client);
        Ok(())
    }

    async fn remove(&self, client_id: &ClientId) -> Option<Client> {
        let mut state = self.state.lock().await;
        state.clients.remove(client_id)
    }

    async fn get(&self, client_id: &ClientId) -> Option<Client> {
        let state = self.state.lock().await;
        state.clients.get(client_id).cloned()
    }

    async fn assign_name(
        &self,
        client_id: &ClientId,
        name: DisplayName,
    ) -> Result<Client, RegistryError> {
        let mut state = self.state.lock().await;
        let client = state
            .clients
            .get_mut(client_id)
            .ok_or_else(|| RegistryError::ClientNotFound(client_id.as_str().to_string()))?;

        if client.is_named() {
            return Err(RegistryError::NameAlreadyAssigned(
                client_id.as_str().to_string(),
            ));
        }
        client.state = ClientState::Named(name);
        Ok(client.clone())
    }

    async fn snapshot(&self) -> Vec<Client> {
        let state = self.state.lock().await;
        state.clients.values().cloned().collect()
    }

    async fn count(&self) -> usize {
        let state = self.state.lock().await;
        state.clients.len()
    }

    async fn close(&self) -> Vec<Client> {
        let mut state = self.state.lock().await;
        state.closed = true;
        state.clients.drain().map(|(_, client)| client).collect()
    }
}
