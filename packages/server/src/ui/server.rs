//! Server execution logic.

use std::{io, net::SocketAddr, sync::Arc};

use axum::{Router, routing::get};
use hiroba_shared::time::Clock;
use thiserror::Error;
use tokio::{
    sync::{Mutex, watch},
    task::{JoinError, JoinHandle},
};
use tower_http::trace::TraceLayer;

use crate::{
    domain::{ClientRegistry, MessagePusher},
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryClientRegistry},
    usecase::{
        BroadcastUseCase, ConnectClientUseCase, DisconnectClientUseCase, GetClientCountUseCase,
        ReceiveMessageUseCase, ShutdownUseCase,
    },
};

use super::{
    handler::{
        http::{get_client_count, health_check},
        websocket::websocket_handler,
    },
    state::AppState,
};

/// Server errors
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listener could not be bound (fatal at startup)
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to read local address: {0}")]
    LocalAddr(#[source] io::Error),

    #[error("server error: {0}")]
    Serve(#[source] io::Error),

    #[error("server task failed: {0}")]
    Join(#[from] JoinError),
}

/// Listener configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host address to bind to (e.g., "127.0.0.1")
    pub host: String,
    /// Port to bind to; `0` picks an ephemeral port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Broadcast chat server
///
/// # Example
///
/// ```ignore
/// let server = Server::in_memory(Arc::new(SystemClock));
/// let handle = server.bind(&ServerConfig::default()).await?;
/// // ...
/// handle.shutdown().await?;
/// ```
pub struct Server {
    connect_client_usecase: Arc<ConnectClientUseCase>,
    receive_message_usecase: Arc<ReceiveMessageUseCase>,
    disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    get_client_count_usecase: Arc<GetClientCountUseCase>,
    shutdown_usecase: Arc<ShutdownUseCase>,
}

impl Server {
    /// Create a new Server instance
    pub fn new(
        connect_client_usecase: Arc<ConnectClientUseCase>,
        receive_message_usecase: Arc<ReceiveMessageUseCase>,
        disconnect_client_usecase: Arc<DisconnectClientUseCase>,
        get_client_count_usecase: Arc<GetClientCountUseCase>,
        shutdown_usecase: Arc<ShutdownUseCase>,
    ) -> Self {
        Self {
            connect_client_usecase,
            receive_message_usecase,
            disconnect_client_usecase,
            get_client_count_usecase,
            shutdown_usecase,
        }
    }

    /// Wire every use case over the in-memory registry and the WebSocket pusher.
    ///
    /// Dependencies are created in order:
    /// 1. Registry
    /// 2. MessagePusher
    /// 3. UseCases
    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        let registry: Arc<dyn ClientRegistry> = Arc::new(InMemoryClientRegistry::new());
        let message_pusher: Arc<dyn MessagePusher> = Arc::new(WebSocketMessagePusher::new());

        let broadcast_usecase = Arc::new(BroadcastUseCase::new(
            registry.clone(),
            message_pusher.clone(),
            clock.clone(),
        ));

        Self::new(
            Arc::new(ConnectClientUseCase::new(
                registry.clone(),
                message_pusher.clone(),
                clock.clone(),
            )),
            Arc::new(ReceiveMessageUseCase::new(
                registry.clone(),
                message_pusher.clone(),
                broadcast_usecase.clone(),
                clock.clone(),
            )),
            Arc::new(DisconnectClientUseCase::new(
                registry.clone(),
                message_pusher.clone(),
                broadcast_usecase,
                clock,
            )),
            Arc::new(GetClientCountUseCase::new(registry.clone())),
            Arc::new(ShutdownUseCase::new(registry, message_pusher)),
        )
    }

    /// Bind the listener and start serving in the background.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Bind` if the address cannot be bound.
    pub async fn bind(self, config: &ServerConfig) -> Result<ServerHandle, ServerError> {
        let app_state = Arc::new(AppState {
            connect_client_usecase: self.connect_client_usecase,
            receive_message_usecase: self.receive_message_usecase,
            disconnect_client_usecase: self.disconnect_client_usecase,
            get_client_count_usecase: self.get_client_count_usecase.clone(),
        });

        // Define handlers
        let app = Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/clients", get(get_client_count))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        // Bind the server to the host and port
        let bind_addr = config.bind_addr();
        let listener = tokio::net::TcpListener::bind(&bind_addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: bind_addr.clone(),
                source,
            })?;
        let local_addr = listener.local_addr().map_err(ServerError::LocalAddr)?;

        let (stop_tx, mut stop_rx) = watch::channel(false);
        let serve_task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    // An error means the handle was dropped; stop either way.
                    let _ = stop_rx.wait_for(|stop| *stop).await;
                })
                .await
        });

        tracing::info!("Broadcast server listening on {}", local_addr);
        tracing::info!("Connect to: ws://{}/ws", local_addr);

        Ok(ServerHandle {
            local_addr,
            get_client_count_usecase: self.get_client_count_usecase,
            shutdown_usecase: self.shutdown_usecase,
            stop_tx,
            serve_task: Mutex::new(Some(serve_task)),
        })
    }
}

/// Handle to a running server.
pub struct ServerHandle {
    local_addr: SocketAddr,
    get_client_count_usecase: Arc<GetClientCountUseCase>,
    shutdown_usecase: Arc<ShutdownUseCase>,
    stop_tx: watch::Sender<bool>,
    serve_task: Mutex<Option<JoinHandle<io::Result<()>>>>,
}

impl ServerHandle {
    /// Address the listener is bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// WebSocket URL clients should connect to
    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.local_addr)
    }

    /// Number of currently connected clients
    pub async fn client_count(&self) -> usize {
        self.get_client_count_usecase.execute().await
    }

    /// Close every client connection, close the registry, stop accepting
    /// connections, and wait until the listener task has stopped.
    ///
    /// A closed registry refuses inserts, so an upgrade that completes while
    /// the listener drains is dropped instead of being counted.
    ///
    /// Calling this more than once is safe: later calls wait for the first
    /// to finish and then return `Ok(())`.
    pub async fn shutdown(&self) -> Result<(), ServerError> {
        let mut serve_task = self.serve_task.lock().await;
        let Some(task) = serve_task.take() else {
            return Ok(());
        };

        tracing::info!("Shutting down server...");

        // 1. 全接続をクローズし、2. Registry を閉じる
        let report = self.shutdown_usecase.execute().await;
        tracing::info!(
            "Closed {} connection(s), removed {} client(s)",
            report.closed_connections,
            report.removed_clients
        );

        // 3. 新規接続の受付を停止し、4. リスナーの停止を待つ
        self.stop_tx.send_replace(true);
        let served = task.await;

        served?.map_err(ServerError::Serve)?;
        tracing::info!("Server shutdown complete");
        Ok(())
    }
}
