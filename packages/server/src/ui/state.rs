//! Server state shared by the handlers.

use std::sync::Arc;

use crate::usecase::{
    ConnectClientUseCase, DisconnectClientUseCase, GetClientCountUseCase, ReceiveMessageUseCase,
};

/// Shared application state
pub struct AppState {
    /// ConnectClientUseCase（クライアント接続のユースケース）
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    /// ReceiveMessageUseCase（受信メッセージ処理のユースケース）
    pub receive_message_usecase: Arc<ReceiveMessageUseCase>,
    /// DisconnectClientUseCase（クライアント切断のユースケース）
    pub disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    /// GetClientCountUseCase（接続数取得のユースケース）
    pub get_client_count_usecase: Arc<GetClientCountUseCase>,
}
