//! UseCase 層
//!
//! 接続ごとのプロトコル状態機械（Unnamed → Named）とブロードキャストを実装します。
//! UseCase はドメイン層の trait（ClientRegistry, MessagePusher）にのみ依存します。

pub mod broadcast;
pub mod connect_client;
pub mod disconnect_client;
pub mod error;
pub mod get_client_count;
pub mod receive_message;
pub mod shutdown;

#[cfg(test)]
mod test_support;

pub use broadcast::{BroadcastReport, BroadcastUseCase};
pub use connect_client::ConnectClientUseCase;
pub use disconnect_client::DisconnectClientUseCase;
pub use error::{BroadcastError, ConnectError, ReceiveMessageError};
pub use get_client_count::GetClientCountUseCase;
pub use receive_message::{ReceiveMessageUseCase, ReceiveOutcome};
pub use shutdown::{ShutdownReport, ShutdownUseCase};
