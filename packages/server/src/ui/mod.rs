//! UI 層: axum ルーター、WebSocket / HTTP ハンドラ、サーバーのライフサイクル

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::{Server, ServerConfig, ServerError, ServerHandle};
pub use signal::shutdown_signal;
