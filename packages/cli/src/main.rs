//! Hiroba: broadcast chat over WebSocket.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba -- start
//! cargo run --bin hiroba -- start --port 9001
//! cargo run --bin hiroba -- connect --url ws://127.0.0.1:9001/ws
//! ```

mod cli;

use std::{sync::Arc, time::Duration};

use clap::Parser;
use hiroba_server::ui::{Server, ServerConfig, ServerHandle, shutdown_signal};
use hiroba_shared::{logger::setup_logger, time::SystemClock};

use cli::{Cli, Command, ConnectArgs, StartArgs};

const CLIENT_COUNT_REPORT_INTERVAL: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Start(args) => start(args).await,
        Command::Connect(args) => connect(args).await,
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn start(args: StartArgs) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let config = ServerConfig {
        host: args.host,
        port: args.port,
    };
    let handle = Arc::new(Server::in_memory(Arc::new(SystemClock)).bind(&config).await?);
    tracing::info!("Press Ctrl+C to shutdown gracefully");

    let reporter = tokio::spawn(report_client_count(handle.clone()));

    shutdown_signal().await;
    reporter.abort();
    handle.shutdown().await?;
    Ok(())
}

async fn connect(args: ConnectArgs) -> Result<(), Box<dyn std::error::Error>> {
    // Keep log lines from interleaving with the chat prompt
    setup_logger(env!("CARGO_BIN_NAME"), "warn");

    hiroba_client::run_client(&args.url).await?;
    Ok(())
}

/// Log the number of connected clients periodically while anyone is connected
async fn report_client_count(handle: Arc<ServerHandle>) {
    let mut interval = tokio::time::interval(CLIENT_COUNT_REPORT_INTERVAL);
    // The first tick completes immediately
    interval.tick().await;

    loop {
        interval.tick().await;
        let count = handle.client_count().await;
        if count > 0 {
            tracing::info!("Connected clients: {}", count);
        }
    }
}
