//! Interactive terminal client for the Hiroba broadcast chat server.

mod domain;
mod error;
mod formatter;
mod runner;
mod session;
mod ui;

pub use error::ClientError;
pub use formatter::MessageFormatter;
pub use runner::{CONNECT_TIMEOUT, run_client};
