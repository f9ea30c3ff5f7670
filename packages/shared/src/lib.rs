//! Utilities shared by the Hiroba server, client and command-line binary.

pub mod logger;
pub mod time;
