//! Hiroba broadcast chat server.
//!
//! Clients connect over WebSocket, claim a display name with their first
//! message, and every later message is fanned out to all other connected
//! clients.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
