//! Data Transfer Objects (DTOs) for the broadcast chat.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket envelope DTO (the on-wire contract)
//! - `http`: HTTP API response DTOs

pub mod conversion;
pub mod http;
pub mod websocket;
