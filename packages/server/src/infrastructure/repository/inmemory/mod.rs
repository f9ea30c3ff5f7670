//! In-memory repository implementations.

pub mod client;

pub use client::InMemoryClientRegistry;
