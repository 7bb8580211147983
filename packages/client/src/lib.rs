//! Echo Talk CLI chat client.
//!
//! Prints a room's history, then streams live messages of that room and sends
//! each line typed on stdin.

mod domain;
pub mod error;
mod formatter;
mod history;
mod runner;
mod session;
mod ui;

pub use runner::run_client;

/// Where to connect and who to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// WebSocket endpoint, e.g. `ws://127.0.0.1:8080/api/ws`
    pub url: String,
    /// Display name; empty means the server's anonymous name
    pub name: String,
    pub room_id: i64,
}
