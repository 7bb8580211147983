//! HTTP and WebSocket surface of the chat server.

mod handler;
mod server;
pub mod session;
mod signal;
pub mod state;

pub use server::Server;
