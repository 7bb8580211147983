//! Error types for the chat client.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid server URL '{0}'")]
    InvalidUrl(String),

    #[error("Room {0} does not exist")]
    RoomNotFound(i64),

    #[error("Failed to load history: {0}")]
    History(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),
}
