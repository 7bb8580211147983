//! Domain error types.

use thiserror::Error;

use super::value_object::{ConnectionId, MessageId, RoomId};

/// Value object validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("Room ID must be positive (got {0})")]
    InvalidRoomId(i64),

    #[error("Message ID must be positive (got {0})")]
    InvalidMessageId(i64),

    #[error("Sender name cannot be empty")]
    EmptySenderName,

    #[error("Message body cannot be empty")]
    EmptyMessageBody,

    #[error("Room name cannot be empty")]
    EmptyRoomName,

    #[error("Room name is too long (max {max} characters, got {actual})")]
    RoomNameTooLong { max: usize, actual: usize },
}

/// Store gateway errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Room {0} not found")]
    RoomNotFound(RoomId),

    #[error("Message {message_id} not found in room {room_id}")]
    MessageNotFound {
        room_id: RoomId,
        message_id: MessageId,
    },

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised while pushing a frame to a connected client
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// The client's outbound channel is closed (writer gone)
    #[error("Connection {0} is closed")]
    Closed(ConnectionId),

    /// The client did not accept the frame within the write timeout
    #[error("Connection {0} timed out")]
    Timeout(ConnectionId),

    #[error("Failed to serialize message: {0}")]
    Serialization(String),

    /// The hub's inbound queue is no longer consumed
    #[error("Inbound queue is closed")]
    QueueClosed,
}
