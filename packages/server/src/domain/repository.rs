//! Store gateway traits.
//!
//! The domain defines what it needs from storage; the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;

use super::{
    ChatMessage, MessageId, RepositoryError, Room, RoomId, RoomName, Timestamp,
};

/// Durable storage of rooms
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Create a room and return it with its assigned id
    async fn create(&self, name: RoomName, created_at: Timestamp) -> Result<Room, RepositoryError>;

    /// All rooms, oldest first
    async fn list(&self) -> Result<Vec<Room>, RepositoryError>;

    async fn find(&self, id: RoomId) -> Result<Option<Room>, RepositoryError>;
}

/// Durable storage of messages, keyed by room
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Persist a message and return the id assigned to it.
    ///
    /// Fails with [`RepositoryError::RoomNotFound`] when the room does not exist.
    async fn create(&self, message: &ChatMessage) -> Result<MessageId, RepositoryError>;

    /// Messages of a room, oldest first
    async fn find_by_room(&self, room_id: RoomId) -> Result<Vec<ChatMessage>, RepositoryError>;

    async fn delete(&self, room_id: RoomId, message_id: MessageId) -> Result<(), RepositoryError>;
}
