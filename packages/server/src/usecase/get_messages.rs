//! UseCase: message history of one room.

use std::sync::Arc;

use crate::domain::{ChatMessage, MessageRepository, RoomId, RoomRepository};

use super::error::GetMessagesError;

pub struct GetMessagesUseCase {
    room_repository: Arc<dyn RoomRepository>,
    message_repository: Arc<dyn MessageRepository>,
}

impl GetMessagesUseCase {
    pub fn new(
        room_repository: Arc<dyn RoomRepository>,
        message_repository: Arc<dyn MessageRepository>,
    ) -> Self {
        Self {
            room_repository,
            message_repository,
        }
    }

    /// Messages of `room_id`, oldest first
    pub async fn execute(&self, room_id: RoomId) -> Result<Vec<ChatMessage>, GetMessagesError> {
        self.room_repository
            .find(room_id)
            .await
            .map_err(GetMessagesError::Repository)?
            .ok_or(GetMessagesError::RoomNotFound)?;

        self.message_repository
            .find_by_room(room_id)
            .await
            .map_err(GetMessagesError::Repository)
    }
}
