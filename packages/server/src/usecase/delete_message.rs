//! UseCase: delete a message from a room.

use std::sync::Arc;

use crate::domain::{MessageId, MessageRepository, RepositoryError, RoomId};

use super::error::DeleteMessageError;

pub struct DeleteMessageUseCase {
    message_repository: Arc<dyn MessageRepository>,
}

impl DeleteMessageUseCase {
    pub fn new(message_repository: Arc<dyn MessageRepository>) -> Self {
        Self { message_repository }
    }

    pub async fn execute(
        &self,
        room_id: RoomId,
        message_id: MessageId,
    ) -> Result<(), DeleteMessageError> {
        self.message_repository
            .delete(room_id, message_id)
            .await
            .map_err(|e| match e {
                RepositoryError::MessageNotFound { .. } | RepositoryError::RoomNotFound(_) => {
                    DeleteMessageError::MessageNotFound
                }
                other => DeleteMessageError::Repository(other),
            })?;

        tracing::info!("Message {} deleted from room {}", message_id, room_id);
        Ok(())
    }
}
