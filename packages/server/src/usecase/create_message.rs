//! UseCase: store a message through the REST API.
//!
//! Unlike the WebSocket path, input is validated strictly (no anonymous
//! fallback) and nothing is broadcast.

use std::sync::Arc;

use echotalk_shared::time::Clock;

use crate::domain::{
    ChatMessage, MessageBody, MessageRepository, RepositoryError, RoomId, SenderName, Timestamp,
};

use super::error::CreateMessageError;

pub struct CreateMessageUseCase {
    message_repository: Arc<dyn MessageRepository>,
    clock: Arc<dyn Clock>,
}

impl CreateMessageUseCase {
    pub fn new(message_repository: Arc<dyn MessageRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            message_repository,
            clock,
        }
    }

    pub async fn execute(
        &self,
        room_id: RoomId,
        sender_name: String,
        body: String,
    ) -> Result<ChatMessage, CreateMessageError> {
        let sender_name = SenderName::new(sender_name).map_err(CreateMessageError::Validation)?;
        let body = MessageBody::new(body).map_err(CreateMessageError::Validation)?;

        let mut message = ChatMessage::new(
            room_id,
            sender_name,
            body,
            Timestamp::new(self.clock.now_millis()),
        );
        let id = self
            .message_repository
            .create(&message)
            .await
            .map_err(|e| match e {
                RepositoryError::RoomNotFound(_) => CreateMessageError::RoomNotFound,
                other => CreateMessageError::Repository(other),
            })?;
        message.assign_id(id);
        Ok(message)
    }
}
