//! In-memory [`MessageRepository`].

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChatMessage, MessageId, MessageRepository, RepositoryError, RoomId};

use super::InMemoryDatabase;

pub struct InMemoryMessageRepository {
    db: Arc<Mutex<InMemoryDatabase>>,
}

impl InMemoryMessageRepository {
    pub fn new(db: Arc<Mutex<InMemoryDatabase>>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn create(&self, message: &ChatMessage) -> Result<MessageId, RepositoryError> {
        let mut db = self.db.lock().await;
        if !db.rooms.contains_key(&message.room_id) {
            return Err(RepositoryError::RoomNotFound(message.room_id));
        }

        let id = MessageId::new(db.next_message_id)
            .map_err(|e| RepositoryError::Unavailable(e.to_string()))?;
        db.next_message_id += 1;

        let mut stored = message.clone();
        stored.id = Some(id);
        db.messages.insert(id, stored);
        Ok(id)
    }

    async fn find_by_room(&self, room_id: RoomId) -> Result<Vec<ChatMessage>, RepositoryError> {
        let db = self.db.lock().await;
        let mut messages: Vec<ChatMessage> = db
            .messages
            .values()
            .filter(|message| message.room_id == room_id)
            .cloned()
            .collect();
        messages.sort_by_key(|message| (message.created_at, message.id));
        Ok(messages)
    }

    async fn delete(&self, room_id: RoomId, message_id: MessageId) -> Result<(), RepositoryError> {
        let mut db = self.db.lock().await;
        match db.messages.get(&message_id) {
            Some(message) if message.room_id == room_id => {
                db.messages.remove(&message_id);
                Ok(())
            }
            _ => Err(RepositoryError::MessageNotFound {
                room_id,
                message_id,
            }),
        }
    }
}
