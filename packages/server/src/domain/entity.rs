//! Domain entities.

use super::value_object::{MessageBody, MessageId, RoomId, RoomName, SenderName, Timestamp};

/// A chat room ("space"); messages are scoped to exactly one room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: RoomId,
    pub name: RoomName,
    pub created_at: Timestamp,
}

impl Room {
    pub fn new(id: RoomId, name: RoomName, created_at: Timestamp) -> Self {
        Self {
            id,
            name,
            created_at,
        }
    }
}

/// A chat message.
///
/// `id` stays `None` until the store accepts the message; it is assigned
/// exactly once through [`ChatMessage::assign_id`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: Option<MessageId>,
    pub room_id: RoomId,
    pub sender_name: SenderName,
    pub body: MessageBody,
    pub created_at: Timestamp,
}

impl ChatMessage {
    pub fn new(
        room_id: RoomId,
        sender_name: SenderName,
        body: MessageBody,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id: None,
            room_id,
            sender_name,
            body,
            created_at,
        }
    }

    /// Record the store-assigned id. A second assignment is ignored.
    pub fn assign_id(&mut self, id: MessageId) {
        if self.id.is_none() {
            self.id = Some(id);
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}
