//! Conversion from domain entities to DTOs.

use echotalk_shared::time::millis_to_rfc3339;

use crate::domain::{ChatMessage, Room};

use super::{http::RoomDto, websocket::ChatMessageDto};

impl From<&ChatMessage> for ChatMessageDto {
    fn from(model: &ChatMessage) -> Self {
        Self {
            id: model.id.map(|id| id.value()),
            room_id: model.room_id.value(),
            sender_name: model.sender_name.as_str().to_string(),
            body: model.body.as_str().to_string(),
            created_at: millis_to_rfc3339(model.created_at.value()),
        }
    }
}

impl From<ChatMessage> for ChatMessageDto {
    fn from(model: ChatMessage) -> Self {
        Self {
            id: model.id.map(|id| id.value()),
            room_id: model.room_id.value(),
            sender_name: model.sender_name.into_string(),
            body: model.body.into_string(),
            created_at: millis_to_rfc3339(model.created_at.value()),
        }
    }
}

impl From<Room> for RoomDto {
    fn from(model: Room) -> Self {
        Self {
            id: model.id.value(),
            name: model.name.as_str().to_string(),
            created_at: millis_to_rfc3339(model.created_at.value()),
        }
    }
}
