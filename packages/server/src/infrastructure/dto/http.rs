//! HTTP API DTOs.

use serde::{Deserialize, Serialize};

/// Room summary returned by the rooms API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDto {
    pub id: i64,
    pub name: String,
    /// RFC 3339
    pub created_at: String,
}

/// Body of `POST /api/rooms`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoomRequest {
    pub name: String,
}

/// Body of `POST /api/rooms/{room_id}/messages`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMessageRequest {
    #[serde(default, alias = "username")]
    pub sender_name: String,
    #[serde(alias = "text")]
    pub body: String,
}
