//! WebSocket frame DTOs.

use serde::{Deserialize, Serialize};

/// Frame sent by a client.
///
/// The field names of the first web frontend (`username`, `text`,
/// `space_id`) are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundChatMessage {
    #[serde(default, alias = "username")]
    pub sender_name: String,
    #[serde(alias = "text")]
    pub body: String,
    #[serde(alias = "space_id")]
    pub room_id: i64,
}

/// A stored (or at least accepted) chat message as seen by clients.
///
/// `id` is `null` when persistence failed and the message was delivered
/// best-effort only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessageDto {
    pub id: Option<i64>,
    pub room_id: i64,
    pub sender_name: String,
    pub body: String,
    /// RFC 3339
    pub created_at: String,
}
