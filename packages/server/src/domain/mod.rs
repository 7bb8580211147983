//! Domain layer: entities, value objects and the interfaces the core consumes.

pub mod entity;
pub mod error;
pub mod pusher;
pub mod repository;
pub mod value_object;

pub use entity::{ChatMessage, Room};
pub use error::{MessagePushError, RepositoryError, ValueObjectError};
pub use pusher::{DeliveryReport, MessagePusher, PusherChannel};
pub use repository::{MessageRepository, RoomRepository};
pub use value_object::{
    ANONYMOUS_SENDER_NAME, ConnectionId, MessageBody, MessageId, ROOM_NAME_MAX_CHARS, RoomId,
    RoomName, SenderName, Timestamp,
};

#[cfg(test)]
pub use pusher::MockMessagePusher;
#[cfg(test)]
pub use repository::{MockMessageRepository, MockRoomRepository};
