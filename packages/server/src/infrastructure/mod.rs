//! Infrastructure layer: DTOs, storage and the WebSocket broadcast hub.

pub mod dto;
pub mod message_pusher;
pub mod repository;
