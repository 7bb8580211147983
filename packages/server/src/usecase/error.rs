//! UseCase error types.

use thiserror::Error;

use crate::domain::{RepositoryError, ValueObjectError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateRoomError {
    #[error("Invalid room name: {0}")]
    InvalidName(ValueObjectError),

    #[error("Failed to store room: {0}")]
    Repository(RepositoryError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomsError {
    #[error("Failed to load rooms: {0}")]
    Repository(RepositoryError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetMessagesError {
    #[error("Room not found")]
    RoomNotFound,

    #[error("Failed to load messages: {0}")]
    Repository(RepositoryError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateMessageError {
    #[error("Invalid message: {0}")]
    Validation(ValueObjectError),

    #[error("Room not found")]
    RoomNotFound,

    #[error("Failed to store message: {0}")]
    Repository(RepositoryError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeleteMessageError {
    #[error("Message not found")]
    MessageNotFound,

    #[error("Failed to delete message: {0}")]
    Repository(RepositoryError),
}
