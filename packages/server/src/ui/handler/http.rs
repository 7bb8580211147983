//! REST API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::{MessageId, RoomId},
    infrastructure::dto::{
        http::{CreateMessageRequest, CreateRoomRequest, RoomDto},
        websocket::ChatMessageDto,
    },
    ui::state::AppState,
    usecase::{
        CreateMessageError, CreateRoomError, DeleteMessageError, GetMessagesError, GetRoomsError,
    },
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "healthy"}))
}

pub async fn create_room(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<RoomDto>), StatusCode> {
    match state.create_room_usecase.execute(request.name).await {
        Ok(room) => Ok((StatusCode::CREATED, Json(RoomDto::from(room)))),
        Err(CreateRoomError::InvalidName(e)) => {
            tracing::debug!("Rejected room name: {}", e);
            Err(StatusCode::BAD_REQUEST)
        }
        Err(CreateRoomError::Repository(e)) => {
            tracing::error!("Failed to create room: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Rooms, oldest first
pub async fn get_rooms(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RoomDto>>, StatusCode> {
    match state.get_rooms_usecase.execute().await {
        Ok(rooms) => Ok(Json(rooms.into_iter().map(RoomDto::from).collect())),
        Err(GetRoomsError::Repository(e)) => {
            tracing::error!("Failed to list rooms: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

pub async fn get_messages(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<i64>,
) -> Result<Json<Vec<ChatMessageDto>>, StatusCode> {
    // ids are positive, so anything else cannot name a room
    let room_id = RoomId::new(room_id).map_err(|_| StatusCode::NOT_FOUND)?;

    match state.get_messages_usecase.execute(room_id).await {
        Ok(messages) => Ok(Json(
            messages.into_iter().map(ChatMessageDto::from).collect(),
        )),
        Err(GetMessagesError::RoomNotFound) => Err(StatusCode::NOT_FOUND),
        Err(GetMessagesError::Repository(e)) => {
            tracing::error!("Failed to load messages of room {}: {}", room_id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Store a message without broadcasting it
pub async fn create_message(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<i64>,
    Json(request): Json<CreateMessageRequest>,
) -> Result<(StatusCode, Json<ChatMessageDto>), StatusCode> {
    let room_id = RoomId::new(room_id).map_err(|_| StatusCode::NOT_FOUND)?;

    match state
        .create_message_usecase
        .execute(room_id, request.sender_name, request.body)
        .await
    {
        Ok(message) => Ok((StatusCode::CREATED, Json(ChatMessageDto::from(message)))),
        Err(CreateMessageError::Validation(e)) => {
            tracing::debug!("Rejected message: {}", e);
            Err(StatusCode::BAD_REQUEST)
        }
        Err(CreateMessageError::RoomNotFound) => Err(StatusCode::NOT_FOUND),
        Err(CreateMessageError::Repository(e)) => {
            tracing::error!("Failed to store message in room {}: {}", room_id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

pub async fn delete_message(
    State(state): State<Arc<AppState>>,
    Path((room_id, message_id)): Path<(i64, i64)>,
) -> StatusCode {
    let (Ok(room_id), Ok(message_id)) = (RoomId::new(room_id), MessageId::new(message_id)) else {
        return StatusCode::NOT_FOUND;
    };

    match state
        .delete_message_usecase
        .execute(room_id, message_id)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT,
        Err(DeleteMessageError::MessageNotFound) => StatusCode::NOT_FOUND,
        Err(DeleteMessageError::Repository(e)) => {
            tracing::error!("Failed to delete message {}: {}", message_id, e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
