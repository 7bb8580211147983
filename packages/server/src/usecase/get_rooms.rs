//! UseCase: list rooms.

use std::sync::Arc;

use crate::domain::{Room, RoomRepository};

use super::error::GetRoomsError;

pub struct GetRoomsUseCase {
    room_repository: Arc<dyn RoomRepository>,
}

impl GetRoomsUseCase {
    pub fn new(room_repository: Arc<dyn RoomRepository>) -> Self {
        Self { room_repository }
    }

    /// All rooms, oldest first
    pub async fn execute(&self) -> Result<Vec<Room>, GetRoomsError> {
        self.room_repository
            .list()
            .await
            .map_err(GetRoomsError::Repository)
    }
}
