//! UseCase: create a room.

use std::sync::Arc;

use echotalk_shared::time::Clock;

use crate::domain::{Room, RoomName, RoomRepository, Timestamp};

use super::error::CreateRoomError;

pub struct CreateRoomUseCase {
    room_repository: Arc<dyn RoomRepository>,
    clock: Arc<dyn Clock>,
}

impl CreateRoomUseCase {
    pub fn new(room_repository: Arc<dyn RoomRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            room_repository,
            clock,
        }
    }

    pub async fn execute(&self, name: String) -> Result<Room, CreateRoomError> {
        let name = RoomName::new(name).map_err(CreateRoomError::InvalidName)?;
        let room = self
            .room_repository
            .create(name, Timestamp::new(self.clock.now_millis()))
            .await
            .map_err(CreateRoomError::Repository)?;

        tracing::info!("Room {} '{}' created", room.id, room.name.as_str());
        Ok(room)
    }
}
