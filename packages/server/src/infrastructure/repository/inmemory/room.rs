//! In-memory [`RoomRepository`].

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{RepositoryError, Room, RoomId, RoomName, RoomRepository, Timestamp};

use super::InMemoryDatabase;

pub struct InMemoryRoomRepository {
    db: Arc<Mutex<InMemoryDatabase>>,
}

impl InMemoryRoomRepository {
    pub fn new(db: Arc<Mutex<InMemoryDatabase>>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn create(&self, name: RoomName, created_at: Timestamp) -> Result<Room, RepositoryError> {
        let mut db = self.db.lock().await;
        let id = RoomId::new(db.next_room_id)
            .map_err(|e| RepositoryError::Unavailable(e.to_string()))?;
        db.next_room_id += 1;

        let room = Room::new(id, name, created_at);
        db.rooms.insert(id, room.clone());
        tracing::debug!("Room {} created in memory", id);
        Ok(room)
    }

    async fn list(&self) -> Result<Vec<Room>, RepositoryError> {
        let db = self.db.lock().await;
        let mut rooms: Vec<Room> = db.rooms.values().cloned().collect();
        rooms.sort_by_key(|room| (room.created_at, room.id));
        Ok(rooms)
    }

    async fn find(&self, id: RoomId) -> Result<Option<Room>, RepositoryError> {
        let db = self.db.lock().await;
        Ok(db.rooms.get(&id).cloned())
    }
}
