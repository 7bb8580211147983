//! In-memory store.
//!
//! Both repositories share one [`InMemoryDatabase`] behind a single lock, so a
//! message insert can check that its room exists atomically.

mod message;
mod room;

use std::{collections::BTreeMap, sync::Arc};

use tokio::sync::Mutex;

use crate::domain::{ChatMessage, MessageId, Room, RoomId};

pub use message::InMemoryMessageRepository;
pub use room::InMemoryRoomRepository;

/// Tables of the in-memory store
#[derive(Debug)]
pub struct InMemoryDatabase {
    rooms: BTreeMap<RoomId, Room>,
    messages: BTreeMap<MessageId, ChatMessage>,
    next_room_id: i64,
    next_message_id: i64,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self {
            rooms: BTreeMap::new(),
            messages: BTreeMap::new(),
            next_room_id: 1,
            next_message_id: 1,
        }
    }

    /// Wrap a fresh database for sharing between repositories
    pub fn shared() -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(Self::new()))
    }
}

impl Default for InMemoryDatabase {
    fn default() -> Self {
        Self::new()
    }
}
