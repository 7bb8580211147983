//! Repository implementations.

pub mod inmemory;

pub use inmemory::{InMemoryDatabase, InMemoryMessageRepository, InMemoryRoomRepository};
