//! Message push abstraction.
//!
//! Use cases depend on this trait; the WebSocket hub in the infrastructure
//! layer implements it.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ChatMessage, ConnectionId, MessagePushError};

/// Bounded channel carrying serialized frames to one client's socket writer
pub type PusherChannel = mpsc::Sender<String>;

/// Outcome of one fan-out
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Connections that accepted the frame
    pub delivered: Vec<ConnectionId>,
    /// Connections that failed the write and were removed
    pub pruned: Vec<ConnectionId>,
}

impl DeliveryReport {
    pub fn attempted(&self) -> usize {
        self.delivered.len() + self.pruned.len()
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Register a connection; the pusher becomes the sole owner of `channel`.
    async fn register_client(&self, connection_id: ConnectionId, channel: PusherChannel);

    /// Remove a connection. Unknown ids are ignored.
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// Deliver a message to every registered connection
    async fn broadcast(&self, message: &ChatMessage) -> Result<DeliveryReport, MessagePushError>;

    /// Queue a message for the background fan-out loop
    fn enqueue(&self, message: ChatMessage) -> Result<(), MessagePushError>;

    async fn connected_count(&self) -> usize;
}
