//! UseCase: a client connection becomes active.

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel};

pub struct ConnectClientUseCase {
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectClientUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// Register `channel` under a fresh connection id.
    ///
    /// The pusher owns the channel from here on; the caller keeps only the id.
    pub async fn execute(&self, channel: PusherChannel) -> ConnectionId {
        let connection_id = ConnectionId::generate();
        self.message_pusher
            .register_client(connection_id, channel)
            .await;

        tracing::info!(
            "Client '{}' connected ({} total)",
            connection_id,
            self.message_pusher.connected_count().await
        );
        connection_id
    }
}
