//! UseCase: a client connection is closed.

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher};

pub struct DisconnectClientUseCase {
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectClientUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// Remove the connection from the pusher. Safe to call more than once,
    /// including after a fan-out already pruned it.
    pub async fn execute(&self, connection_id: &ConnectionId) {
        self.message_pusher.unregister_client(connection_id).await;
        tracing::info!(
            "Client '{}' disconnected ({} remaining)",
            connection_id,
            self.message_pusher.connected_count().await
        );
    }
}
