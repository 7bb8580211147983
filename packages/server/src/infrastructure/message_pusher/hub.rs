//! Broadcast hub: the `MessagePusher` implementation backed by WebSocket
//! connections.
//!
//! ## Delivery modes
//!
//! - direct: the session that produced a message calls [`MessagePusher::broadcast`]
//! - queued: the session calls [`MessagePusher::enqueue`] and [`BroadcastHub::run`]
//!   performs the same fan-out from a background task
//!
//! Both paths end in `fan_out`, so ordering and error handling are identical.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use futures_util::future::join_all;
use tokio::sync::{Mutex, mpsc};

use crate::{
    domain::{
        ChatMessage, ConnectionId, DeliveryReport, MessagePushError, MessagePusher, PusherChannel,
    },
    infrastructure::dto::websocket::ChatMessageDto,
};

use super::{ClientHandle, ConnectionRegistry};

pub struct BroadcastHub {
    registry: ConnectionRegistry,
    /// Upper bound for handing one frame to one client
    write_timeout: Duration,
    inbound_tx: mpsc::UnboundedSender<ChatMessage>,
    /// Taken by the first call to `run`
    inbound_rx: Mutex<Option<mpsc::UnboundedReceiver<ChatMessage>>>,
}

impl BroadcastHub {
    pub fn new(write_timeout: Duration) -> Self {
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        Self {
            registry: ConnectionRegistry::new(),
            write_timeout,
            inbound_tx,
            inbound_rx: Mutex::new(Some(inbound_rx)),
        }
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub fn write_timeout(&self) -> Duration {
        self.write_timeout
    }

    /// Drain the inbound queue, broadcasting each message.
    ///
    /// Runs until the queue closes, which in practice is process shutdown;
    /// messages still queued at that point are dropped. Only one loop can
    /// own the queue: a second call returns immediately.
    pub async fn run(self: Arc<Self>) {
        let Some(mut inbound_rx) = self.inbound_rx.lock().await.take() else {
            tracing::warn!("Broadcast loop is already running");
            return;
        };

        tracing::info!("Broadcast loop started");
        while let Some(message) = inbound_rx.recv().await {
            if let Err(e) = self.broadcast(&message).await {
                tracing::error!("Failed to broadcast queued message: {}", e);
            }
        }
        tracing::info!("Broadcast loop stopped");
    }

    /// Push `frame` to every live handle concurrently and prune the ones that
    /// fail.
    async fn fan_out(&self, frame: &str) -> DeliveryReport {
        let targets = self.registry.snapshot().await;
        if targets.is_empty() {
            tracing::debug!("No connected clients, nothing to broadcast");
            return DeliveryReport::default();
        }

        let results = join_all(targets.iter().map(|handle| async move {
            let result = handle.push(frame.to_string(), self.write_timeout).await;
            if result.is_err() {
                handle.mark_dead();
            }
            (handle.id(), result)
        }))
        .await;

        let mut report = DeliveryReport::default();
        for (id, result) in results {
            match result {
                Ok(()) => report.delivered.push(id),
                Err(e) => {
                    tracing::warn!("Dropping client '{}': {}", id, e);
                    report.pruned.push(id);
                }
            }
        }

        if !report.pruned.is_empty() {
            self.registry.remove_all(&report.pruned).await;
        }

        tracing::debug!(
            "Broadcast delivered to {} client(s), pruned {}",
            report.delivered.len(),
            report.pruned.len()
        );
        report
    }
}

#[async_trait]
impl MessagePusher for BroadcastHub {
    async fn register_client(&self, connection_id: ConnectionId, channel: PusherChannel) {
        self.registry
            .add(ClientHandle::new(connection_id, channel))
            .await;
        tracing::debug!("Client '{}' registered to hub", connection_id);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        if self.registry.remove(connection_id).await.is_some() {
            tracing::debug!("Client '{}' unregistered from hub", connection_id);
        }
    }

    async fn broadcast(&self, message: &ChatMessage) -> Result<DeliveryReport, MessagePushError> {
        let frame = serde_json::to_string(&ChatMessageDto::from(message))
            .map_err(|e| MessagePushError::Serialization(e.to_string()))?;
        Ok(self.fan_out(&frame).await)
    }

    fn enqueue(&self, message: ChatMessage) -> Result<(), MessagePushError> {
        self.inbound_tx
            .send(message)
            .map_err(|_| MessagePushError::QueueClosed)
    }

    async fn connected_count(&self) -> usize {
        self.registry.len().await
    }
}
