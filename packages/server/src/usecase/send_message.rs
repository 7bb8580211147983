//! UseCase: a message arrives on a live connection.
//!
//! ## Flow
//!
//! 1. blank sender names become the anonymous placeholder
//! 2. the message is persisted; a failure is logged and does not stop delivery
//! 3. the message is broadcast directly or queued for the hub's loop

use std::sync::Arc;

use echotalk_shared::time::Clock;

use crate::{
    config::DeliveryMode,
    domain::{
        ChatMessage, DeliveryReport, MessageBody, MessagePushError, MessagePusher,
        MessageRepository, RoomId, SenderName, Timestamp,
    },
};

/// How the message left the use case
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Broadcast(DeliveryReport),
    Queued,
    Failed(MessagePushError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessageOutcome {
    /// The message as delivered; `id` is set only if persistence succeeded
    pub message: ChatMessage,
    pub delivery: Delivery,
}

impl SendMessageOutcome {
    pub fn persisted(&self) -> bool {
        self.message.is_persisted()
    }
}

pub struct SendMessageUseCase {
    message_repository: Arc<dyn MessageRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    delivery_mode: DeliveryMode,
}

impl SendMessageUseCase {
    pub fn new(
        message_repository: Arc<dyn MessageRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        delivery_mode: DeliveryMode,
    ) -> Self {
        Self {
            message_repository,
            message_pusher,
            clock,
            delivery_mode,
        }
    }

    /// Persist and deliver one inbound message.
    ///
    /// Never fails as a whole: persistence and delivery are independent
    /// best-effort steps and their results are reported in the outcome.
    pub async fn execute(
        &self,
        room_id: RoomId,
        raw_sender_name: &str,
        body: MessageBody,
    ) -> SendMessageOutcome {
        let sender_name = SenderName::normalize(raw_sender_name);
        let mut message = ChatMessage::new(
            room_id,
            sender_name,
            body,
            Timestamp::new(self.clock.now_millis()),
        );

        match self.message_repository.create(&message).await {
            Ok(id) => message.assign_id(id),
            Err(e) => tracing::warn!(
                "Failed to persist message from '{}' in room {}: {}",
                message.sender_name.as_str(),
                room_id,
                e
            ),
        }

        let delivery = match self.delivery_mode {
            DeliveryMode::Direct => match self.message_pusher.broadcast(&message).await {
                Ok(report) => Delivery::Broadcast(report),
                Err(e) => Delivery::Failed(e),
            },
            DeliveryMode::Queued => match self.message_pusher.enqueue(message.clone()) {
                Ok(()) => Delivery::Queued,
                Err(e) => Delivery::Failed(e),
            },
        };

        if let Delivery::Failed(e) = &delivery {
            tracing::error!("Failed to deliver message in room {}: {}", room_id, e);
        }

        SendMessageOutcome { message, delivery }
    }
}
