//! Client handle.

use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use tokio::sync::mpsc::error::SendTimeoutError;

use crate::domain::{ConnectionId, MessagePushError, PusherChannel};

/// Outbound side of one client connection.
///
/// Frames pushed here are written to the socket, in order, by that
/// connection's writer task. Only the registry owns a handle.
#[derive(Debug)]
pub struct ClientHandle {
    id: ConnectionId,
    channel: PusherChannel,
    live: AtomicBool,
}

impl ClientHandle {
    pub fn new(id: ConnectionId, channel: PusherChannel) -> Self {
        Self {
            id,
            channel,
            live: AtomicBool::new(true),
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Flag the handle so that later snapshots skip it.
    ///
    /// A closed channel does not clear the flag by itself: the fan-out that
    /// observes the failed push marks the handle and removes it.
    pub fn mark_dead(&self) {
        self.live.store(false, Ordering::Release);
    }

    /// Queue one frame for the writer, waiting at most `timeout` for room in
    /// the channel.
    pub async fn push(&self, frame: String, timeout: Duration) -> Result<(), MessagePushError> {
        self.channel
            .send_timeout(frame, timeout)
            .await
            .map_err(|e| match e {
                SendTimeoutError::Closed(_) => MessagePushError::Closed(self.id),
                SendTimeoutError::Timeout(_) => MessagePushError::Timeout(self.id),
            })
    }
}
