//! Connection session: the lifecycle of one WebSocket client.
//!
//! ```text
//! Connecting --activate--> Active --close--> Closed
//! ```
//!
//! While `Active`, each inbound frame is handled as follows:
//!
//! - a chat frame is persisted and delivered through the hub
//! - a frame with an empty body or a non-positive room id is dropped
//! - a malformed payload, a transport error or a Close frame closes the session
//! - Ping/Pong frames are left to the protocol
//!
//! Outbound traffic never goes through the session: the hub pushes frames
//! into the connection's channel and [`spawn_writer`] drains it into the socket.

use std::{fmt, sync::Arc, time::Duration};

use axum::extract::ws::Message;
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::{ConnectionId, MessageBody, PusherChannel, RoomId},
    infrastructure::dto::websocket::InboundChatMessage,
    usecase::SendMessageOutcome,
};

use super::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Active,
    Closed,
}

/// What the session did with one inbound frame
#[derive(Debug, Clone, PartialEq, Eq)]
enum FrameOutcome {
    Delivered(Box<SendMessageOutcome>),
    Dropped,
    Ignored,
    Close,
}

pub struct ConnectionSession {
    app: Arc<AppState>,
    state: SessionState,
    connection_id: Option<ConnectionId>,
}

impl ConnectionSession {
    pub fn new(app: Arc<AppState>) -> Self {
        Self {
            app,
            state: SessionState::Connecting,
            connection_id: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn connection_id(&self) -> Option<ConnectionId> {
        self.connection_id
    }

    /// Register the connection's outbound channel with the hub.
    ///
    /// Only valid from `Connecting`; otherwise the channel is dropped and
    /// `None` is returned.
    pub async fn activate(&mut self, channel: PusherChannel) -> Option<ConnectionId> {
        if self.state != SessionState::Connecting {
            tracing::warn!("Session cannot be activated from {:?}", self.state);
            return None;
        }

        let connection_id = self.app.connect_client_usecase.execute(channel).await;
        self.connection_id = Some(connection_id);
        self.state = SessionState::Active;
        Some(connection_id)
    }

    /// Read frames until the session closes, then unregister it.
    ///
    /// The end of the stream counts as the peer going away.
    pub async fn run<S>(&mut self, mut inbound: S)
    where
        S: Stream<Item = Result<Message, axum::Error>> + Unpin,
    {
        let Some(connection_id) = self.connection_id else {
            tracing::warn!("Session was never activated, nothing to run");
            self.state = SessionState::Closed;
            return;
        };

        while self.state == SessionState::Active {
            let message = match inbound.next().await {
                Some(Ok(message)) => message,
                Some(Err(e)) => {
                    tracing::warn!("Transport error on '{}': {}", connection_id, e);
                    break;
                }
                None => {
                    tracing::debug!("Connection '{}' ended", connection_id);
                    break;
                }
            };

            match self.handle_frame(connection_id, message).await {
                FrameOutcome::Delivered(outcome) => tracing::debug!(
                    "Message from '{}' handled (persisted: {}, delivery: {:?})",
                    connection_id,
                    outcome.persisted(),
                    outcome.delivery
                ),
                FrameOutcome::Dropped | FrameOutcome::Ignored => {}
                FrameOutcome::Close => break,
            }
        }

        self.close().await;
    }

    /// Unregister from the hub and enter `Closed`. Repeated calls are no-ops.
    pub async fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        if let Some(connection_id) = &self.connection_id {
            self.app
                .disconnect_client_usecase
                .execute(connection_id)
                .await;
        }
        self.state = SessionState::Closed;
    }

    async fn handle_frame(&self, connection_id: ConnectionId, message: Message) -> FrameOutcome {
        match message {
            Message::Text(text) => {
                self.handle_payload(connection_id, text.as_str().as_bytes())
                    .await
            }
            Message::Binary(bytes) => self.handle_payload(connection_id, &bytes).await,
            Message::Ping(_) | Message::Pong(_) => FrameOutcome::Ignored,
            Message::Close(_) => {
                tracing::info!("Client '{}' requested close", connection_id);
                FrameOutcome::Close
            }
        }
    }

    async fn handle_payload(&self, connection_id: ConnectionId, payload: &[u8]) -> FrameOutcome {
        let frame: InboundChatMessage = match serde_json::from_slice(payload) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(
                    "Malformed frame from '{}', closing connection: {}",
                    connection_id,
                    e
                );
                return FrameOutcome::Close;
            }
        };

        let room_id = match RoomId::new(frame.room_id) {
            Ok(room_id) => room_id,
            Err(e) => {
                tracing::warn!("Dropping frame from '{}': {}", connection_id, e);
                return FrameOutcome::Dropped;
            }
        };
        let body = match MessageBody::new(frame.body) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Dropping frame from '{}': {}", connection_id, e);
                return FrameOutcome::Dropped;
            }
        };

        let outcome = self
            .app
            .send_message_usecase
            .execute(room_id, &frame.sender_name, body)
            .await;
        FrameOutcome::Delivered(Box::new(outcome))
    }
}

/// Drain a connection's outbound channel into its socket.
///
/// Every write, including the final close, is bounded by `write_timeout`. A
/// failed or timed-out write ends the task, which closes the connection.
pub fn spawn_writer<S>(
    connection_id: ConnectionId,
    mut outbound: mpsc::Receiver<String>,
    mut sink: S,
    write_timeout: Duration,
) -> JoinHandle<()>
where
    S: Sink<Message> + Unpin + Send + 'static,
    S::Error: fmt::Display + Send,
{
    tokio::spawn(async move {
        while let Some(frame) = outbound.recv().await {
            match tokio::time::timeout(write_timeout, sink.send(Message::Text(frame.into()))).await
            {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::debug!("Write to '{}' failed: {}", connection_id, e);
                    break;
                }
                Err(_) => {
                    tracing::warn!(
                        "Write to '{}' timed out after {:?}",
                        connection_id,
                        write_timeout
                    );
                    break;
                }
            }
        }
        let _ = tokio::time::timeout(write_timeout, sink.close()).await;
    })
}

/// Wait up to `grace` for a writer whose channel has been closed to flush
/// its queued frames and the Close frame, then abort it.
pub async fn finish_writer(writer: &mut JoinHandle<()>, grace: Duration) {
    if tokio::time::timeout(grace, &mut *writer).await.is_err() {
        tracing::debug!("Writer did not drain within {:?}, aborting", grace);
        writer.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{DeliveryMode, HubConfig},
        domain::{
            ANONYMOUS_SENDER_NAME, MessagePusher, MessageRepository, RoomName, RoomRepository,
            Timestamp,
        },
        infrastructure::{
            dto::websocket::ChatMessageDto,
            message_pusher::BroadcastHub,
            repository::{InMemoryDatabase, InMemoryMessageRepository, InMemoryRoomRepository},
        },
    };
    use axum::body::Bytes;
    use echotalk_shared::time::FixedClock;
    use futures_util::stream;
    use std::{
        pin::Pin,
        sync::{
            Mutex as StdMutex,
            atomic::{AtomicBool, Ordering},
        },
        task::{Context, Poll},
    };

    // ========================================
    // What is covered
    // ========================================
    // - a chat frame is stored and reaches every client, the sender included
    // - empty bodies and invalid room ids are dropped, the session continues
    // - malformed payloads, Close frames and transport errors close only
    //   this session
    // - the writer forwards frames in order and gives up on a stalled socket
    // - a finished session's writer flushes its queue and the Close frame,
    //   bounded by a grace period
    // ========================================

    const NOW: i64 = 1_672_531_200_000;

    struct Fixture {
        app: Arc<AppState>,
        hub: Arc<BroadcastHub>,
        messages: Arc<InMemoryMessageRepository>,
        room_id: RoomId,
    }

    async fn fixture(delivery_mode: DeliveryMode) -> Fixture {
        let db = InMemoryDatabase::shared();
        let rooms = Arc::new(InMemoryRoomRepository::new(db.clone()));
        let messages = Arc::new(InMemoryMessageRepository::new(db));
        let room = rooms
            .create(RoomName::new("general".to_string()).unwrap(), Timestamp::new(0))
            .await
            .unwrap();

        let hub = Arc::new(BroadcastHub::new(Duration::from_millis(100)));
        let hub_config = HubConfig {
            delivery_mode,
            ..HubConfig::default()
        };
        let app = Arc::new(AppState::new(
            rooms,
            messages.clone(),
            hub.clone(),
            Arc::new(FixedClock::new(NOW)),
            hub_config,
        ));

        Fixture {
            app,
            hub,
            messages,
            room_id: room.id,
        }
    }

    impl Fixture {
        /// A second client that only listens
        async fn observer(&self) -> mpsc::Receiver<String> {
            let (tx, rx) = mpsc::channel(8);
            self.hub.register_client(ConnectionId::generate(), tx).await;
            rx
        }

        async fn session(&self) -> (ConnectionSession, mpsc::Receiver<String>) {
            let (tx, rx) = mpsc::channel(8);
            let mut session = ConnectionSession::new(self.app.clone());
            session.activate(tx).await.unwrap();
            (session, rx)
        }
    }

    fn text(json: &str) -> Result<Message, axum::Error> {
        Ok(Message::Text(json.into()))
    }

    fn decode(frame: &str) -> ChatMessageDto {
        serde_json::from_str(frame).unwrap()
    }

    #[tokio::test]
    async fn test_blank_sender_reaches_everyone_as_anonymous() {
        // given: A (the session) and B (an observer) are connected
        let f = fixture(DeliveryMode::Direct).await;
        let mut b = f.observer().await;
        let (mut a, mut a_rx) = f.session().await;

        // when: A sends {sender_name:"", body:"hi", room_id:1}
        let frame = format!(r#"{{"sender_name":"","body":"hi","room_id":{}}}"#, f.room_id);
        a.run(stream::iter(vec![text(&frame)])).await;

        // then: both received it with the placeholder and an id
        for rx in [&mut a_rx, &mut b] {
            let dto = decode(&rx.try_recv().unwrap());
            assert_eq!(dto.sender_name, ANONYMOUS_SENDER_NAME);
            assert_eq!(dto.body, "hi");
            assert_eq!(dto.id, Some(1));
        }
        let stored = f.messages.find_by_room(f.room_id).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert!(stored[0].sender_name.is_anonymous());
    }

    #[tokio::test]
    async fn test_end_of_stream_closes_and_unregisters() {
        let f = fixture(DeliveryMode::Direct).await;
        let _b = f.observer().await;
        let (mut a, mut a_rx) = f.session().await;
        assert_eq!(f.hub.connected_count().await, 2);

        a.run(stream::iter(Vec::new())).await;

        assert_eq!(a.state(), SessionState::Closed);
        assert_eq!(f.hub.connected_count().await, 1);
        // the hub dropped A's sender
        assert_eq!(a_rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_empty_body_is_dropped_and_session_continues() {
        // given:
        let f = fixture(DeliveryMode::Direct).await;
        let mut b = f.observer().await;
        let (mut a, _a_rx) = f.session().await;

        // when:
        a.run(stream::iter(vec![
            text(r#"{"sender_name":"alice","body":"   ","room_id":1}"#),
            text(r#"{"sender_name":"alice","body":"second","room_id":1}"#),
        ]))
        .await;

        // then: only the second frame went out
        assert_eq!(decode(&b.try_recv().unwrap()).body, "second");
        assert!(b.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_non_positive_room_id_is_dropped() {
        let f = fixture(DeliveryMode::Direct).await;
        let mut b = f.observer().await;
        let (mut a, _a_rx) = f.session().await;

        a.run(stream::iter(vec![
            text(r#"{"sender_name":"alice","body":"lost","room_id":0}"#),
            text(r#"{"sender_name":"alice","body":"kept","room_id":1}"#),
        ]))
        .await;

        assert_eq!(decode(&b.try_recv().unwrap()).body, "kept");
        assert!(b.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_malformed_frame_closes_only_this_session() {
        // given:
        let f = fixture(DeliveryMode::Direct).await;
        let mut b = f.observer().await;
        let (mut a, _a_rx) = f.session().await;

        // when: the frame after the malformed one is never read
        a.run(stream::iter(vec![
            text("not json"),
            text(r#"{"sender_name":"alice","body":"after","room_id":1}"#),
        ]))
        .await;

        // then:
        assert_eq!(a.state(), SessionState::Closed);
        assert!(b.try_recv().is_err());
        assert_eq!(f.hub.connected_count().await, 1);
        assert!(f.messages.find_by_room(f.room_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_close_frame_ends_session() {
        let f = fixture(DeliveryMode::Direct).await;
        let mut b = f.observer().await;
        let (mut a, _a_rx) = f.session().await;

        a.run(stream::iter(vec![
            Ok(Message::Close(None)),
            text(r#"{"sender_name":"alice","body":"after","room_id":1}"#),
        ]))
        .await;

        assert_eq!(a.state(), SessionState::Closed);
        assert!(b.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_transport_error_ends_session() {
        let f = fixture(DeliveryMode::Direct).await;
        let mut b = f.observer().await;
        let (mut a, _a_rx) = f.session().await;

        a.run(stream::iter(vec![
            Err(axum::Error::new(std::io::Error::other("connection reset"))),
            text(r#"{"sender_name":"alice","body":"after","room_id":1}"#),
        ]))
        .await;

        assert_eq!(a.state(), SessionState::Closed);
        assert!(b.try_recv().is_err());
        assert_eq!(f.hub.connected_count().await, 1);
    }

    #[tokio::test]
    async fn test_binary_json_is_accepted_and_ping_ignored() {
        let f = fixture(DeliveryMode::Direct).await;
        let mut b = f.observer().await;
        let (mut a, _a_rx) = f.session().await;
        let payload = br#"{"username":"bob","text":"legacy","space_id":1}"#.to_vec();

        a.run(stream::iter(vec![
            Ok(Message::Ping(Bytes::new())),
            Ok(Message::Binary(payload.into())),
        ]))
        .await;

        let dto = decode(&b.try_recv().unwrap());
        assert_eq!(dto.sender_name, "bob");
        assert_eq!(dto.body, "legacy");
    }

    #[tokio::test]
    async fn test_unknown_room_is_broadcast_without_id() {
        // given: room 99 does not exist, so the store rejects the message
        let f = fixture(DeliveryMode::Direct).await;
        let mut b = f.observer().await;
        let (mut a, _a_rx) = f.session().await;

        // when:
        a.run(stream::iter(vec![text(
            r#"{"sender_name":"alice","body":"anyone?","room_id":99}"#,
        )]))
        .await;

        // then:
        let dto = decode(&b.try_recv().unwrap());
        assert_eq!(dto.id, None);
        assert_eq!(dto.room_id, 99);
    }

    #[tokio::test]
    async fn test_queued_mode_delivers_through_hub_loop() {
        let f = fixture(DeliveryMode::Queued).await;
        let loop_handle = tokio::spawn(f.hub.clone().run());
        let mut b = f.observer().await;
        let (mut a, _a_rx) = f.session().await;

        a.run(stream::iter(vec![text(
            r#"{"sender_name":"alice","body":"queued","room_id":1}"#,
        )]))
        .await;

        let frame = tokio::time::timeout(Duration::from_secs(1), b.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(decode(&frame).body, "queued");
        loop_handle.abort();
    }

    #[tokio::test]
    async fn test_activate_twice_is_rejected() {
        let f = fixture(DeliveryMode::Direct).await;
        let (mut a, _a_rx) = f.session().await;
        let (tx, _rx) = mpsc::channel(1);

        assert_eq!(a.activate(tx).await, None);
        assert_eq!(f.hub.connected_count().await, 1);
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let f = fixture(DeliveryMode::Direct).await;
        let (mut a, _a_rx) = f.session().await;

        a.close().await;
        a.close().await;

        assert_eq!(a.state(), SessionState::Closed);
        assert_eq!(f.hub.connected_count().await, 0);
    }

    /// Records text frames and whether it was closed; with `stall` set it
    /// never becomes ready
    #[derive(Clone, Default)]
    struct RecordingSink {
        frames: Arc<StdMutex<Vec<String>>>,
        closed: Arc<AtomicBool>,
        stall: bool,
    }

    impl Sink<Message> for RecordingSink {
        type Error = std::io::Error;

        fn poll_ready(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            if self.stall {
                Poll::Pending
            } else {
                Poll::Ready(Ok(()))
            }
        }

        fn start_send(self: Pin<&mut Self>, item: Message) -> Result<(), Self::Error> {
            if let Message::Text(text) = item {
                self.frames.lock().unwrap().push(text.to_string());
            }
            Ok(())
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            self.closed.store(true, Ordering::SeqCst);
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_writer_forwards_frames_in_order() {
        // given:
        let sink = RecordingSink::default();
        let frames = sink.frames.clone();
        let (tx, rx) = mpsc::channel(4);
        let writer = spawn_writer(ConnectionId::generate(), rx, sink, Duration::from_millis(50));

        // when: the hub drops the sender after two frames
        tx.send("one".to_string()).await.unwrap();
        tx.send("two".to_string()).await.unwrap();
        drop(tx);

        // then:
        writer.await.unwrap();
        assert_eq!(*frames.lock().unwrap(), vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_writer_gives_up_on_stalled_socket() {
        // given: a socket that never accepts a write
        let sink = RecordingSink {
            stall: true,
            ..RecordingSink::default()
        };
        let (tx, rx) = mpsc::channel(4);
        let writer = spawn_writer(ConnectionId::generate(), rx, sink, Duration::from_millis(50));

        // when:
        tx.send("stuck".to_string()).await.unwrap();

        // then: the writer ends although the channel is still open
        tokio::time::timeout(Duration::from_secs(1), writer)
            .await
            .expect("writer should stop after the write timeout")
            .unwrap();
        assert!(tx.is_closed());
    }

    #[tokio::test]
    async fn test_finish_writer_flushes_queued_frames_and_closes() {
        // given: frames still queued when the hub drops the sender
        let sink = RecordingSink::default();
        let frames = sink.frames.clone();
        let closed = sink.closed.clone();
        let (tx, rx) = mpsc::channel(4);
        tx.send("one".to_string()).await.unwrap();
        tx.send("two".to_string()).await.unwrap();
        tx.send("three".to_string()).await.unwrap();
        drop(tx);
        let mut writer = spawn_writer(ConnectionId::generate(), rx, sink, Duration::from_secs(1));

        // when:
        finish_writer(&mut writer, Duration::from_secs(1)).await;

        // then:
        assert!(writer.is_finished());
        assert_eq!(*frames.lock().unwrap(), vec!["one", "two", "three"]);
        assert!(closed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_finish_writer_aborts_after_grace() {
        // given: a stalled socket and a write timeout longer than the grace
        let sink = RecordingSink {
            stall: true,
            ..RecordingSink::default()
        };
        let (tx, rx) = mpsc::channel(4);
        tx.send("stuck".to_string()).await.unwrap();
        drop(tx);
        let mut writer = spawn_writer(ConnectionId::generate(), rx, sink, Duration::from_secs(30));

        // when:
        tokio::time::timeout(
            Duration::from_secs(1),
            finish_writer(&mut writer, Duration::from_millis(50)),
        )
        .await
        .expect("finish_writer should give up after the grace period");

        // then:
        assert!(writer.await.unwrap_err().is_cancelled());
    }
}
