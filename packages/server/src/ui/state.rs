//! Shared application state.

use std::sync::Arc;

use echotalk_shared::time::Clock;

use crate::{
    config::HubConfig,
    domain::{MessagePusher, MessageRepository, RoomRepository},
    usecase::{
        ConnectClientUseCase, CreateMessageUseCase, CreateRoomUseCase, DeleteMessageUseCase,
        DisconnectClientUseCase, GetMessagesUseCase, GetRoomsUseCase, SendMessageUseCase,
    },
};

pub struct AppState {
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    pub disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    pub send_message_usecase: Arc<SendMessageUseCase>,
    pub create_room_usecase: Arc<CreateRoomUseCase>,
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    pub get_messages_usecase: Arc<GetMessagesUseCase>,
    pub create_message_usecase: Arc<CreateMessageUseCase>,
    pub delete_message_usecase: Arc<DeleteMessageUseCase>,
    /// Per-connection settings used when a session starts
    pub hub_config: HubConfig,
}

impl AppState {
    /// Wire every use case over the given store and pusher
    pub fn new(
        room_repository: Arc<dyn RoomRepository>,
        message_repository: Arc<dyn MessageRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        hub_config: HubConfig,
    ) -> Self {
        Self {
            connect_client_usecase: Arc::new(ConnectClientUseCase::new(message_pusher.clone())),
            disconnect_client_usecase: Arc::new(DisconnectClientUseCase::new(
                message_pusher.clone(),
            )),
            send_message_usecase: Arc::new(SendMessageUseCase::new(
                message_repository.clone(),
                message_pusher,
                clock.clone(),
                hub_config.delivery_mode,
            )),
            create_room_usecase: Arc::new(CreateRoomUseCase::new(
                room_repository.clone(),
                clock.clone(),
            )),
            get_rooms_usecase: Arc::new(GetRoomsUseCase::new(room_repository.clone())),
            get_messages_usecase: Arc::new(GetMessagesUseCase::new(
                room_repository,
                message_repository.clone(),
            )),
            create_message_usecase: Arc::new(CreateMessageUseCase::new(
                message_repository.clone(),
                clock,
            )),
            delete_message_usecase: Arc::new(DeleteMessageUseCase::new(message_repository)),
            hub_config,
        }
    }
}
