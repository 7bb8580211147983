//! UseCase layer: application operations over the domain interfaces.

pub mod connect_client;
pub mod create_message;
pub mod create_room;
pub mod delete_message;
pub mod disconnect_client;
pub mod error;
pub mod get_messages;
pub mod get_rooms;
pub mod send_message;

pub use connect_client::ConnectClientUseCase;
pub use create_message::CreateMessageUseCase;
pub use create_room::CreateRoomUseCase;
pub use delete_message::DeleteMessageUseCase;
pub use disconnect_client::DisconnectClientUseCase;
pub use error::{
    CreateMessageError, CreateRoomError, DeleteMessageError, GetMessagesError, GetRoomsError,
};
pub use get_messages::GetMessagesUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use send_message::{Delivery, SendMessageOutcome, SendMessageUseCase};
