mod http;
mod websocket;

pub use http::{
    create_message, create_room, delete_message, get_messages, get_rooms, health_check,
};
pub use websocket::websocket_handler;
