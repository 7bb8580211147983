//! Pure client-side decisions, kept free of I/O.

use reqwest::Url;

use echotalk_server::infrastructure::dto::websocket::ChatMessageDto;

use crate::error::ClientError;

/// Errors that retrying cannot fix
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(
        error,
        ClientError::InvalidUrl(_) | ClientError::RoomNotFound(_)
    )
}

pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }
    current_attempt < max_attempts
}

/// History endpoint on the same host as the WebSocket endpoint.
///
/// `ws://host:8080/api/ws` with room 3 becomes
/// `http://host:8080/api/rooms/3/messages`; `wss` maps to `https`.
pub fn history_url(ws_url: &str, room_id: i64) -> Result<String, ClientError> {
    let invalid = || ClientError::InvalidUrl(ws_url.to_string());

    let mut url = Url::parse(ws_url).map_err(|_| invalid())?;
    let scheme = match url.scheme() {
        "ws" => "http",
        "wss" => "https",
        _ => return Err(invalid()),
    };
    url.set_scheme(scheme).map_err(|_| invalid())?;
    url.set_path(&format!("/api/rooms/{}/messages", room_id));
    url.set_query(None);
    Ok(url.to_string())
}

/// The hub broadcasts every room to every client; show only ours
pub fn is_for_room(message: &ChatMessageDto, room_id: i64) -> bool {
    message.room_id == room_id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_exit_immediately_on_unknown_room() {
        // given:
        let error = ClientError::RoomNotFound(3);

        // when:
        let result = should_exit_immediately(&error);

        // then:
        assert!(result);
    }

    #[test]
    fn test_should_not_exit_on_connection_error() {
        let error = ClientError::ConnectionError("network error".to_string());
        assert!(!should_exit_immediately(&error));
    }

    #[test]
    fn test_should_attempt_reconnect_within_limit() {
        let error = ClientError::ConnectionError("network error".to_string());
        assert!(should_attempt_reconnect(&error, 0, 5));
        assert!(should_attempt_reconnect(&error, 4, 5));
    }

    #[test]
    fn test_should_attempt_reconnect_at_limit() {
        let error = ClientError::ConnectionError("network error".to_string());
        assert!(!should_attempt_reconnect(&error, 5, 5));
    }

    #[test]
    fn test_should_not_reconnect_on_invalid_url() {
        let error = ClientError::InvalidUrl("nope".to_string());
        assert!(!should_attempt_reconnect(&error, 0, 5));
    }

    #[test]
    fn test_history_url_from_ws_url() {
        // given:
        let ws_url = "ws://127.0.0.1:8080/api/ws";

        // when:
        let url = history_url(ws_url, 3).unwrap();

        // then:
        assert_eq!(url, "http://127.0.0.1:8080/api/rooms/3/messages");
    }

    #[test]
    fn test_history_url_from_secure_ws_url() {
        let url = history_url("wss://chat.example.com/api/ws?x=1", 1).unwrap();
        assert_eq!(url, "https://chat.example.com/api/rooms/1/messages");
    }

    #[test]
    fn test_history_url_rejects_non_websocket_scheme() {
        assert!(matches!(
            history_url("ftp://example.com/api/ws", 1),
            Err(ClientError::InvalidUrl(_))
        ));
        assert!(matches!(
            history_url("not a url", 1),
            Err(ClientError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_is_for_room() {
        let message = ChatMessageDto {
            id: Some(1),
            room_id: 2,
            sender_name: "alice".to_string(),
            body: "hi".to_string(),
            created_at: "2023-01-01T00:00:00.000Z".to_string(),
        };

        assert!(is_for_room(&message, 2));
        assert!(!is_for_room(&message, 1));
    }
}
