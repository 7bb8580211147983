//! Room history over the REST API.

use echotalk_server::infrastructure::dto::websocket::ChatMessageDto;
use reqwest::StatusCode;

use crate::{domain::history_url, error::ClientError};

pub async fn fetch_history(ws_url: &str, room_id: i64) -> Result<Vec<ChatMessageDto>, ClientError> {
    let url = history_url(ws_url, room_id)?;

    let response = reqwest::get(&url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    match response.status() {
        StatusCode::OK => response
            .json::<Vec<ChatMessageDto>>()
            .await
            .map_err(|e| ClientError::History(e.to_string())),
        StatusCode::NOT_FOUND => Err(ClientError::RoomNotFound(room_id)),
        status => Err(ClientError::History(format!(
            "unexpected status {} from {}",
            status, url
        ))),
    }
}
