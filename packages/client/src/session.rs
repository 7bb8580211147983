//! One connection to the chat server.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use echotalk_server::infrastructure::dto::websocket::{ChatMessageDto, InboundChatMessage};

use crate::{
    ClientConfig,
    domain::is_for_room,
    error::ClientError,
    formatter::MessageFormatter,
    history::fetch_history,
    ui::redisplay_prompt,
};

/// Run one connection until the user quits (`Ok`) or the connection is lost.
///
/// `input_rx` outlives the session so a reconnect keeps the same stdin reader.
pub async fn run_client_session(
    config: &ClientConfig,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let history = fetch_history(&config.url, config.room_id).await?;

    let (ws_stream, _response) = connect_async(config.url.as_str())
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Connected to chat server!");
    print!(
        "{}",
        MessageFormatter::format_history(config.room_id, &history, &config.name)
    );
    println!("Type messages and press Enter to send. Press Ctrl+C to exit.\n");
    redisplay_prompt(&config.name);

    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            message = read.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<ChatMessageDto>(text.as_str()) {
                        Ok(chat) if is_for_room(&chat, config.room_id) => {
                            print!("{}", MessageFormatter::format_chat_message(&chat, &config.name));
                            redisplay_prompt(&config.name);
                        }
                        Ok(chat) => {
                            tracing::debug!("Skipping message for room {}", chat.room_id);
                        }
                        Err(_) => {
                            print!("{}", MessageFormatter::format_raw_message(text.as_str()));
                            redisplay_prompt(&config.name);
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("Server closed the connection");
                    return Err(ClientError::ConnectionError("Connection lost".to_string()));
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    return Err(ClientError::ConnectionError(e.to_string()));
                }
            },
            line = input_rx.recv() => match line {
                Some(body) => {
                    let frame = InboundChatMessage {
                        sender_name: config.name.clone(),
                        body,
                        room_id: config.room_id,
                    };
                    let json = match serde_json::to_string(&frame) {
                        Ok(json) => json,
                        Err(e) => {
                            tracing::error!("Failed to serialize message: {}", e);
                            continue;
                        }
                    };
                    if let Err(e) = write.send(Message::Text(json.into())).await {
                        tracing::warn!("Failed to send message: {}", e);
                        return Err(ClientError::ConnectionError(e.to_string()));
                    }
                }
                None => {
                    // stdin closed: the user is done
                    let _ = write.close().await;
                    return Ok(());
                }
            },
        }
    }
}
