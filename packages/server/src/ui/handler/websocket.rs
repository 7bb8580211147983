//! Upgrade gateway: turns `GET /api/ws` into a connection session.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{WebSocket, WebSocketUpgrade, rejection::WebSocketUpgradeRejection},
    },
    response::{IntoResponse, Response},
};
use futures_util::StreamExt;
use tokio::sync::mpsc;

use crate::ui::{
    session::{ConnectionSession, finish_writer, spawn_writer},
    state::AppState,
};

/// A request that is not a valid upgrade is rejected before any session
/// exists.
pub async fn websocket_handler(
    State(state): State<Arc<AppState>>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    match ws {
        Ok(ws) => ws
            .on_upgrade(move |socket| handle_socket(socket, state))
            .into_response(),
        Err(rejection) => {
            tracing::warn!("Rejected WebSocket upgrade: {}", rejection);
            rejection.into_response()
        }
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sink, stream) = socket.split();
    let (tx, rx) = mpsc::channel(state.hub_config.outbound_capacity);

    let mut session = ConnectionSession::new(state.clone());
    let Some(connection_id) = session.activate(tx).await else {
        return;
    };

    let mut send_task = spawn_writer(connection_id, rx, sink, state.hub_config.write_timeout);
    let mut recv_task = tokio::spawn(async move { session.run(stream).await });

    tokio::select! {
        // the session unregistered itself, which closed the writer's channel
        _ = &mut recv_task => {
            finish_writer(&mut send_task, state.hub_config.write_timeout).await;
        }
        _ = &mut send_task => {
            recv_task.abort();
            // the session never reached its own close
            state.disconnect_client_usecase.execute(&connection_id).await;
        }
    };
}
