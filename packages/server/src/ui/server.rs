//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{delete, get},
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::ServerConfig;

use super::{
    handler::{
        create_message, create_room, delete_message, get_messages, get_rooms, health_check,
        websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Chat server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(app_state, config);
/// server.run().await?;
/// ```
pub struct Server {
    app_state: Arc<AppState>,
    config: ServerConfig,
}

impl Server {
    pub fn new(app_state: AppState, config: ServerConfig) -> Self {
        Self {
            app_state: Arc::new(app_state),
            config,
        }
    }

    /// All routes with CORS and request tracing applied
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket endpoint
            .route("/api/ws", get(websocket_handler))
            // REST endpoints
            .route("/health", get(health_check))
            .route("/api/rooms", get(get_rooms).post(create_room))
            .route(
                "/api/rooms/{room_id}/messages",
                get(get_messages).post(create_message),
            )
            .route(
                "/api/rooms/{room_id}/messages/{message_id}",
                delete(delete_message),
            )
            .layer(self.cors_layer())
            .layer(TraceLayer::new_for_http())
            .with_state(self.app_state.clone())
    }

    fn cors_layer(&self) -> CorsLayer {
        let origins: Vec<HeaderValue> = self
            .config
            .allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE])
    }

    /// Run the server until Ctrl+C or SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the configured address
    /// or if there's an error during server execution.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();

        let bind_addr = self.config.bind_addr();
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!("Chat server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/api/ws", bind_addr);
        tracing::info!(
            "Delivery mode: {:?}, write timeout: {:?}",
            self.config.hub.delivery_mode,
            self.config.hub.write_timeout
        );
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
