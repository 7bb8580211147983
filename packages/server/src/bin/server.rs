//! Echo Talk chat server.
//!
//! Serves the room/message REST API and the WebSocket broadcast hub.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin echotalk-server
//! cargo run --bin echotalk-server -- --host 0.0.0.0 --port 3000 --delivery-mode queued
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use echotalk_server::{
    config::{
        DEFAULT_ALLOWED_ORIGIN, DEFAULT_OUTBOUND_CAPACITY, DEFAULT_WRITE_TIMEOUT_MS, DeliveryMode,
        HubConfig, ServerConfig,
    },
    infrastructure::{
        message_pusher::BroadcastHub,
        repository::{InMemoryDatabase, InMemoryMessageRepository, InMemoryRoomRepository},
    },
    ui::{Server, state::AppState},
};
use echotalk_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "echotalk-server")]
#[command(about = "Multi-room chat server with WebSocket broadcast", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "ECHOTALK_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "ECHOTALK_PORT", default_value = "8080")]
    port: u16,

    /// Origins allowed to call the REST API (comma separated)
    #[arg(
        long,
        env = "ECHOTALK_ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = DEFAULT_ALLOWED_ORIGIN
    )]
    allowed_origins: Vec<String>,

    /// How inbound messages reach the broadcast hub
    #[arg(long, env = "ECHOTALK_DELIVERY_MODE", value_enum, default_value_t = DeliveryMode::Direct)]
    delivery_mode: DeliveryMode,

    /// Per-client write timeout in milliseconds
    #[arg(long, env = "ECHOTALK_WRITE_TIMEOUT_MS", default_value_t = DEFAULT_WRITE_TIMEOUT_MS)]
    write_timeout_ms: u64,

    /// Frames buffered per client before writes start waiting
    #[arg(long, env = "ECHOTALK_OUTBOUND_CAPACITY", default_value_t = DEFAULT_OUTBOUND_CAPACITY)]
    outbound_capacity: usize,
}

impl Args {
    fn into_config(self) -> ServerConfig {
        ServerConfig {
            host: self.host,
            port: self.port,
            allowed_origins: self.allowed_origins,
            hub: HubConfig {
                delivery_mode: self.delivery_mode,
                write_timeout: Duration::from_millis(self.write_timeout_ms),
                // a zero-capacity mpsc channel panics
                outbound_capacity: self.outbound_capacity.max(1),
            },
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    // the binary name covers the echotalk_server library target too
    setup_logger(env!("CARGO_BIN_NAME"), &["tower-http"], "debug");

    let config = Args::parse().into_config();

    // Initialize dependencies in order:
    // 1. Repositories
    // 2. Broadcast hub
    // 3. AppState (use cases)
    // 4. Server

    // 1. Create Repositories (in-memory database)
    let database = InMemoryDatabase::shared();
    let room_repository = Arc::new(InMemoryRoomRepository::new(database.clone()));
    let message_repository = Arc::new(InMemoryMessageRepository::new(database));

    // 2. Create the broadcast hub; queued delivery needs its fan-out loop
    let hub = Arc::new(BroadcastHub::new(config.hub.write_timeout));
    if config.hub.delivery_mode == DeliveryMode::Queued {
        tokio::spawn(hub.clone().run());
    }

    // 3. Create use cases
    let app_state = AppState::new(
        room_repository,
        message_repository,
        hub,
        Arc::new(SystemClock),
        config.hub.clone(),
    );

    // 4. Create and run the server
    let server = Server::new(app_state, config);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
