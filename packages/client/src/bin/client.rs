//! Echo Talk chat client.
//!
//! Shows the history of one room, then its live messages, and sends every
//! line typed on stdin to that room. Automatically reconnects on
//! disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin echotalk-client -- --name alice --room 1
//! cargo run --bin echotalk-client -- -u ws://chat.example.com/api/ws -r 2
//! ```

use clap::Parser;

use echotalk_client::{ClientConfig, run_client};
use echotalk_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "echotalk-client")]
#[command(about = "Echo Talk chat client", long_about = None)]
struct Args {
    /// WebSocket server URL
    #[arg(
        short = 'u',
        long,
        env = "ECHOTALK_URL",
        default_value = "ws://127.0.0.1:8080/api/ws"
    )]
    url: String,

    /// Display name; omit to post anonymously
    #[arg(short = 'n', long, env = "ECHOTALK_NAME")]
    name: Option<String>,

    /// Room to join
    #[arg(short = 'r', long, env = "ECHOTALK_ROOM", default_value = "1")]
    room: i64,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &[], "info");

    let args = Args::parse();
    let config = ClientConfig {
        url: args.url,
        name: args.name.unwrap_or_default(),
        room_id: args.room,
    };

    // Run the client
    if let Err(e) = run_client(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
