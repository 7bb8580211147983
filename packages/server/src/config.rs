//! Server configuration.
//!
//! Values come from the command line (see `bin/server.rs`), each flag also
//! readable from an `ECHOTALK_*` environment variable.

use std::time::Duration;

use clap::ValueEnum;

pub const DEFAULT_WRITE_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_OUTBOUND_CAPACITY: usize = 64;
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// How a session hands an inbound message to the hub
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DeliveryMode {
    /// The session broadcasts the message itself
    #[default]
    Direct,
    /// The session enqueues the message; the hub's loop broadcasts it
    Queued,
}

/// Broadcast hub tuning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubConfig {
    pub delivery_mode: DeliveryMode,
    /// Bound for one frame to one client, both for queuing it and for the
    /// socket write. A client exceeding it is disconnected.
    pub write_timeout: Duration,
    /// Frames buffered per client before pushes start waiting
    pub outbound_capacity: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            delivery_mode: DeliveryMode::default(),
            write_timeout: Duration::from_millis(DEFAULT_WRITE_TIMEOUT_MS),
            outbound_capacity: DEFAULT_OUTBOUND_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by CORS for the REST API
    pub allowed_origins: Vec<String>,
    pub hub: HubConfig,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            allowed_origins: vec![DEFAULT_ALLOWED_ORIGIN.to_string()],
            hub: HubConfig::default(),
        }
    }
}
