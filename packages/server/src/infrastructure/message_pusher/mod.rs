//! WebSocket broadcast hub.
//!
//! ## Layout
//!
//! - `handle`: one connected client's outbound channel plus its liveness flag
//! - `registry`: the set of live handles behind a single lock
//! - `hub`: [`BroadcastHub`], the `MessagePusher` implementation that owns the
//!   registry and the inbound queue and performs the fan-out
//!
//! Socket ownership stays in the UI layer (`ui::session`): each connection
//! runs a writer task that drains the handle's channel into the socket. The
//! registry holds the only sender, so removing a handle closes the writer.

pub mod handle;
pub mod hub;
pub mod registry;

pub use handle::ClientHandle;
pub use hub::BroadcastHub;
pub use registry::ConnectionRegistry;
