//! Data Transfer Objects (DTOs).
//!
//! DTOs are organized by protocol:
//! - `websocket`: frames exchanged on the live connection
//! - `http`: REST request and response bodies

pub mod conversion;
pub mod http;
pub mod websocket;
