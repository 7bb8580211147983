//! Echo Talk server.
//!
//! Layered as `domain` (entities and interfaces), `usecase` (application
//! operations), `infrastructure` (store, DTOs and the broadcast hub) and `ui`
//! (HTTP/WebSocket surface).

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
