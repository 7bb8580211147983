//! Utilities shared by the Echo Talk server and client.

pub mod logger;
pub mod time;
