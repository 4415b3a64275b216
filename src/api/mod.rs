//! HTTP API module.
//!
//! Server, response types and the log bus.

pub mod logs;
pub mod server;
pub mod types;

pub use server::start_server;
pub use types::*;
