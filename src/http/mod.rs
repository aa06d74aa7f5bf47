//! HTTP server module.
//!
//! The server includes:
//! - Plain HTTP listener on the configured address
//! - Graceful shutdown on SIGTERM/SIGINT, shared with the background emitters

mod server;
mod shutdown;

pub use server::{bind, serve, start_server, ServerError};
pub use shutdown::setup_shutdown_handler;
