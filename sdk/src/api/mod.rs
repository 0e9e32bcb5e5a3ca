//! HTTP API module.
//!
//! This module provides the validation server, its request/response types and
//! the log broadcaster shared by the CLI and the SSE endpoint.

pub mod server;
pub mod types;
pub mod logs;

pub use server::{router, start_server, AppState};
pub use types::*;
pub use logs::*;
