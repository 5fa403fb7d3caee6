//! MCP (Model Context Protocol) server implementation using rmcp.
//!
//! Exposes the assistant operations (assist, suggest, context upload, history
//! and output export) as MCP tools over stdio.

mod handlers;
mod server;
mod tools;
pub mod types;

pub use handlers::run_mcp_server;
