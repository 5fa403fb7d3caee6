//! MCP tool implementations.
//!
//! Each tool is implemented in its own module for better organization.

mod assist;
mod common;
mod context;
mod history;
mod output;

pub use assist::{assist, suggest};
pub use context::set_codebase_context;
pub use history::get_history;
pub use output::{render_last_output, save_last_output};
