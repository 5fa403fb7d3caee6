mod args;
mod paths;

pub use args::{Cli, Commands};
pub use paths::read_code_input;
