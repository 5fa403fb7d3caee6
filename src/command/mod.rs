mod ask;
mod status;
mod suggest;

pub use ask::{run_ask, AskOptions};
pub use status::run_status;
pub use suggest::run_suggest;
