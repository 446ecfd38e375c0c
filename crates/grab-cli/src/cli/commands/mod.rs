//! CLI command handlers. Each command is in its own file.

mod fetch;
mod get;
mod log;

pub use fetch::run_fetch;
#[cfg(test)]
pub use fetch::parse_header;
pub use get::{run_get, GetArgs};
pub use log::run_log;
