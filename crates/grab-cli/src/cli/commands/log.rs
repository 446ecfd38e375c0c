//! `grab log <message>` – append a line to a file log.

use grab_core::config::GrabConfig;
use grab_core::file_log;
use std::path::Path;

/// Records `message`. A log that cannot be written ends the process with
/// status 1.
pub fn run_log(cfg: &GrabConfig, message: &str, path: Option<&Path>) {
    let path = path.or(cfg.log_path.as_deref());
    if let Err(e) = file_log::info(message, path) {
        tracing::error!("file log failed: {}", e);
        eprintln!("grab error: {}", e);
        std::process::exit(1);
    }
}
