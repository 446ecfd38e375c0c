pub mod config;
pub mod logging;

pub mod download;
pub mod error;
pub mod fetch;
pub mod file_log;
pub mod http;
pub mod probe;
pub mod resume;
pub mod retry;
pub mod target;
pub mod transfer;

pub use download::{download, DownloadOptions, DownloadRequest, DownloadResult};
pub use error::DownloadError;
pub use transfer::ProgressSink;
