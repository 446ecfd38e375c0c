//! Error type shared by every stage of a download attempt.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a fetch, probe, transfer, or filesystem step.
///
/// The retry orchestrator classifies these (see [`crate::retry::classify`]);
/// only [`DownloadError::InvalidTarget`] is never retried.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The target is neither a file path with an extension nor a directory.
    #[error("invalid target {0:?}: expected a file path with an extension or a directory")]
    InvalidTarget(String),

    /// The request could not be built or sent (DNS, connect, TLS, timeout).
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: curl::Error,
    },

    /// The server answered with a status the caller does not accept.
    #[error("{url} returned HTTP {code}")]
    HttpStatus { url: String, code: u32 },

    /// The response body could not be fully drained.
    #[error("reading body from {url} failed: {source}")]
    Read {
        url: String,
        #[source]
        source: curl::Error,
    },

    /// Create, open, stat, write, or delete failed on the local filesystem.
    #[error("filesystem error on {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A `206` answer to `Range: bytes=requested-` started somewhere else.
    /// Nothing from it is written.
    #[error("{url} answered a range request for byte {requested} with bytes from {served}")]
    RangeMismatch {
        url: String,
        requested: u64,
        served: u64,
    },

    /// The file on disk does not have the size the server declared.
    /// The partial file is left in place for a later resume.
    #[error("size mismatch: expected {expected} bytes, found {actual} on disk")]
    SizeMismatch { expected: u64, actual: u64 },
}

impl DownloadError {
    pub(crate) fn request(url: &str) -> impl Fn(curl::Error) -> DownloadError + '_ {
        move |source| DownloadError::Request {
            url: url.to_string(),
            source,
        }
    }

    pub(crate) fn filesystem(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> DownloadError {
        let path = path.into();
        move |source| DownloadError::Filesystem { path, source }
    }

    /// HTTP status code carried by the error, if any.
    pub fn status_code(&self) -> Option<u32> {
        match self {
            DownloadError::HttpStatus { code, .. } => Some(*code),
            _ => None,
        }
    }
}
