//! Classify HTTP status, curl errors, and download errors into retry kinds.

use crate::error::DownloadError;
use crate::retry::policy::ErrorKind;

/// Classify an HTTP status code for retry decisions.
pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        429 | 503 => ErrorKind::Throttled,
        _ => ErrorKind::Http(code),
    }
}

/// Classify a curl error for retry decisions.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_partial_file()
        || e.is_ssl_connect_error()
        || e.is_peer_failed_verification()
    {
        return ErrorKind::Connection;
    }
    ErrorKind::Other
}

/// Classify a download error into an [`ErrorKind`].
pub fn classify(e: &DownloadError) -> ErrorKind {
    match e {
        DownloadError::InvalidTarget(_) => ErrorKind::InvalidInput,
        DownloadError::Request { source, .. } | DownloadError::Read { source, .. } => {
            classify_curl_error(source)
        }
        DownloadError::HttpStatus { code, .. } => classify_http_status(*code),
        DownloadError::Filesystem { .. } => ErrorKind::Storage,
        DownloadError::RangeMismatch { .. } | DownloadError::SizeMismatch { .. } => {
            ErrorKind::Integrity
        }
    }
}
