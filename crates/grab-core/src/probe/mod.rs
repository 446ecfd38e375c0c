//! Range probing.
//!
//! Issues a GET against the resource, keeps only the response headers, and
//! aborts the body on the first chunk. Learns whether the server can resume
//! (`Accept-Ranges: bytes` or a `Content-Range` header), the declared total
//! size, and the content type used for extension inference.

mod parse;

use crate::error::DownloadError;
use crate::http::{self, CurlOptions};
use std::cell::Cell;
use std::collections::HashMap;
use std::str;

use parse::parse_headers;

/// What the server told us about the resource on this attempt.
///
/// Never cached across attempts: the server or the resource may have changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeResult {
    /// True if the server sent `Accept-Ranges: bytes` or any `Content-Range`.
    pub supports_ranges: bool,
    /// Declared total size in bytes; `None` when unknown.
    pub content_length: Option<u64>,
    /// `Content-Type` value, if present.
    pub content_type: Option<String>,
}

/// Probes `url` and returns parsed metadata.
///
/// Runs in the current thread; call from `spawn_blocking` if used from async code.
pub fn probe(url: &str, opts: &CurlOptions) -> Result<ProbeResult, DownloadError> {
    let mut headers: Vec<String> = Vec::new();
    let aborted = Cell::new(false);

    let mut easy = http::easy_get(url, &HashMap::new(), opts).map_err(DownloadError::request(url))?;

    let performed = {
        let mut transfer = easy.transfer();
        transfer
            .header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    headers.push(s.trim_end().to_string());
                }
                true
            })
            .map_err(DownloadError::request(url))?;
        // Only the headers matter: refuse the first body chunk so libcurl stops reading.
        transfer
            .write_function(|_| {
                aborted.set(true);
                Ok(0)
            })
            .map_err(DownloadError::request(url))?;
        transfer.perform()
    };

    match performed {
        Ok(()) => {}
        Err(e) if e.is_write_error() && aborted.get() => {}
        Err(e) => return Err(DownloadError::request(url)(e)),
    }

    let code = easy.response_code().map_err(DownloadError::request(url))?;
    if !(200..300).contains(&code) {
        return Err(DownloadError::HttpStatus {
            url: url.to_string(),
            code,
        });
    }

    let result = parse_headers(&headers);
    tracing::debug!(
        url,
        supports_ranges = result.supports_ranges,
        content_length = ?result.content_length,
        content_type = ?result.content_type,
        "probe complete"
    );
    Ok(result)
}
