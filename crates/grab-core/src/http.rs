//! Shared libcurl easy-handle setup for the probe, the ranged GET, and the
//! one-shot fetch.

use std::collections::HashMap;
use std::time::Duration;

/// Some servers reject requests without a browser-like agent.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; WOW64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/78.0.3904.108 Safari/537.36";

/// Upper bound for establishing the connection; the overall timeout still applies.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-request transport settings.
#[derive(Debug, Clone, Copy)]
pub struct CurlOptions {
    /// Whole-request timeout (connect + transfer).
    pub timeout: Duration,
    /// Skip certificate chain and host name verification.
    pub insecure_tls: bool,
}

impl Default for CurlOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300),
            insecure_tls: false,
        }
    }
}

/// Builds an easy handle for a GET to `url`: redirects followed, browser
/// user agent, caller headers layered over the defaults.
pub(crate) fn easy_get(
    url: &str,
    custom_headers: &HashMap<String, String>,
    opts: &CurlOptions,
) -> Result<curl::easy::Easy, curl::Error> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.get(true)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.useragent(BROWSER_USER_AGENT)?;
    easy.connect_timeout(CONNECT_TIMEOUT.min(opts.timeout))?;
    easy.timeout(opts.timeout)?;

    if opts.insecure_tls {
        tracing::warn!(url, "TLS certificate verification disabled");
        easy.ssl_verify_peer(false)?;
        easy.ssl_verify_host(false)?;
    }

    // A "User-Agent: ..." entry here overrides the default set above.
    let mut list = curl::easy::List::new();
    for (k, v) in custom_headers {
        list.append(&format!("{}: {}", k.trim(), v.trim()))?;
    }
    if !custom_headers.is_empty() {
        easy.http_headers(list)?;
    }

    Ok(easy)
}

/// Status code from an HTTP status line (`HTTP/1.1 206 Partial Content`).
pub(crate) fn parse_status_line(line: &[u8]) -> Option<u32> {
    let line = std::str::from_utf8(line).ok()?;
    if !line.starts_with("HTTP/") {
        return None;
    }
    line.split_whitespace().nth(1)?.parse().ok()
}

/// First byte of a `Content-Range: bytes a-b/total` header line.
pub(crate) fn parse_content_range_start(line: &[u8]) -> Option<u64> {
    let line = std::str::from_utf8(line).ok()?;
    let (name, value) = line.split_once(':')?;
    if !name.trim().eq_ignore_ascii_case("content-range") {
        return None;
    }
    let range = value.trim().strip_prefix("bytes")?.trim_start();
    let (start, _) = range.split_once('-')?;
    start.trim().parse().ok()
}
