//! One-shot GET: whole body into memory, no retry, no persistence.

use crate::error::DownloadError;
use crate::http::{self, CurlOptions};
use std::collections::HashMap;

/// Issues exactly one GET to `url` and returns the full body.
///
/// `headers` are layered over the defaults (browser `User-Agent`). Anything
/// other than `200 OK` is `HttpStatus`; a body that cannot be drained is
/// `Read`. Callers needing resilience should use [`crate::download`].
pub fn get(
    url: &str,
    headers: &HashMap<String, String>,
    opts: &CurlOptions,
) -> Result<Vec<u8>, DownloadError> {
    let mut body = Vec::new();
    let mut easy = http::easy_get(url, headers, opts).map_err(DownloadError::request(url))?;

    let performed = {
        let mut transfer = easy.transfer();
        transfer
            .write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })
            .map_err(DownloadError::request(url))?;
        transfer.perform()
    };

    if let Err(e) = performed {
        if e.is_recv_error() || e.is_read_error() || e.is_partial_file() {
            return Err(DownloadError::Read {
                url: url.to_string(),
                source: e,
            });
        }
        return Err(DownloadError::request(url)(e));
    }

    let code = easy.response_code().map_err(DownloadError::request(url))?;
    if code != 200 {
        return Err(DownloadError::HttpStatus {
            url: url.to_string(),
            code,
        });
    }
    tracing::debug!(url, bytes = body.len(), "fetched");
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_url_is_request_error() {
        let r = get("not a url at all", &HashMap::new(), &CurlOptions::default());
        assert!(matches!(r, Err(DownloadError::Request { .. })));
    }
}
