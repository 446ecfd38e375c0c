//! Parse HTTP response header lines into ProbeResult.

use super::ProbeResult;

/// Parse collected header lines into ProbeResult.
///
/// Header blocks from redirect hops are dropped: every status line starts a
/// fresh result, so only the final response is reported.
pub(crate) fn parse_headers(lines: &[String]) -> ProbeResult {
    let mut content_length = None;
    let mut range_total = None;
    let mut content_range = false;
    let mut accept_ranges = false;
    let mut content_type = None;

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            content_length = None;
            range_total = None;
            content_range = false;
            accept_ranges = false;
            content_type = None;
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.parse::<u64>().ok();
            } else if name.eq_ignore_ascii_case("accept-ranges") {
                accept_ranges = value.eq_ignore_ascii_case("bytes");
            } else if name.eq_ignore_ascii_case("content-range") {
                content_range = !value.is_empty();
                range_total = parse_content_range_total(value);
            } else if name.eq_ignore_ascii_case("content-type") && !value.is_empty() {
                content_type = Some(value.to_string());
            }
        }
    }

    ProbeResult {
        supports_ranges: content_range || accept_ranges,
        // A 206 declares the slice length; the total lives in Content-Range.
        content_length: range_total.or(content_length),
        content_type,
    }
}

/// Total size from `bytes 0-99/1234`; `None` for `*` or malformed values.
fn parse_content_range_total(value: &str) -> Option<u64> {
    let (_, total) = value.rsplit_once('/')?;
    total.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn content_length_and_accept_ranges() {
        let r = parse_headers(&lines(&[
            "HTTP/1.1 200 OK",
            "Content-Length: 12345",
            "Accept-Ranges: bytes",
        ]));
        assert_eq!(r.content_length, Some(12345));
        assert!(r.supports_ranges);
        assert!(r.content_type.is_none());
    }

    #[test]
    fn accept_ranges_none_means_no_support() {
        let r = parse_headers(&lines(&["Content-Length: 999", "Accept-Ranges: none"]));
        assert_eq!(r.content_length, Some(999));
        assert!(!r.supports_ranges);
    }

    #[test]
    fn content_range_alone_signals_support() {
        let r = parse_headers(&lines(&[
            "HTTP/1.1 206 Partial Content",
            "Content-Length: 100",
            "Content-Range: bytes 0-99/5000",
        ]));
        assert!(r.supports_ranges);
        assert_eq!(r.content_length, Some(5000));
    }

    #[test]
    fn missing_length_is_unknown() {
        let r = parse_headers(&lines(&["HTTP/1.1 200 OK", "Content-Type: text/html"]));
        assert_eq!(r.content_length, None);
        assert_eq!(r.content_type.as_deref(), Some("text/html"));
    }

    #[test]
    fn redirect_headers_are_discarded() {
        let r = parse_headers(&lines(&[
            "HTTP/1.1 302 Found",
            "Content-Length: 0",
            "Accept-Ranges: bytes",
            "Location: /real",
            "",
            "HTTP/1.1 200 OK",
            "Content-Length: 42",
            "Content-Type: image/png",
        ]));
        assert_eq!(r.content_length, Some(42));
        assert!(!r.supports_ranges);
        assert_eq!(r.content_type.as_deref(), Some("image/png"));
    }
}
