//! Integration tests for the one-shot fetch helper.

mod common;

use common::range_server::{self, RangeServerOptions};
use grab_core::fetch;
use grab_core::http::CurlOptions;
use grab_core::DownloadError;
use std::collections::HashMap;

#[test]
fn get_returns_full_body_without_touching_disk() {
    let body = b"hello from the test server".to_vec();
    let server = range_server::start(body.clone());

    let got = fetch::get(&server.url, &HashMap::new(), &CurlOptions::default()).unwrap();

    assert_eq!(got, body);
    assert_eq!(server.request_count(), 1);
    assert!(server.requests()[0].range.is_none());
}

#[test]
fn get_sends_caller_headers() {
    let server = range_server::start(b"0123456789".to_vec());
    let mut headers = HashMap::new();
    headers.insert("Range".to_string(), "bytes=4-".to_string());

    // A 206 is not a 200: the plain fetcher rejects it.
    let r = fetch::get(&server.url, &headers, &CurlOptions::default());

    assert!(matches!(r, Err(DownloadError::HttpStatus { code: 206, .. })));
    assert_eq!(server.requests()[0].range.as_deref(), Some("bytes=4-"));
}

#[test]
fn get_non_200_is_http_status_error() {
    let server = range_server::start_with_options(
        Vec::new(),
        RangeServerOptions {
            fail_status: Some(403),
            ..RangeServerOptions::default()
        },
    );

    let r = fetch::get(&server.url, &HashMap::new(), &CurlOptions::default());

    assert!(matches!(r, Err(DownloadError::HttpStatus { code: 403, .. })));
}

#[test]
fn get_unreachable_host_is_request_error() {
    // Port 9 (discard) on localhost is closed in test environments.
    let r = fetch::get("http://127.0.0.1:9/", &HashMap::new(), &CurlOptions::default());
    assert!(matches!(r, Err(DownloadError::Request { .. })));
}
