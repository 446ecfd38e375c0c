//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a single static body to GET requests, honouring `Range: bytes=X-`
//! when enabled, and records every request so tests can assert on how many
//! were made and which ranges were asked for.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone, Copy)]
pub struct RangeServerOptions {
    /// If false, GET ignores Range and always returns 200 with the full body.
    pub support_ranges: bool,
    /// If false, omit `Accept-Ranges: bytes` even if ranges work.
    pub advertise_ranges: bool,
    /// `Content-Type` sent with every response.
    pub content_type: Option<&'static str>,
    /// Answer every request with this status and an empty body.
    pub fail_status: Option<u16>,
    /// After this many requests, serve only the first half of the body
    /// (with a matching Content-Length), as if the resource shrank.
    pub shrink_after: Option<usize>,
    /// The request with this 0-based sequence number declares the full
    /// length but sends only half of it before closing the connection.
    pub cut_request: Option<usize>,
    /// Answer every range request with a 206 starting at this byte instead
    /// of the one asked for.
    pub misaligned_start: Option<u64>,
}

impl Default for RangeServerOptions {
    fn default() -> Self {
        Self {
            support_ranges: true,
            advertise_ranges: true,
            content_type: None,
            fail_status: None,
            shrink_after: None,
            cut_request: None,
            misaligned_start: None,
        }
    }
}

/// One request as the server saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    /// Raw `Range` header value, e.g. `bytes=100-`.
    pub range: Option<String>,
}

pub struct RangeServer {
    pub url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl RangeServer {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// URL with `path` appended to the server root.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.url, path.trim_start_matches('/'))
    }
}

/// Starts a server in a background thread serving `body` with default options.
pub fn start(body: Vec<u8>) -> RangeServer {
    start_with_options(body, RangeServerOptions::default())
}

/// Like `start` but allows customizing server behavior.
pub fn start_with_options(body: Vec<u8>, opts: RangeServerOptions) -> RangeServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    let requests = Arc::new(Mutex::new(Vec::new()));
    let served = Arc::new(AtomicUsize::new(0));
    let log = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let log = Arc::clone(&log);
            let seq = served.fetch_add(1, Ordering::SeqCst);
            thread::spawn(move || handle(stream, &body, opts, &log, seq));
        }
    });
    RangeServer {
        url: format!("http://127.0.0.1:{}/", port),
        requests,
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    body: &[u8],
    opts: RangeServerOptions,
    log: &Mutex<Vec<RecordedRequest>>,
    seq: usize,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let (method, range) = parse_request(request);
    log.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        range: range.clone(),
    });

    if let Some(code) = opts.fail_status {
        let response = format!(
            "HTTP/1.1 {} Test Failure\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            code
        );
        let _ = stream.write_all(response.as_bytes());
        return;
    }
    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\n\r\n");
        return;
    }

    let body = match opts.shrink_after {
        Some(after) if seq >= after => &body[..body.len() / 2],
        _ => body,
    };
    let total = body.len() as u64;
    let start = if opts.support_ranges {
        range
            .as_deref()
            .and_then(range_start)
            .map(|asked| opts.misaligned_start.unwrap_or(asked))
    } else {
        None
    };

    let mut headers = String::new();
    if opts.advertise_ranges {
        headers.push_str("Accept-Ranges: bytes\r\n");
    }
    if let Some(ct) = opts.content_type {
        headers.push_str(&format!("Content-Type: {}\r\n", ct));
    }

    let (status, slice) = match start {
        Some(start) if start >= total => {
            headers.push_str(&format!("Content-Range: bytes */{}\r\n", total));
            ("416 Range Not Satisfiable", &body[0..0])
        }
        Some(start) => {
            headers.push_str(&format!(
                "Content-Range: bytes {}-{}/{}\r\n",
                start,
                total - 1,
                total
            ));
            ("206 Partial Content", &body[start as usize..])
        }
        None => ("200 OK", body),
    };
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n",
        status,
        slice.len(),
        headers
    );
    let _ = stream.write_all(response.as_bytes());
    if opts.cut_request == Some(seq) {
        let _ = stream.write_all(&slice[..slice.len() / 2]);
        return;
    }
    let _ = stream.write_all(slice);
}

/// Returns (method, raw Range header value).
fn parse_request(request: &str) -> (&str, Option<String>) {
    let mut method = "";
    let mut range = None;
    for line in request.lines() {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if method.is_empty() {
            method = line.split_whitespace().next().unwrap_or("");
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("range") {
                range = Some(value.trim().to_string());
            }
        }
    }
    (method, range)
}

/// Start offset from `bytes=X-` or `bytes=X-Y`.
fn range_start(value: &str) -> Option<u64> {
    let spec = value.strip_prefix("bytes=")?;
    let (start, _) = spec.split_once('-')?;
    start.trim().parse().ok()
}
