//! Transfer execution: the actual (ranged) GET streamed into the target file.

mod progress;

pub use progress::ProgressSink;

use crate::error::DownloadError;
use crate::http::{self, CurlOptions};
use std::cell::Cell;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Bytes moved by one transfer and the resulting size on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferOutcome {
    pub bytes_written: u64,
    pub final_size: u64,
}

/// Downloads `url` into `path`, continuing from `resume_from` when set.
///
/// `Some(offset)` sends `Range: bytes=offset-` and appends; the file is
/// created if absent. If the server ignores the range and answers `200`, or
/// answers `206` from byte zero, the file is truncated and rewritten from the
/// start. A `206` starting anywhere else is a `RangeMismatch` and writes
/// nothing. Any non-2xx status fails without touching the file. When
/// `expected_len` is known the final on-disk size must equal it; on mismatch
/// the partial file is kept for a later resume.
pub fn execute(
    url: &str,
    path: &Path,
    resume_from: Option<u64>,
    expected_len: Option<u64>,
    opts: &CurlOptions,
    progress: Option<&dyn ProgressSink>,
) -> Result<TransferOutcome, DownloadError> {
    let offset = resume_from.unwrap_or(0);
    let status = Cell::new(0u32);
    let served_from: Cell<Option<u64>> = Cell::new(None);
    let mut misaligned: Option<u64> = None;
    let mut file: Option<File> = None;
    let mut io_error: Option<io::Error> = None;
    let mut bytes_written = 0u64;

    let mut easy = http::easy_get(url, &HashMap::new(), opts).map_err(DownloadError::request(url))?;
    if let Some(offset) = resume_from {
        // libcurl sends this as "Range: bytes=<offset>-".
        easy.range(&format!("{}-", offset))
            .map_err(DownloadError::request(url))?;
    }

    tracing::debug!(url, path = %path.display(), ?resume_from, "starting transfer");
    if let Some(p) = progress {
        p.start(expected_len.map(|len| len.saturating_sub(offset)));
    }

    let performed = {
        let mut transfer = easy.transfer();
        transfer
            .header_function(|line| {
                if let Some(code) = http::parse_status_line(line) {
                    status.set(code);
                    served_from.set(None);
                } else if let Some(start) = http::parse_content_range_start(line) {
                    served_from.set(Some(start));
                }
                true
            })
            .map_err(DownloadError::request(url))?;
        transfer
            .write_function(|data| {
                let code = status.get();
                if !(200..300).contains(&code) {
                    // Error body: drain it, the status check below fails the attempt.
                    return Ok(data.len());
                }
                if file.is_none() {
                    let restart = match (resume_from, code, served_from.get()) {
                        (Some(_), 200, _) => true,
                        (Some(requested), 206, Some(0)) if requested > 0 => true,
                        (Some(requested), 206, Some(start)) if start != requested => {
                            misaligned = Some(start);
                            return Ok(0);
                        }
                        _ => false,
                    };
                    match open_for_write(path, restart) {
                        Ok(f) => file = Some(f),
                        Err(e) => {
                            io_error = Some(e);
                            return Ok(0);
                        }
                    }
                }
                let Some(f) = file.as_mut() else {
                    return Ok(0);
                };
                if let Err(e) = f.write_all(data) {
                    io_error = Some(e);
                    return Ok(0);
                }
                bytes_written += data.len() as u64;
                if let Some(p) = progress {
                    p.advance(data.len() as u64);
                }
                Ok(data.len())
            })
            .map_err(DownloadError::request(url))?;
        transfer.perform()
    };

    let opened = file.is_some();
    drop(file);
    if let Some(p) = progress {
        p.finish();
    }

    if let Err(e) = performed {
        if e.is_write_error() {
            if let Some(served) = misaligned {
                tracing::warn!(url, requested = offset, served, "range answered from the wrong offset");
                return Err(DownloadError::RangeMismatch {
                    url: url.to_string(),
                    requested: offset,
                    served,
                });
            }
            if let Some(io_err) = io_error {
                return Err(DownloadError::filesystem(path)(io_err));
            }
        }
        if e.is_recv_error() || e.is_partial_file() {
            return Err(DownloadError::Read {
                url: url.to_string(),
                source: e,
            });
        }
        return Err(DownloadError::request(url)(e));
    }

    let code = easy.response_code().map_err(DownloadError::request(url))?;
    if !(200..300).contains(&code) {
        return Err(DownloadError::HttpStatus {
            url: url.to_string(),
            code,
        });
    }

    if !opened {
        // Empty body: the file must still exist afterwards.
        open_for_write(path, resume_from.is_some() && code == 200)
            .map_err(DownloadError::filesystem(path))?;
    }

    let final_size = fs::metadata(path)
        .map_err(DownloadError::filesystem(path))?
        .len();
    let outcome = TransferOutcome {
        bytes_written,
        final_size,
    };
    validate_size(&outcome, expected_len)?;

    tracing::info!(
        path = %path.display(),
        bytes_written,
        final_size,
        "transfer complete"
    );
    Ok(outcome)
}

/// Fails with `SizeMismatch` when the final size differs from a known length.
pub fn validate_size(outcome: &TransferOutcome, expected_len: Option<u64>) -> Result<(), DownloadError> {
    match expected_len {
        Some(expected) if expected != outcome.final_size => Err(DownloadError::SizeMismatch {
            expected,
            actual: outcome.final_size,
        }),
        _ => Ok(()),
    }
}

/// Opens the target for appending (creating it if absent), or truncates it
/// when a ranged request was answered with the full body.
fn open_for_write(path: &Path, restart: bool) -> io::Result<File> {
    if restart {
        tracing::warn!(path = %path.display(), "range request not honoured, restarting from zero");
        return OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path);
    }
    OpenOptions::new().append(true).create(true).open(path)
}
