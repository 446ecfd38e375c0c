//! Resume planning: decide whether an existing local file is complete, can be
//! continued with a range request, or must be discarded.

use crate::error::DownloadError;
use crate::probe::ProbeResult;
use std::fs;
use std::io;
use std::path::Path;

/// Outcome of comparing the local file with the probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumePlan {
    /// Local file already has the declared size; no transfer needed.
    Complete,
    /// Continue with `Range: bytes=offset-`, appending to the local file.
    Resume { offset: u64 },
    /// Download from offset 0; delete the existing file first if there is one.
    Fresh { discard_existing: bool },
}

impl ResumePlan {
    /// Byte offset the transfer starts from.
    pub fn offset(&self) -> u64 {
        match self {
            ResumePlan::Resume { offset } => *offset,
            ResumePlan::Complete | ResumePlan::Fresh { .. } => 0,
        }
    }
}

/// Decides what to do with a local file of `local_size` bytes (`None` = absent).
///
/// Appending is only safe when the server supports ranges and the local file
/// is strictly shorter than the declared length. Without range support, or
/// when the length is unknown or smaller than what we have, the file is
/// discarded.
pub fn plan(local_size: Option<u64>, probe: &ProbeResult) -> ResumePlan {
    let Some(size) = local_size else {
        return ResumePlan::Fresh {
            discard_existing: false,
        };
    };
    if !probe.supports_ranges {
        return ResumePlan::Fresh {
            discard_existing: true,
        };
    }
    match probe.content_length {
        Some(len) if size == len => ResumePlan::Complete,
        Some(len) if size < len => ResumePlan::Resume { offset: size },
        _ => ResumePlan::Fresh {
            discard_existing: true,
        },
    }
}

/// Size of the regular file at `path`, or `None` if nothing is there.
pub fn local_size(path: &Path) -> Result<Option<u64>, DownloadError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(Some(meta.len())),
        Ok(_) => Err(DownloadError::Filesystem {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::Other, "target exists and is not a regular file"),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(DownloadError::filesystem(path)(e)),
    }
}

/// Carries out the filesystem side of `plan`: removes a file that must not
/// be appended to. Deletion failure fails the attempt.
pub fn apply(plan: &ResumePlan, path: &Path) -> Result<(), DownloadError> {
    if let ResumePlan::Fresh {
        discard_existing: true,
    } = plan
    {
        match fs::remove_file(path) {
            Ok(()) => tracing::info!(path = %path.display(), "discarded stale partial file"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(DownloadError::filesystem(path)(e)),
        }
    }
    Ok(())
}
