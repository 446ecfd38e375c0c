//! Line-oriented file log.
//!
//! Appends `YYYY/MM/DD HH:MM:SS message` lines to a file, creating parent
//! directories as needed. Independent of the `tracing` setup in
//! [`crate::logging`]; this is for callers that want a plain append-only
//! record at a path of their choosing. Errors are returned, never turned into
//! a process exit here.

use chrono::Local;
use std::fmt::Display;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Used when the caller does not name a file.
pub const DEFAULT_LOG_PATH: &str = "storage/logs/log.log";

const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum FileLogError {
    /// The path has no file extension, so it is taken to be a directory.
    #[error("log file name must have an extension: {}", .0.display())]
    MissingExtension(PathBuf),

    #[error("log file {} failed: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// An open, append-only log file.
///
/// Opened with [`FileLog::open`], written with [`FileLog::record`], and
/// released with [`FileLog::close`] (or on drop).
#[derive(Debug)]
pub struct FileLog {
    path: PathBuf,
    file: File,
}

impl FileLog {
    /// Opens `path` for appending, creating it and its parent directories.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FileLogError> {
        let path = path.as_ref();
        if path.extension().map_or(true, |e| e.is_empty()) {
            return Err(FileLogError::MissingExtension(path.to_path_buf()));
        }
        let io_err = |source| FileLogError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(io_err)?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Opens [`DEFAULT_LOG_PATH`] relative to the working directory.
    pub fn open_default() -> Result<Self, FileLogError> {
        Self::open(DEFAULT_LOG_PATH)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one timestamped line.
    pub fn record(&mut self, msg: impl Display) -> Result<(), FileLogError> {
        let line = format!("{} {}\n", Local::now().format(TIMESTAMP_FORMAT), msg);
        self.file
            .write_all(line.as_bytes())
            .map_err(|source| FileLogError::Io {
                path: self.path.clone(),
                source,
            })
    }

    /// Flushes to disk and closes the file.
    pub fn close(self) -> Result<(), FileLogError> {
        self.file.sync_all().map_err(|source| FileLogError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Opens `path` (or the default), appends `msg`, and closes the file.
pub fn info(msg: impl Display, path: Option<&Path>) -> Result<(), FileLogError> {
    let mut log = match path {
        Some(p) => FileLog::open(p)?,
        None => FileLog::open_default()?,
    };
    log.record(msg)?;
    log.close()
}
