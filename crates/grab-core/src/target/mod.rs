//! Target path resolution.
//!
//! Turns the caller's target (a file path with an extension, or a
//! directory) into a filename, extension, and containing directory, and
//! fills in a missing extension from the probed content type.

mod mime;
mod name;

pub use mime::extension_for_mime;

use crate::error::DownloadError;
use std::fs;
use std::path::{Path, PathBuf};

/// Where a download lands. Derived fresh on every attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Base name without the caller-supplied extension, or with an inferred
    /// extension appended once [`ResolvedTarget::apply_content_type`] found one.
    pub filename: String,
    /// Containing directory.
    pub directory: PathBuf,
    /// `directory` joined with the on-disk file name.
    pub full_path: PathBuf,
    /// Extension without the dot; empty until known.
    pub extension: String,
    stem: String,
}

impl ResolvedTarget {
    /// Resolves `target` for a download of `url`.
    ///
    /// - `dir/name.ext`: filename `name`, extension `ext`, directory `dir`.
    /// - ends in `/` or names an existing directory: the target is the
    ///   directory, the name comes from the URL's last path segment
    ///   (falling back to `download`).
    /// - anything else: the text after the last `/` is the filename, the
    ///   text before it the directory. No `/` at all is `InvalidTarget`.
    pub fn resolve(target: &str, url: &str) -> Result<Self, DownloadError> {
        if target.is_empty() {
            return Err(DownloadError::InvalidTarget(target.to_string()));
        }
        let path = Path::new(target);

        if target.ends_with('/') || path.is_dir() {
            let directory = non_empty_dir(target.trim_end_matches('/'));
            let (stem, extension) = name::stem_and_extension(url);
            return Ok(Self::build(directory, stem, extension));
        }

        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();

        if !extension.is_empty() {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .ok_or_else(|| DownloadError::InvalidTarget(target.to_string()))?;
            let directory = match path.parent() {
                Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
                _ => PathBuf::from("."),
            };
            return Ok(Self::build(directory, stem, extension));
        }

        let (dir, stem) = target
            .rsplit_once('/')
            .ok_or_else(|| DownloadError::InvalidTarget(target.to_string()))?;
        Ok(Self::build(non_empty_dir(dir), stem.to_string(), String::new()))
    }

    fn build(directory: PathBuf, stem: String, extension: String) -> Self {
        let full_path = directory.join(file_name(&stem, &extension));
        Self {
            filename: stem.clone(),
            directory,
            full_path,
            extension,
            stem,
        }
    }

    /// Creates the containing directory (recursively) if it is missing.
    pub fn ensure_directory(&self) -> Result<(), DownloadError> {
        if self.directory.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(&self.directory).map_err(DownloadError::filesystem(&self.directory))?;
        tracing::debug!(dir = %self.directory.display(), "created target directory");
        Ok(())
    }

    /// Infers the extension from `content_type` when none is known yet.
    ///
    /// Returns true if an extension was added; `filename` and `full_path`
    /// then include it.
    pub fn apply_content_type(&mut self, content_type: Option<&str>) -> bool {
        if !self.extension.is_empty() {
            return false;
        }
        let Some(ext) = content_type.and_then(extension_for_mime) else {
            return false;
        };
        self.extension = ext.to_string();
        self.filename = file_name(&self.stem, &self.extension);
        self.full_path = self.directory.join(&self.filename);
        tracing::debug!(path = %self.full_path.display(), "inferred extension from content type");
        true
    }
}

fn file_name(stem: &str, extension: &str) -> String {
    if extension.is_empty() {
        stem.to_string()
    } else {
        format!("{}.{}", stem, extension)
    }
}

fn non_empty_dir(dir: &str) -> PathBuf {
    if dir.is_empty() {
        PathBuf::from("/")
    } else {
        PathBuf::from(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://example.com/files/report.pdf";

    #[test]
    fn full_file_path() {
        let t = ResolvedTarget::resolve("/data/out/photo.png", URL).unwrap();
        assert_eq!(t.filename, "photo");
        assert_eq!(t.extension, "png");
        assert_eq!(t.directory, PathBuf::from("/data/out"));
        assert_eq!(t.full_path, PathBuf::from("/data/out/photo.png"));
    }

    #[test]
    fn relative_file_without_directory() {
        let t = ResolvedTarget::resolve("photo.png", URL).unwrap();
        assert_eq!(t.directory, PathBuf::from("."));
        assert_eq!(t.full_path, PathBuf::from("./photo.png"));
    }

    #[test]
    fn no_extension_splits_on_last_separator() {
        let t = ResolvedTarget::resolve("/nonexistent-grab-dir/data/blob", URL).unwrap();
        assert_eq!(t.filename, "blob");
        assert_eq!(t.extension, "");
        assert_eq!(t.directory, PathBuf::from("/nonexistent-grab-dir/data"));
        assert_eq!(t.full_path, PathBuf::from("/nonexistent-grab-dir/data/blob"));
    }

    #[test]
    fn no_extension_and_no_separator_is_invalid() {
        let r = ResolvedTarget::resolve("nonexistent-grab-blob", URL);
        assert!(matches!(r, Err(DownloadError::InvalidTarget(_))));
        assert!(matches!(
            ResolvedTarget::resolve("", URL),
            Err(DownloadError::InvalidTarget(_))
        ));
    }

    #[test]
    fn trailing_slash_takes_name_from_url() {
        let t = ResolvedTarget::resolve("/nonexistent-grab-dir/downloads/", URL).unwrap();
        assert_eq!(t.directory, PathBuf::from("/nonexistent-grab-dir/downloads"));
        assert_eq!(t.filename, "report");
        assert_eq!(t.extension, "pdf");
        assert_eq!(
            t.full_path,
            PathBuf::from("/nonexistent-grab-dir/downloads/report.pdf")
        );
    }

    #[test]
    fn existing_directory_without_slash() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().to_str().unwrap();
        let t = ResolvedTarget::resolve(target, "https://example.com/").unwrap();
        assert_eq!(t.directory, dir.path());
        assert_eq!(t.filename, "download");
        assert_eq!(t.full_path, dir.path().join("download"));
    }

    #[test]
    fn content_type_adds_extension() {
        let dir = tempfile::tempdir().unwrap();
        let mut t = ResolvedTarget::resolve(dir.path().to_str().unwrap(), "https://example.com/")
            .unwrap();
        assert!(t.apply_content_type(Some("image/png")));
        assert_eq!(t.extension, "png");
        assert_eq!(t.filename, "download.png");
        assert_eq!(t.full_path, dir.path().join("download.png"));
        assert!(t.full_path.starts_with(dir.path()));
    }

    #[test]
    fn content_type_does_not_override_known_extension() {
        let mut t = ResolvedTarget::resolve("/tmp/x/photo.jpeg", URL).unwrap();
        assert!(!t.apply_content_type(Some("image/png")));
        assert_eq!(t.full_path, PathBuf::from("/tmp/x/photo.jpeg"));
    }

    #[test]
    fn unknown_content_type_leaves_no_extension() {
        let mut t = ResolvedTarget::resolve("/tmp/x/blob", URL).unwrap();
        assert!(!t.apply_content_type(Some("application/octet-stream")));
        assert!(!t.apply_content_type(None));
        assert_eq!(t.full_path, PathBuf::from("/tmp/x/blob"));
    }

    #[test]
    fn ensure_directory_creates_nested() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        let target = format!("{}/file.bin", nested.display());
        let t = ResolvedTarget::resolve(&target, URL).unwrap();
        t.ensure_directory().unwrap();
        assert!(nested.is_dir());
        t.ensure_directory().unwrap();
    }
}
