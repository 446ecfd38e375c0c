//! Resumable download: resolve, probe, plan, transfer, validate, and retry
//! the whole sequence on failure.

use crate::error::DownloadError;
use crate::http::CurlOptions;
use crate::probe;
use crate::resume::{self, ResumePlan};
use crate::retry::{run_with_retry, RetryPolicy};
use crate::target::ResolvedTarget;
use crate::transfer::{self, ProgressSink};
use std::path::PathBuf;
use std::time::Duration;

/// Tunables for one [`download`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
    /// Extra full attempts after the first failure. Default 0.
    pub retry_budget: u32,
    /// Per-attempt request timeout in seconds. Default 300.
    pub timeout_secs: u64,
    /// Forward byte counts to the progress sink. Default false.
    pub progress: bool,
    /// Skip TLS certificate verification. Default false.
    pub insecure_tls: bool,
    /// Delay before the first retry, doubled for each later one. Default zero.
    pub retry_delay: Duration,
    /// Cap on the retry delay. Default 30s.
    pub max_retry_delay: Duration,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            retry_budget: 0,
            timeout_secs: 300,
            progress: false,
            insecure_tls: false,
            retry_delay: Duration::ZERO,
            max_retry_delay: Duration::from_secs(30),
        }
    }
}

impl DownloadOptions {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            retry_budget: self.retry_budget,
            base_delay: self.retry_delay,
            max_delay: self.max_retry_delay,
        }
    }

    pub fn curl_options(&self) -> CurlOptions {
        CurlOptions {
            // Zero would mean "no timeout" to libcurl.
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
            insecure_tls: self.insecure_tls,
        }
    }
}

/// What to fetch and where to put it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    /// A file path with an extension, or a directory.
    pub target: String,
    pub options: DownloadOptions,
}

impl DownloadRequest {
    pub fn new(url: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            target: target.into(),
            options: DownloadOptions::default(),
        }
    }

    pub fn with_options(mut self, options: DownloadOptions) -> Self {
        self.options = options;
        self
    }
}

/// Where the completed file is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadResult {
    pub filename: String,
    pub directory: PathBuf,
    pub full_path: PathBuf,
}

impl From<ResolvedTarget> for DownloadResult {
    fn from(t: ResolvedTarget) -> Self {
        Self {
            filename: t.filename,
            directory: t.directory,
            full_path: t.full_path,
        }
    }
}

/// Downloads `request.url` to `request.target`, resuming a partial file when
/// the server allows it.
///
/// Every attempt recomputes resolution and probing from the original request.
/// At most `retry_budget + 1` attempts run; an invalid target is never
/// retried. On exhaustion the last error is returned unchanged. `progress` is
/// only used when `request.options.progress` is set.
pub fn download(
    request: &DownloadRequest,
    progress: Option<&dyn ProgressSink>,
) -> Result<DownloadResult, DownloadError> {
    let policy = request.options.retry_policy();
    let progress = progress.filter(|_| request.options.progress);

    run_with_retry(&policy, |attempt| {
        tracing::debug!(url = %request.url, target = %request.target, attempt, "download attempt");
        attempt_once(request, progress)
    })
}

/// One full pass: resolve, probe, plan, then transfer unless already complete.
fn attempt_once(
    request: &DownloadRequest,
    progress: Option<&dyn ProgressSink>,
) -> Result<DownloadResult, DownloadError> {
    let url = request.url.as_str();
    let curl = request.options.curl_options();

    let mut target = ResolvedTarget::resolve(&request.target, url)?;
    target.ensure_directory()?;

    let probe = probe::probe(url, &curl)?;
    target.apply_content_type(probe.content_type.as_deref());

    let existing = resume::local_size(&target.full_path)?;
    let plan = resume::plan(existing, &probe);
    tracing::debug!(path = %target.full_path.display(), ?existing, ?plan, "resume plan");
    resume::apply(&plan, &target.full_path)?;

    if plan == ResumePlan::Complete {
        tracing::info!(path = %target.full_path.display(), "already complete, skipping transfer");
        return Ok(target.into());
    }

    let resume_from = match plan {
        ResumePlan::Resume { offset } => Some(offset),
        _ => None,
    };
    transfer::execute(
        url,
        &target.full_path,
        resume_from,
        probe.content_length,
        &curl,
        progress,
    )?;
    Ok(target.into())
}
