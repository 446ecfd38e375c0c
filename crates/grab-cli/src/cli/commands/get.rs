//! `grab get <url> <target>` – resumable download with retry.

use anyhow::{Context, Result};
use grab_core::config::GrabConfig;
use grab_core::{DownloadOptions, DownloadRequest};

use crate::cli::progress::BarSink;

/// Command-line overrides for the configured download defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetArgs {
    pub retry: Option<u32>,
    pub timeout: Option<u64>,
    pub progress: bool,
    pub insecure: bool,
}

impl GetArgs {
    /// Config defaults with the flags given on the command line applied on top.
    pub fn options(&self, cfg: &GrabConfig) -> DownloadOptions {
        let mut opts = cfg.download_options();
        if let Some(retry) = self.retry {
            opts.retry_budget = retry;
        }
        if let Some(timeout) = self.timeout {
            opts.timeout_secs = timeout;
        }
        opts.progress |= self.progress;
        opts.insecure_tls |= self.insecure;
        opts
    }
}

pub async fn run_get(cfg: &GrabConfig, url: String, target: String, args: GetArgs) -> Result<()> {
    let request = DownloadRequest::new(url, target).with_options(args.options(cfg));
    tracing::info!(url = %request.url, target = %request.target, "download requested");

    let result = tokio::task::spawn_blocking(move || {
        let sink = BarSink::new();
        grab_core::download(&request, Some(&sink))
    })
    .await
    .context("download worker panicked")??;

    println!("{}", result.full_path.display());
    Ok(())
}
