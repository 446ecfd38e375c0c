//! CLI for the grab downloader.

mod commands;
mod progress;

use anyhow::Result;
use clap::{Parser, Subcommand};
use grab_core::config;
use std::path::PathBuf;

use commands::{run_fetch, run_get, run_log, GetArgs};

/// Top-level CLI for the grab downloader.
#[derive(Debug, Parser)]
#[command(name = "grab")]
#[command(about = "grab: resumable HTTP(S) downloader", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download a URL to a file or directory, resuming a partial file when possible.
    Get {
        /// Direct HTTP/HTTPS URL to download.
        url: String,
        /// File path with an extension, or a directory (trailing `/` or existing).
        target: String,
        /// Extra full attempts after a failure (default from config).
        #[arg(long, value_name = "N")]
        retry: Option<u32>,
        /// Per-attempt timeout in seconds (default from config).
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
        /// Show a progress bar.
        #[arg(long)]
        progress: bool,
        /// Skip TLS certificate verification.
        #[arg(long)]
        insecure: bool,
    },

    /// Fetch a URL once (no resume, no retry) and print or save the body.
    Fetch {
        /// URL to fetch.
        url: String,
        /// Extra request header, e.g. -H 'Accept: application/json'. Repeatable.
        #[arg(short = 'H', long = "header", value_name = "NAME: VALUE")]
        headers: Vec<String>,
        /// Write the body here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Append a timestamped line to a log file.
    Log {
        /// Message to record.
        message: String,
        /// Log file (default from config, else storage/logs/log.log).
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Get {
                url,
                target,
                retry,
                timeout,
                progress,
                insecure,
            } => {
                let args = GetArgs {
                    retry,
                    timeout,
                    progress,
                    insecure,
                };
                run_get(&cfg, url, target, args).await?
            }
            CliCommand::Fetch {
                url,
                headers,
                output,
            } => run_fetch(&cfg, url, &headers, output.as_deref()).await?,
            CliCommand::Log { message, path } => run_log(&cfg, &message, path.as_deref()),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
