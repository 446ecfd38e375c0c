//! `grab fetch <url>` – one GET, body to stdout or a file.

use anyhow::{Context, Result};
use grab_core::config::GrabConfig;
use grab_core::fetch;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

/// Parses `Name: value` into a header pair.
pub fn parse_header(raw: &str) -> Result<(String, String)> {
    let (name, value) = raw
        .split_once(':')
        .with_context(|| format!("header must look like 'Name: value', got {raw:?}"))?;
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("header name is empty in {raw:?}");
    }
    Ok((name.to_string(), value.trim().to_string()))
}

pub async fn run_fetch(
    cfg: &GrabConfig,
    url: String,
    raw_headers: &[String],
    output: Option<&Path>,
) -> Result<()> {
    let headers = raw_headers
        .iter()
        .map(|h| parse_header(h))
        .collect::<Result<HashMap<_, _>>>()?;
    let curl = cfg.download_options().curl_options();

    let body = tokio::task::spawn_blocking(move || fetch::get(&url, &headers, &curl))
        .await
        .context("fetch worker panicked")??;

    match output {
        Some(path) => {
            std::fs::write(path, &body).with_context(|| format!("write {}", path.display()))?;
            println!("{} bytes written to {}", body.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&body)?;
            stdout.flush()?;
        }
    }
    Ok(())
}
