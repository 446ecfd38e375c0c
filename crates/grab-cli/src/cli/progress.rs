//! Terminal progress bar fed by the download's byte counts.

use grab_core::ProgressSink;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const PB_STYLE: &str =
    "[{elapsed_precise}] {wide_bar:.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";

const SPINNER_STYLE: &str = "{spinner:.blue} [{elapsed_precise}] {bytes} ({bytes_per_sec})";

const PB_CHARS: &str = "█▓▒░  ";

/// Hidden until the transfer starts, so a skipped (already complete)
/// download draws nothing.
pub struct BarSink {
    pb: ProgressBar,
}

impl BarSink {
    pub fn new() -> Self {
        Self {
            pb: ProgressBar::hidden(),
        }
    }
}

impl ProgressSink for BarSink {
    fn start(&self, total: Option<u64>) {
        // One sink serves every retry attempt; each starts counting afresh.
        self.pb.reset();
        let style = match total {
            Some(len) => {
                self.pb.set_length(len);
                ProgressStyle::with_template(PB_STYLE).map(|s| s.progress_chars(PB_CHARS))
            }
            None => ProgressStyle::with_template(SPINNER_STYLE),
        };
        if let Ok(style) = style {
            self.pb.set_style(style);
        }
        self.pb.set_draw_target(ProgressDrawTarget::stderr());
    }

    fn advance(&self, bytes: u64) {
        self.pb.inc(bytes);
    }

    fn finish(&self) {
        self.pb.finish();
    }
}
