//! Terminal progress bar for reporting passes.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use kpi_core::ProgressObserver;

/// Drives an indicatif bar (drawn on stderr) from pass progress reports.
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new(prefix: &str) -> Self {
        let bar = ProgressBar::new(100);
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner:.green} {prefix:.bold} [{elapsed_precise}] [{bar:32.cyan/blue}] {pos}% {msg}",
        ) {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.set_prefix(prefix.to_string());
        bar.enable_steady_tick(Duration::from_millis(250));
        Self { bar }
    }

    /// A bar that never draws.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressObserver for BarProgress {
    fn report(&self, percent: u8, message: &str) {
        self.bar.set_position(u64::from(percent));
        self.bar.set_message(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_moves_bar() {
        let progress = BarProgress::hidden();
        progress.report(40, "rows 40/100");
        assert_eq!(progress.position(), 40);
        progress.report(100, "done");
        assert_eq!(progress.position(), 100);
        progress.finish();
    }
}
