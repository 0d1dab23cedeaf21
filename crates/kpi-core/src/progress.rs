//! Progress reporting for long passes.

use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

/// Receives progress updates during a pass.
///
/// Implementations must be cheap; the pass calls `report` at most once per
/// percentage point.
pub trait ProgressObserver: Sync {
    /// `percent` is in `0..=100`.
    fn report(&self, percent: u8, message: &str);
}

/// Observer that ignores every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn report(&self, _percent: u8, _message: &str) {}
}

impl<F> ProgressObserver for F
where
    F: Fn(u8, &str) + Sync,
{
    fn report(&self, percent: u8, message: &str) {
        self(percent, message);
    }
}

/// Throttled row counter shared by every shard of a pass.
pub(crate) struct ProgressTracker<'a> {
    observer: &'a dyn ProgressObserver,
    total: usize,
    processed: AtomicUsize,
    last_percent: AtomicU8,
}

impl<'a> ProgressTracker<'a> {
    pub(crate) fn new(observer: &'a dyn ProgressObserver, total: usize) -> Self {
        Self {
            observer,
            total,
            processed: AtomicUsize::new(0),
            last_percent: AtomicU8::new(0),
        }
    }

    /// Records `rows` processed rows and reports when the percentage moves.
    pub(crate) fn advance(&self, rows: usize) {
        let processed = self.processed.fetch_add(rows, Ordering::Relaxed) + rows;
        let percent = percent_of(processed, self.total);
        let previous = self.last_percent.fetch_max(percent, Ordering::Relaxed);
        if percent > previous {
            self.observer.report(percent, "processing rows");
        }
    }

    pub(crate) fn finish(&self, message: &str) {
        self.last_percent.store(100, Ordering::Relaxed);
        self.observer.report(100, message);
    }
}

fn percent_of(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let percent = done.min(total) * 100 / total;
    u8::try_from(percent).unwrap_or(100)
}
