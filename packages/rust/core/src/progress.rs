//! Progress reporting for long-running pipelines.

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each document has been processed.
    fn file_checked(&self, path: &str, current: usize, total: usize);
    /// Called once the pipeline completes, with a one-line summary.
    fn done(&self, summary: &str);
}

/// No-op progress reporter for headless/test usage.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn phase(&self, _name: &str) {}
    fn file_checked(&self, _path: &str, _current: usize, _total: usize) {}
    fn done(&self, _summary: &str) {}
}
