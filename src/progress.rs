// src/progress.rs
use std::path::Path;

/// Progress reporting for a harvest run.
/// Frontends implement this to surface status to users; every hook is optional.
pub trait Progress {
    /// Called once with the number of configuration rows.
    fn begin(&mut self, _rows: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// A page arrived for `row`; `fetched` is the running total.
    fn page_fetched(&mut self, _row: usize, _fetched: usize, _expected: u64) {}

    fn row_done(&mut self, _row: usize, _records: usize, _path: &Path) {}

    /// The row was abandoned and the run carries on.
    fn row_failed(&mut self, _row: usize, _msg: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
