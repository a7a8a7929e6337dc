// src/progress.rs
use std::path::Path;

use crate::error::SkipReason;
use crate::model::VenueDateKey;

/// Progress reporting for a fetch run.
/// Frontends (CLI/bot) implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the number of (venue, date) pairs.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One pair produced an artifact.
    fn item_done(&mut self, _key: &VenueDateKey, _path: &Path) {}

    /// One pair was skipped.
    fn item_failed(&mut self, _key: &VenueDateKey, _reason: &SkipReason) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// Sends every event to the log.
#[derive(Default)]
pub struct TraceProgress {
    total: usize,
    seen: usize,
}

impl Progress for TraceProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        logf!("Checking {total} venue/date pages");
    }

    fn log(&mut self, msg: &str) {
        logf!("{msg}");
    }

    fn item_done(&mut self, key: &VenueDateKey, path: &Path) {
        self.seen += 1;
        logf!("[{}/{}] {key}: saved {}", self.seen, self.total, path.display());
    }

    fn item_failed(&mut self, key: &VenueDateKey, reason: &SkipReason) {
        self.seen += 1;
        if reason.is_no_data() {
            logf!("[{}/{}] {key}: {reason}", self.seen, self.total);
        } else {
            logw!("[{}/{}] {key}: skipped: {reason}", self.seen, self.total);
        }
    }

    fn finish(&mut self) {
        logf!("Finished {} pages in {}", self.seen, crate::log::elapsed());
    }
}
