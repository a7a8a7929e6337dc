// src/cancel.rs
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Shared stop signal for a run: an explicit flag plus an optional deadline.
/// Checked before each pair starts; work already in flight is left to finish.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token that trips on its own once `after` has elapsed.
    pub fn with_timeout(after: Duration) -> Self {
        Self { flag: Arc::default(), deadline: Some(Instant::now() + after) }
    }

    /// `with_timeout` when a limit is given, a plain token otherwise.
    pub fn from_limit(limit: Option<Duration>) -> Self {
        limit.map_or_else(Self::new, Self::with_timeout)
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}
