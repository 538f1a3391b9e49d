use std::thread;
use std::time::{Duration, Instant};

use crate::config::HarnessConfig;

/// Blocks the calling test until a condition holds.
#[derive(Debug, Clone)]
pub struct TestWaiter {
    description: String,
    poll_interval: Duration,
}

impl TestWaiter {
    pub fn new(description: impl Into<String>) -> Self {
        Self::with_config(description, &HarnessConfig::default())
    }

    pub fn with_config(description: impl Into<String>, config: &HarnessConfig) -> Self {
        Self {
            description: description.into(),
            poll_interval: config.poll_interval(),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Wait a fixed duration before continuing.
    pub fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }

    /// Poll `finished` until it returns true or `timeout` elapses.
    ///
    /// The first check happens immediately. Returns whether the condition
    /// was met.
    pub fn poll<F>(&self, timeout: Duration, mut finished: F) -> bool
    where
        F: FnMut() -> bool,
    {
        let deadline = Instant::now() + timeout;
        loop {
            if finished() {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            thread::sleep(self.poll_interval.min(deadline - now));
        }
    }

    /// Like [`poll`](Self::poll), but fails the test on timeout.
    #[track_caller]
    pub fn wait_for<F>(&self, timeout: Duration, finished: F)
    where
        F: FnMut() -> bool,
    {
        if !self.poll(timeout, finished) {
            panic!(
                "Operation timed out after {:?} for: {}",
                timeout, self.description
            );
        }
    }
}

impl Default for TestWaiter {
    fn default() -> Self {
        Self::new("condition")
    }
}
