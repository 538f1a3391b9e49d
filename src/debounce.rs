//! Trailing-edge debouncing on a tokio runtime.
//!
//! Every call to [`Debouncer::debounce`] replaces the pending action and
//! restarts the interval, so a burst of calls collapses into one execution
//! of the last action, `interval` after the last call.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

pub struct Debouncer {
    interval: Duration,
    runtime: Handle,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(interval: Duration, runtime: Handle) -> Self {
        Self {
            interval,
            runtime,
            pending: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Schedule `action` to run after the interval, cancelling any action
    /// scheduled earlier.
    pub fn debounce<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let interval = self.interval;
        let mut pending = self.pending.lock();
        if let Some(previous) = pending.take() {
            previous.abort();
        }
        *pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep(interval).await;
            action();
        }));
    }

    /// Cancel the pending action, if any.
    pub fn cancel(&self) {
        if let Some(previous) = self.pending.lock().take() {
            previous.abort();
        }
    }

    /// Whether an action is scheduled and has not run yet.
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
