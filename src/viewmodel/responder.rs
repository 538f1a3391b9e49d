use std::fmt;
use std::sync::Arc;

/// Callback a view model uses to emit outputs.
///
/// Cheap to clone and safe to call from any thread. Where the output goes
/// depends on who built it: the engine routes it through its delivery gate,
/// the test harness appends it to a buffer.
pub struct Responder<O> {
    sink: Arc<dyn Fn(O) + Send + Sync>,
}

impl<O: 'static> Responder<O> {
    pub fn new<F>(sink: F) -> Self
    where
        F: Fn(O) + Send + Sync + 'static,
    {
        Self {
            sink: Arc::new(sink),
        }
    }

    /// Responder that discards every output.
    pub fn noop() -> Self {
        Self::new(|_| {})
    }

    pub fn send(&self, output: O) {
        (self.sink)(output)
    }
}

impl<O> Clone for Responder<O> {
    fn clone(&self) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
        }
    }
}

impl<O> fmt::Debug for Responder<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Responder").finish_non_exhaustive()
    }
}
