//! Delivery gate: the hop onto the main context, then view state suppression.

use std::fmt::Debug;
use std::sync::Arc;

use parking_lot::Mutex;

use super::main_context::MainContext;

/// Consumer callback plus the last view state it was handed.
///
/// Only touched from the main context, so the slot always matches what the
/// consumer last saw.
struct Sink<O> {
    callback: Box<dyn FnMut(O) + Send>,
    last_view_state: Option<O>,
}

impl<O> Sink<O>
where
    O: Debug + Clone + PartialEq,
{
    fn deliver(&mut self, output: O, carries_view_state: bool) {
        if carries_view_state {
            if self.last_view_state.as_ref() == Some(&output) {
                tracing::trace!(?output, "Unchanged view state suppressed");
                return;
            }
            self.last_view_state = Some(output.clone());
        }
        (self.callback)(output);
    }
}

pub(crate) struct DeliveryGate<O> {
    main: MainContext,
    sink: Arc<Mutex<Sink<O>>>,
}

impl<O> DeliveryGate<O>
where
    O: Debug + Clone + PartialEq + Send + 'static,
{
    pub fn new<F>(main: MainContext, callback: F) -> Self
    where
        F: FnMut(O) + Send + 'static,
    {
        Self {
            main,
            sink: Arc::new(Mutex::new(Sink {
                callback: Box::new(callback),
                last_view_state: None,
            })),
        }
    }

    /// Hand `output` to the consumer on the main context.
    ///
    /// Runs inline when already there. A view state equal to the last one
    /// delivered is dropped.
    pub fn deliver(&self, output: O, carries_view_state: bool) {
        let sink = Arc::clone(&self.sink);
        let main = self.main.clone();
        self.main.run(move || {
            if let Some(mut state) = sink.try_lock() {
                state.deliver(output, carries_view_state);
                return;
            }
            // Locked on the main context means we are inside the callback.
            main.post(move || sink.lock().deliver(output, carries_view_state));
        });
    }
}
