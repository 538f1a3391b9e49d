use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::{Builder, Runtime};

use crate::config::HarnessConfig;
use crate::viewmodel::{Responder, ViewModel, ViewModelError};

use super::waiter::TestWaiter;

/// Drives a view model synchronously for tests.
///
/// Filtering and debouncing are not applied: every `send` reaches `accept`.
pub struct TestViewModelInterface<V: ViewModel> {
    view_model: Arc<V>,
    outputs: Arc<Mutex<Vec<V::Output>>>,
    runtime: Runtime,
    config: HarnessConfig,
}

impl<V: ViewModel> TestViewModelInterface<V> {
    /// # Panics
    /// If the harness runtime cannot be built.
    pub fn new(view_model: V) -> Self {
        Self::with_config(view_model, HarnessConfig::default())
    }

    /// # Panics
    /// If the harness runtime cannot be built.
    pub fn with_config(view_model: V, config: HarnessConfig) -> Self {
        // Multi-thread so work spawned by `accept` keeps running between sends.
        let runtime = Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("vm-test")
            .enable_all()
            .build()
            .expect("failed to build test runtime");

        let harness = Self {
            view_model: Arc::new(view_model),
            outputs: Arc::new(Mutex::new(Vec::new())),
            runtime,
            config,
        };

        harness.view_model.responder(harness.responder());
        harness.view_model.first(&harness.responder());
        harness
    }

    /// Send `input` and block until `accept` returns.
    ///
    /// # Panics
    /// If outputs of the previous `send` were not checked with
    /// [`expect`](Self::expect), or if `accept` outlives the configured
    /// timeout. Also panics when called from inside a tokio runtime (for
    /// example a `#[tokio::test]` body), since it blocks on the harness's
    /// own runtime. Drive the harness from a plain `#[test]`.
    #[track_caller]
    pub fn send(&self, input: V::Input) -> &Self {
        {
            let outputs = self.outputs.lock();
            assert!(
                outputs.is_empty(),
                "Untested outputs encountered from previous `send`: {:?}",
                *outputs
            );
        }

        let respond = self.responder();
        let timeout = self.config.timeout();
        let view_model = Arc::clone(&self.view_model);
        let accept_respond = respond.clone();
        let result = self.runtime.block_on(async move {
            tokio::time::timeout(timeout, view_model.accept(input, accept_respond)).await
        });

        match result {
            Err(_) => panic!("`accept` did not finish within {:?}", timeout),
            Ok(Ok(())) => {}
            Ok(Err(error)) if ViewModelError::is_ignore(&error) => {}
            Ok(Err(error)) => self.view_model.thrown_error(error, &respond),
        }
        self
    }

    /// Assert the buffered outputs equal `expected`, then clear the buffer.
    ///
    /// Waits up to the configured timeout for the first output to arrive.
    /// Outputs expected together must be emitted together. Expecting no
    /// outputs checks the buffer right away.
    #[track_caller]
    pub fn expect(&self, expected: Vec<V::Output>) {
        self.expect_within(expected, self.config.timeout());
    }

    #[track_caller]
    pub fn expect_within(&self, expected: Vec<V::Output>, wait: Duration) {
        if !expected.is_empty() {
            let waiter = TestWaiter::with_config("Expected outputs to be equal", &self.config);
            let outputs = Arc::clone(&self.outputs);
            waiter.poll(wait, move || !outputs.lock().is_empty());
        }

        let actual = std::mem::take(&mut *self.outputs.lock());
        assert_eq!(expected, actual);
    }

    /// Outputs received and not yet checked.
    pub fn outputs(&self) -> Vec<V::Output> {
        self.outputs.lock().clone()
    }

    pub fn view_model(&self) -> &V {
        &self.view_model
    }

    /// Fail if any output was never checked.
    #[track_caller]
    pub fn finish(&self) {
        let outputs = self.outputs.lock();
        assert!(
            outputs.is_empty(),
            "Untested outputs remaining at end of test. Call `expect` on previous `send`: {:?}",
            *outputs
        );
    }

    fn responder(&self) -> Responder<V::Output> {
        let outputs = Arc::clone(&self.outputs);
        Responder::new(move |output| outputs.lock().push(output))
    }
}
