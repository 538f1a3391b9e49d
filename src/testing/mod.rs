//! Test harness for view models.
//!
//! [`TestViewModelInterface`] drives a view model directly, without the
//! engine's filtering and debouncing, and blocks on each `send` until
//! `accept` has finished. Outputs collect in a buffer that tests drain with
//! [`expect`](TestViewModelInterface::expect):
//!
//! ```ignore
//! let tester = TestViewModelInterface::new(FooViewModel::new(product));
//! tester.expect(vec![Output::State(initial)]);
//! tester.send(Input::DidTapButton).expect(vec![Output::State(loaded)]);
//! tester.finish();
//! ```
//!
//! To exercise the engine's policies, build a real
//! [`ViewModelInterface`](crate::engine::ViewModelInterface) and poll its
//! outputs with [`TestWaiter`].
//!
//! Assertion failures panic, like `assert!`, so they fail the calling test.

mod harness;
mod waiter;

pub use harness::TestViewModelInterface;
pub use waiter::TestWaiter;
