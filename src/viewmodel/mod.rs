//! The ViewModel contract.
//!
//! A [`ViewModel`] holds the business logic behind one view. Consumers never
//! call it directly: a [`ViewModelInterface`](crate::engine::ViewModelInterface)
//! owns it and decides when an input reaches [`ViewModel::accept`] and when
//! an output reaches the consumer.
//!
//! # Data flow
//!
//! ```text
//! send(Input) ──→ policy gate ──→ accept ──→ Responder ──→ delivery gate ──→ consumer
//!                                              ↑
//!                         responder() ─────────┘  (standing channel, never gated)
//! ```
//!
//! The policy hooks ([`filter`](ViewModel::filter),
//! [`filter_all`](ViewModel::filter_all),
//! [`filter_all_inputs`](ViewModel::filter_all_inputs),
//! [`debounce`](ViewModel::debounce),
//! [`filter_outputs`](ViewModel::filter_outputs)) are queried exactly once,
//! when the interface is built. Every hook has a default, so a minimal view
//! model only implements `accept`.

mod error;
mod kind;
mod responder;

pub use error::ViewModelError;
pub use kind::{kind_of, Kind, KindSet};
pub use responder::Responder;

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;

/// Debounce declaration for one input kind.
///
/// Only the kind of `input` matters; its payload is ignored.
#[derive(Debug, Clone)]
pub struct Debounce<I> {
    pub input: I,
    pub interval: Duration,
}

impl<I> Debounce<I> {
    pub fn new(input: I, interval: Duration) -> Self {
        Self { input, interval }
    }
}

/// Business logic for one view.
///
/// Implementations keep their own state behind interior mutability: the
/// engine may run several `accept` calls concurrently for input kinds that
/// are not filtered.
#[async_trait]
pub trait ViewModel: Send + Sync + 'static {
    /// Events the consumer can send.
    type Input: Debug + Send + 'static;

    /// Events delivered back to the consumer.
    type Output: Debug + Clone + PartialEq + Send + 'static;

    /// Emit outputs before any input is accepted.
    ///
    /// Runs synchronously while the interface is being built, after
    /// [`responder`](ViewModel::responder). Use it to populate the initial
    /// state of the view.
    fn first(&self, _respond: &Responder<Self::Output>) {}

    /// Accept an input and respond zero or more times.
    ///
    /// Returning [`ViewModelError::IgnoreInput`] ends the cycle silently.
    /// Any other error is handed to [`thrown_error`](ViewModel::thrown_error).
    async fn accept(
        &self,
        input: Self::Input,
        respond: Responder<Self::Output>,
    ) -> anyhow::Result<()>;

    /// Input kinds that are single-flight.
    ///
    /// A second input of a listed kind is dropped until the first one has
    /// finished, e.g. repeated "add to bag" taps while the request is running.
    fn filter(&self) -> Vec<Self::Input> {
        Vec::new()
    }

    /// Drop every input while any input is in flight.
    fn filter_all(&self) -> bool {
        false
    }

    /// Input kinds that, while in flight, drop inputs of every kind.
    fn filter_all_inputs(&self) -> Vec<Self::Input> {
        Vec::new()
    }

    /// Input kinds that are delayed and coalesced.
    fn debounce(&self) -> Vec<Debounce<Self::Input>> {
        Vec::new()
    }

    /// Output kinds that do not mark an input operation as finished.
    ///
    /// Progress updates are the typical case: `ShowProgress(0.5)` must not
    /// let a second filtered input in while the operation is still running.
    fn filter_outputs(&self) -> Vec<Self::Output> {
        Vec::new()
    }

    /// Whether `output` carries a view state snapshot.
    ///
    /// Such outputs are dropped when equal to the last delivered snapshot.
    fn carries_view_state(&self, _output: &Self::Output) -> bool {
        false
    }

    /// Standing channel for outputs unrelated to any input.
    ///
    /// Called once, before [`first`](ViewModel::first). Keep the responder
    /// for the lifetime of the view model and do not use it from `accept`:
    /// outputs sent on it are never filtered or debounced and never finish an
    /// input operation.
    fn responder(&self, _respond: Responder<Self::Output>) {}

    /// Called when `accept` fails with anything but
    /// [`ViewModelError::IgnoreInput`].
    ///
    /// Override to translate the failure into a displayable output. The
    /// default only logs it.
    fn thrown_error(&self, error: anyhow::Error, _respond: &Responder<Self::Output>) {
        tracing::warn!(error = %error, "View model error dropped without an output");
    }
}
