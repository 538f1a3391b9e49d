//! Dispatch engine.
//!
//! [`ViewModelInterface`] is the only path between a consumer and its
//! [`ViewModel`]. For every input it:
//!
//! 1. Debounces the input if its kind is declared in `debounce()`. The
//!    remaining steps run when the timer fires.
//! 2. Asks the gate whether the input may start a cycle (`filter_all`,
//!    `filter_all_inputs`, `filter`). Dropped inputs are gone, not queued.
//! 3. Runs `accept` on the runtime. The cycle's markers are released by the
//!    first output that is not in `filter_outputs()`, or when `accept`
//!    returns, whichever comes first.
//! 4. Passes every output through the delivery gate onto the main context,
//!    where a view state equal to the last one delivered is dropped.
//!
//! Asynchronous work only holds weak references to the engine, so dropping
//! the interface silently discards anything still in flight.

mod delivery;
mod gate;
mod main_context;

pub use main_context::MainContext;

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tracing::Instrument;

use crate::config::EngineConfig;
use crate::debounce::Debouncer;
use crate::viewmodel::{kind_of, Kind, Responder, ViewModel, ViewModelError};

use delivery::DeliveryGate;
use gate::{Admission, GateState, Policy, Ticket};

/// Runtime, main context and configuration shared by engines.
///
/// Passed explicitly wherever a view model interface is built; there is no
/// process-wide registry.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    runtime: Handle,
    main: MainContext,
    config: EngineConfig,
}

impl Dispatcher {
    pub fn new(runtime: Handle, main: MainContext) -> Self {
        Self {
            runtime,
            main,
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn runtime(&self) -> &Handle {
        &self.runtime
    }

    pub fn main_context(&self) -> &MainContext {
        &self.main
    }

    /// Build an interface for `view_model`, delivering outputs to `receive`.
    pub fn interface<V, F>(&self, view_model: V, receive: F) -> ViewModelInterface<V>
    where
        V: ViewModel,
        F: FnMut(V::Output) + Send + 'static,
    {
        ViewModelInterface::new(self, view_model, receive)
    }
}

/// Owns one view model and mediates every input and output.
pub struct ViewModelInterface<V: ViewModel> {
    core: Arc<Core<V>>,
}

impl<V: ViewModel> ViewModelInterface<V> {
    /// Build the interface.
    ///
    /// Queries the policy declarations once, hands the view model its
    /// standing responder, then runs `first`. Outputs from `first` are
    /// queued on the main context before this returns, so they precede the
    /// outputs of any input sent afterwards.
    pub fn new<F>(dispatcher: &Dispatcher, view_model: V, receive: F) -> Self
    where
        F: FnMut(V::Output) + Send + 'static,
    {
        let span = tracing::debug_span!("view_model", name = %dispatcher.config.name);
        let policy = Policy::from_view_model(&view_model);
        let debouncers = policy
            .debounce
            .iter()
            .map(|(kind, interval)| (*kind, Debouncer::new(*interval, dispatcher.runtime.clone())))
            .collect();

        let core = Arc::new(Core {
            view_model: Arc::new(view_model),
            policy,
            gate: Mutex::new(GateState::default()),
            debouncers,
            delivery: DeliveryGate::new(dispatcher.main.clone(), receive),
            runtime: dispatcher.runtime.clone(),
            span,
        });

        core.span.in_scope(|| {
            core.view_model.responder(core.standing_responder());
            core.view_model.first(&core.standing_responder());
        });

        Self { core }
    }

    /// Send an input. Never blocks and never fails.
    pub fn send(&self, input: V::Input) {
        self.core.send(input);
    }

    pub fn view_model(&self) -> &V {
        &self.core.view_model
    }

    /// Whether no input currently holds an in-flight marker.
    pub fn is_idle(&self) -> bool {
        self.core.gate.lock().is_idle()
    }
}

struct Core<V: ViewModel> {
    view_model: Arc<V>,
    policy: Policy<V::Input, V::Output>,
    gate: Mutex<GateState<V::Input>>,
    debouncers: HashMap<Kind<V::Input>, Debouncer>,
    delivery: DeliveryGate<V::Output>,
    runtime: Handle,
    span: tracing::Span,
}

impl<V: ViewModel> Core<V> {
    fn send(self: &Arc<Self>, input: V::Input) {
        if let Some(debouncer) = self.debouncers.get(&kind_of(&input)) {
            self.span.in_scope(|| {
                tracing::debug!(?input, interval = ?debouncer.interval(), "Input debounced")
            });
            let core = Arc::downgrade(self);
            debouncer.debounce(move || {
                if let Some(core) = core.upgrade() {
                    core.dispatch(input);
                }
            });
            return;
        }
        self.dispatch(input);
    }

    fn dispatch(self: &Arc<Self>, input: V::Input) {
        let admission = self.gate.lock().admit(&self.policy, &input);
        let ticket = match admission {
            Admission::Admitted(ticket) => ticket,
            Admission::Dropped(reason) => {
                self.span
                    .in_scope(|| tracing::trace!(?input, ?reason, "Input dropped"));
                return;
            }
        };
        self.span
            .in_scope(|| tracing::debug!(?input, "Input dispatched"));

        let cycle = Arc::new(Cycle::new(ticket));
        let respond = self.cycle_responder(&cycle);
        let guard = CycleGuard {
            core: Arc::downgrade(self),
            cycle,
        };
        let view_model = Arc::clone(&self.view_model);

        self.runtime.spawn(
            async move {
                let result = view_model.accept(input, respond.clone()).await;
                // Markers go before thrown_error so its output sees an idle gate.
                drop(guard);
                if let Err(error) = result {
                    if ViewModelError::is_ignore(&error) {
                        tracing::trace!("Input ignored");
                    } else {
                        view_model.thrown_error(error, &respond);
                    }
                }
            }
            .instrument(self.span.clone()),
        );
    }

    fn cycle_responder(self: &Arc<Self>, cycle: &Arc<Cycle<V::Input>>) -> Responder<V::Output> {
        let core = Arc::downgrade(self);
        let cycle = Arc::clone(cycle);
        Responder::new(move |output| {
            let Some(core) = core.upgrade() else {
                tracing::trace!(?output, "Interface dropped; output discarded");
                return;
            };
            if core.policy.finishes_operation(&output) {
                cycle.complete(&core.gate);
            }
            core.emit(output);
        })
    }

    fn standing_responder(self: &Arc<Self>) -> Responder<V::Output> {
        let core = Arc::downgrade(self);
        Responder::new(move |output| match core.upgrade() {
            Some(core) => core.emit(output),
            None => tracing::trace!(?output, "Interface dropped; output discarded"),
        })
    }

    fn emit(&self, output: V::Output) {
        let carries_view_state = self.view_model.carries_view_state(&output);
        self.delivery.deliver(output, carries_view_state);
    }
}

/// Markers held by one accept cycle, released at most once.
struct Cycle<I> {
    ticket: Mutex<Option<Ticket<I>>>,
}

impl<I> Cycle<I> {
    fn new(ticket: Ticket<I>) -> Self {
        Self {
            ticket: Mutex::new(ticket.is_filtered().then_some(ticket)),
        }
    }

    fn complete(&self, gate: &Mutex<GateState<I>>) {
        if let Some(ticket) = self.ticket.lock().take() {
            gate.lock().release(&ticket);
        }
    }
}

/// Completes the cycle when `accept` returns, fails or unwinds.
struct CycleGuard<V: ViewModel> {
    core: Weak<Core<V>>,
    cycle: Arc<Cycle<V::Input>>,
}

impl<V: ViewModel> Drop for CycleGuard<V> {
    fn drop(&mut self) {
        if let Some(core) = self.core.upgrade() {
            self.cycle.complete(&core.gate);
        }
    }
}
