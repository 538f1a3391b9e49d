//! In-flight bookkeeping for the input policies.
//!
//! [`Policy`] is the snapshot of a view model's declarations, taken once.
//! [`GateState`] decides whether an input may start a cycle and records the
//! markers that cycle holds; [`Ticket`] remembers those markers so they can
//! be released exactly once.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::viewmodel::{kind_of, Kind, KindSet, ViewModel};

/// Policy declarations of one view model.
pub(crate) struct Policy<I, O> {
    pub filter: KindSet<I>,
    pub filter_all: bool,
    pub filter_all_inputs: KindSet<I>,
    pub filter_outputs: KindSet<O>,
    pub debounce: HashMap<Kind<I>, Duration>,
}

impl<I, O> Policy<I, O> {
    pub fn from_view_model<V>(view_model: &V) -> Self
    where
        V: ViewModel<Input = I, Output = O>,
    {
        let debounce = view_model
            .debounce()
            .into_iter()
            .map(|entry| (kind_of(&entry.input), entry.interval))
            .collect();

        Self {
            filter: view_model.filter().into_iter().collect(),
            filter_all: view_model.filter_all(),
            filter_all_inputs: view_model.filter_all_inputs().into_iter().collect(),
            filter_outputs: view_model.filter_outputs().into_iter().collect(),
            debounce,
        }
    }

    /// Whether `output` finishes the input operation that produced it.
    pub fn finishes_operation(&self, output: &O) -> bool {
        !self.filter_outputs.contains(output)
    }
}

/// Why an input was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DropReason {
    /// `filter_all` is on and another input is in flight.
    Busy,
    /// A `filter_all_inputs` kind is in flight.
    Blocked,
    /// The same `filter` kind is in flight.
    InFlight,
}

/// Markers set when a cycle was admitted.
#[derive(Debug)]
pub(crate) struct Ticket<I> {
    kind: Kind<I>,
    busy: bool,
    blocking: bool,
    in_flight: bool,
}

impl<I> Ticket<I> {
    /// Whether the cycle holds any marker.
    pub fn is_filtered(&self) -> bool {
        self.busy || self.blocking || self.in_flight
    }
}

#[derive(Debug)]
pub(crate) enum Admission<I> {
    Admitted(Ticket<I>),
    Dropped(DropReason),
}

#[derive(Debug)]
pub(crate) struct GateState<I> {
    busy: bool,
    blocking: HashSet<Kind<I>>,
    in_flight: HashSet<Kind<I>>,
}

impl<I> Default for GateState<I> {
    fn default() -> Self {
        Self {
            busy: false,
            blocking: HashSet::new(),
            in_flight: HashSet::new(),
        }
    }
}

impl<I> GateState<I> {
    /// Decide whether `input` may start a cycle, marking it in flight if so.
    pub fn admit<O>(&mut self, policy: &Policy<I, O>, input: &I) -> Admission<I> {
        let kind = kind_of(input);

        if policy.filter_all && self.busy {
            return Admission::Dropped(DropReason::Busy);
        }
        if !self.blocking.is_empty() {
            return Admission::Dropped(DropReason::Blocked);
        }

        let mut ticket = Ticket {
            kind,
            busy: false,
            blocking: false,
            in_flight: false,
        };

        if policy.filter_all_inputs.contains_kind(&kind) {
            self.blocking.insert(kind);
            ticket.blocking = true;
        } else if policy.filter.contains_kind(&kind) {
            if !self.in_flight.insert(kind) {
                return Admission::Dropped(DropReason::InFlight);
            }
            ticket.in_flight = true;
        }

        if policy.filter_all {
            self.busy = true;
            ticket.busy = true;
        }

        Admission::Admitted(ticket)
    }

    /// Clear the markers held by `ticket`.
    pub fn release(&mut self, ticket: &Ticket<I>) {
        if ticket.busy {
            self.busy = false;
        }
        if ticket.blocking {
            self.blocking.remove(&ticket.kind);
        }
        if ticket.in_flight {
            self.in_flight.remove(&ticket.kind);
        }
    }

    pub fn is_idle(&self) -> bool {
        !self.busy && self.blocking.is_empty() && self.in_flight.is_empty()
    }
}
