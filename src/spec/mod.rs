//! Declarative state machine specifications.
//!
//! A [`StateMachineSpec`] describes a machine: its initial state, its final
//! states, one handler per state and the adjacency mapping of legal edges.
//! A specification is only a candidate until [`StateMachineSpec::validate`]
//! accepts it; [`StateMachine::new`](crate::machine::StateMachine::new) runs
//! that validation and then freezes the specification behind an `Arc`.

mod error;
mod validate;

pub use error::ValidationError;

use crate::builder::StateMachineSpecBuilder;
use crate::core::{Handler, StateId};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Set of states used for membership tests.
pub type StateSet<S> = BTreeSet<S>;

/// Description of a state machine.
///
/// The keys of `handlers` define the universe of valid states. A key mapped to
/// `None` is a declared state without a handler, which validation rejects.
///
/// # Example
///
/// ```rust
/// use statewarden::core::goto;
/// use statewarden::spec::StateMachineSpec;
///
/// let spec = StateMachineSpec::builder(0u32)
///     .state(0, goto(1))
///     .state(1, goto(1))
///     .final_state(1)
///     .transition(0, 1)
///     .build();
///
/// assert!(spec.validate().is_ok());
/// assert!(spec.is_final_state(1));
/// ```
#[derive(Clone)]
pub struct StateMachineSpec<S: StateId> {
    pub initial_state: S,
    pub final_states: StateSet<S>,
    pub handlers: BTreeMap<S, Option<Handler<S>>>,
    pub transitions: BTreeMap<S, StateSet<S>>,
    /// Whether `StateMachine::transition` may be called. Off by default.
    pub allow_external_transition: bool,
}

impl<S: StateId> StateMachineSpec<S> {
    /// Empty specification starting in `initial_state`.
    pub fn new(initial_state: S) -> Self {
        Self {
            initial_state,
            final_states: StateSet::new(),
            handlers: BTreeMap::new(),
            transitions: BTreeMap::new(),
            allow_external_transition: false,
        }
    }

    /// Start building a specification with a fluent API.
    pub fn builder(initial_state: S) -> StateMachineSpecBuilder<S> {
        StateMachineSpecBuilder::new(initial_state)
    }

    /// Whether `state` is one of the final states.
    pub fn is_final_state(&self, state: S) -> bool {
        self.final_states.contains(&state)
    }

    /// The handler bound to `state`, if the state is known and has one.
    pub fn handler(&self, state: S) -> Option<&Handler<S>> {
        self.handlers.get(&state).and_then(Option::as_ref)
    }

    /// Whether `state` is known and has a handler bound to it.
    pub fn has_handler(&self, state: S) -> bool {
        self.handler(state).is_some()
    }

    /// Whether `from -> to` is a declared edge.
    pub fn is_valid_transition(&self, from: S, to: S) -> bool {
        self.transitions
            .get(&from)
            .is_some_and(|targets| targets.contains(&to))
    }

    /// Declared targets of `from`, in ascending order.
    pub fn targets(&self, from: S) -> impl Iterator<Item = S> + '_ {
        self.transitions.get(&from).into_iter().flatten().copied()
    }

    /// Every state in the handler universe, in ascending order.
    pub fn states(&self) -> impl Iterator<Item = S> + '_ {
        self.handlers.keys().copied()
    }
}

impl<S: StateId> fmt::Debug for StateMachineSpec<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handlers: BTreeMap<&S, bool> = self
            .handlers
            .iter()
            .map(|(state, handler)| (state, handler.is_some()))
            .collect();

        f.debug_struct("StateMachineSpec")
            .field("initial_state", &self.initial_state)
            .field("final_states", &self.final_states)
            .field("handlers", &handlers)
            .field("transitions", &self.transitions)
            .field("allow_external_transition", &self.allow_external_transition)
            .finish()
    }
}
