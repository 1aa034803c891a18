//! Builder API for ergonomic specification construction.
//!
//! This module provides a fluent builder and a macro for declaring state
//! machines with minimal boilerplate. The builder is permissive: it records
//! whatever it is told and leaves every structural check to validation.

pub mod macros;

use crate::core::{Handler, StateId, StateVariants};
use crate::machine::StateMachine;
use crate::spec::{StateMachineSpec, ValidationError};

/// Builder for constructing specifications with a fluent API.
///
/// # Example
///
/// ```
/// use statewarden::core::{goto, handler};
/// use statewarden::state_id;
/// use statewarden::spec::StateMachineSpec;
///
/// state_id! {
///     enum Light {
///         Red,
///         Green,
///         Yellow,
///         Off,
///     }
/// }
///
/// let machine = StateMachineSpec::builder(Light::Red)
///     .handlers(|state| match state {
///         Light::Red => goto(Light::Green),
///         Light::Green => goto(Light::Yellow),
///         Light::Yellow => handler(|| Light::Red),
///         Light::Off => goto(Light::Off),
///     })
///     .final_state(Light::Off)
///     .transition(Light::Red, Light::Green)
///     .transition(Light::Green, Light::Yellow)
///     .transitions(Light::Yellow, [Light::Red, Light::Off])
///     .build_machine()
///     .unwrap();
///
/// assert_eq!(machine.current_state(), Light::Red);
/// ```
pub struct StateMachineSpecBuilder<S: StateId> {
    spec: StateMachineSpec<S>,
}

impl<S: StateId> StateMachineSpecBuilder<S> {
    /// Create a new builder for a machine starting in `initial`.
    pub fn new(initial: S) -> Self {
        Self {
            spec: StateMachineSpec::new(initial),
        }
    }

    /// Bind a handler to a state, declaring the state.
    pub fn state(mut self, state: S, handler: Handler<S>) -> Self {
        self.spec.handlers.insert(state, Some(handler));
        self
    }

    /// Declare a state without binding a handler yet.
    ///
    /// Validation rejects the specification unless a handler is bound later.
    pub fn declare(mut self, state: S) -> Self {
        self.spec.handlers.entry(state).or_insert(None);
        self
    }

    /// Bind one handler per variant.
    ///
    /// `f` is called once for every variant, so an exhaustive `match` inside it
    /// turns a forgotten handler into a compile error.
    pub fn handlers<F>(mut self, mut f: F) -> Self
    where
        S: StateVariants,
        F: FnMut(S) -> Handler<S>,
    {
        for state in S::ALL {
            self.spec.handlers.insert(*state, Some(f(*state)));
        }
        self
    }

    /// Mark a state as final.
    pub fn final_state(mut self, state: S) -> Self {
        self.spec.final_states.insert(state);
        self
    }

    /// Mark several states as final.
    pub fn final_states<I>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        self.spec.final_states.extend(states);
        self
    }

    /// Declare the edge `from -> to`.
    pub fn transition(mut self, from: S, to: S) -> Self {
        self.spec.transitions.entry(from).or_default().insert(to);
        self
    }

    /// Declare an edge from `from` to each of `targets`.
    pub fn transitions<I>(mut self, from: S, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        self.spec
            .transitions
            .entry(from)
            .or_default()
            .extend(targets);
        self
    }

    /// Allow or forbid `StateMachine::transition` (forbidden by default).
    pub fn allow_external_transitions(mut self, allow: bool) -> Self {
        self.spec.allow_external_transition = allow;
        self
    }

    /// Return the specification without validating it.
    pub fn build(self) -> StateMachineSpec<S> {
        self.spec
    }

    /// Validate the specification and create a machine in its initial state.
    pub fn build_machine(self) -> Result<StateMachine<S>, ValidationError<S>> {
        StateMachine::new(self.spec)
    }
}
