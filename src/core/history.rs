//! State transition history tracking.
//!
//! Provides immutable tracking of the transitions a machine has taken,
//! following functional programming principles.

use super::state::StateId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Which entry point requested a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionOrigin {
    /// The current state's handler requested it through `execute()`.
    Execute,
    /// Code outside the machine requested it through `transition()`.
    External,
}

impl fmt::Display for TransitionOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Execute => f.write_str("execute"),
            Self::External => f.write_str("external"),
        }
    }
}

/// Record of a single transition.
///
/// `requested` is the edge target that passed the guard; `to` is whatever the
/// target's handler returned, which became the new current state. The two
/// differ whenever a handler immediately asks to move on.
///
/// # Example
///
/// ```rust
/// use statewarden::core::{StateTransition, TransitionOrigin};
/// use chrono::Utc;
///
/// let transition = StateTransition {
///     from: 1u32,
///     requested: 2,
///     to: 3,
///     origin: TransitionOrigin::Execute,
///     timestamp: Utc::now(),
/// };
/// assert_ne!(transition.requested, transition.to);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: StateId> {
    /// The state being transitioned from
    pub from: S,
    /// The declared edge target that was entered
    pub requested: S,
    /// The state the target's handler returned
    pub to: S,
    /// Entry point that requested the transition
    pub origin: TransitionOrigin,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of state transitions.
///
/// From the outside history is immutable - the `record` method returns a
/// new history with the transition added. A machine appends to its own
/// history in place.
///
/// # Example
///
/// ```rust
/// use statewarden::core::{StateHistory, StateTransition, TransitionOrigin};
/// use chrono::Utc;
///
/// let history = StateHistory::new();
///
/// let history = history.record(StateTransition {
///     from: 0u32,
///     requested: 1,
///     to: 1,
///     origin: TransitionOrigin::Execute,
///     timestamp: Utc::now(),
/// });
///
/// let history = history.record(StateTransition {
///     from: 1,
///     requested: 2,
///     to: 3,
///     origin: TransitionOrigin::External,
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(history.get_path(), vec![&0, &1, &3]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: StateId> {
    transitions: Vec<StateTransition<S>>,
}

impl<S: StateId> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: StateId> StateHistory<S> {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    ///
    /// This does not mutate the existing history but returns a new one with
    /// the transition added.
    pub fn record(&self, transition: StateTransition<S>) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// Append a transition in place.
    ///
    /// Used by the machine itself, which owns its history and records on
    /// every step.
    pub(crate) fn push(&mut self, transition: StateTransition<S>) {
        self.transitions.push(transition);
    }

    /// Get the path of states the machine rested in.
    ///
    /// Returns the `from` state of the first transition, then the `to` state
    /// of each transition. Intermediate `requested` states are not part of the
    /// path unless a handler chose to stay in them.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Calculate total duration from first to last transition.
    ///
    /// Returns `None` if there are no transitions.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Get all transitions, oldest first.
    pub fn transitions(&self) -> &[StateTransition<S>] {
        &self.transitions
    }

    /// Number of recorded transitions.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Whether no transition has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
