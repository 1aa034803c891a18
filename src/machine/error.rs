//! Runtime transition errors.

use crate::core::StateId;
use thiserror::Error;

/// Errors returned by `execute()` and `transition()`.
///
/// Every variant leaves the current state unchanged and is recoverable: the
/// caller may retry with another target or keep driving the machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError<S: StateId> {
    /// `to` is not a declared target of `from`.
    #[error("can't transition from state {from} to state {to}")]
    InvalidTransition { from: S, to: S },

    /// The specification does not allow external transitions.
    #[error("external transition is forbidden")]
    ExternalTransitionForbidden,

    /// The machine rests in a state a handler returned that has no handler of
    /// its own, so there is nothing to execute.
    #[error("state {0} has no handler")]
    UnknownState(S),
}
