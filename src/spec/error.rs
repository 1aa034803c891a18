//! Construction-time errors.

use crate::core::StateId;
use thiserror::Error;

/// A structural violation found while validating a specification.
///
/// Validation reports the first violation in a fixed check order, so the same
/// specification always yields the same error. All variants are fatal to
/// construction: the specification has to be fixed and validated again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError<S: StateId> {
    #[error("specification must not be empty")]
    EmptySpecification,

    #[error("missing function for state {0}")]
    MissingHandler(S),

    #[error("the initial state is missing from the state map")]
    MissingInitialHandler,

    #[error("the final state {0} is missing from the state map")]
    MissingFinalHandler(S),

    #[error("the initial state can't be a final state")]
    InitialIsFinal,

    #[error("can't transition from a final state {0}")]
    TransitionFromFinal(S),

    #[error("source state {0} is missing from state map")]
    MissingSourceHandler(S),

    #[error("target state {0} is missing from state map")]
    MissingTargetHandler(S),

    #[error("state {0} is unreachable")]
    UnreachableState(S),

    #[error("there are no transitions from state {0}")]
    NoOutgoingTransitions(S),
}

impl<S: StateId> ValidationError<S> {
    /// The state the violation is about, if it concerns a specific one.
    pub fn state(&self) -> Option<S> {
        match self {
            Self::MissingHandler(s)
            | Self::MissingFinalHandler(s)
            | Self::TransitionFromFinal(s)
            | Self::MissingSourceHandler(s)
            | Self::MissingTargetHandler(s)
            | Self::UnreachableState(s)
            | Self::NoOutgoingTransitions(s) => Some(*s),
            Self::EmptySpecification | Self::MissingInitialHandler | Self::InitialIsFinal => None,
        }
    }
}
