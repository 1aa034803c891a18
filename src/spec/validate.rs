//! Structural validation of specifications.
//!
//! Checks run in a fixed order and walk states in ascending order:
//!
//! 1. every declared state has a handler
//! 2. the initial state has a handler
//! 3. every final state has a handler
//! 4. the initial state is not final
//! 5. every edge leaves a non-final, known state and enters a known state
//! 6. every state is reachable from the initial state
//! 7. every non-final state has an outgoing edge
//!
//! [`StateMachineSpec::validate`] stops at the first violation.
//! [`StateMachineSpec::diagnose`] runs the same checks to completion and
//! accumulates every violation with Stillwater's `Validation`.

use super::{StateMachineSpec, StateSet, ValidationError};
use crate::core::StateId;
use std::collections::VecDeque;
use std::ops::ControlFlow;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

impl<S: StateId> StateMachineSpec<S> {
    /// Validate the specification, reporting the first violation found.
    ///
    /// Validation is read-only; running it any number of times on the same
    /// specification yields the same result.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statewarden::core::goto;
    /// use statewarden::spec::{StateMachineSpec, ValidationError};
    ///
    /// let spec = StateMachineSpec::builder(0u32)
    ///     .state(0, goto(1))
    ///     .state(1, goto(1))
    ///     .final_state(0)
    ///     .build();
    ///
    /// assert_eq!(spec.validate(), Err(ValidationError::InitialIsFinal));
    /// ```
    pub fn validate(&self) -> Result<(), ValidationError<S>> {
        let mut first = None;
        let _ = run_checks(self, &mut |error| {
            first = Some(error);
            ControlFlow::Break(())
        });

        match first {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Run every check and collect all violations, in check order.
    ///
    /// Later violations may be consequences of earlier ones (a missing
    /// handler also makes the edges into that state invalid).
    pub fn diagnose(&self) -> Validation<(), NonEmptyVec<ValidationError<S>>> {
        let mut found = Vec::new();
        let _ = run_checks(self, &mut |error| {
            found.push(error);
            ControlFlow::Continue(())
        });

        if found.is_empty() {
            return Validation::success(());
        }

        let checks: Vec<Validation<(), NonEmptyVec<ValidationError<S>>>> =
            found.into_iter().map(Validation::fail).collect();
        Validation::all_vec(checks).map(|_| ())
    }

    /// States reachable from the initial state by following declared edges.
    pub fn reachable_states(&self) -> StateSet<S> {
        let mut visited = StateSet::from([self.initial_state]);
        let mut queue = VecDeque::from([self.initial_state]);

        while let Some(current) = queue.pop_front() {
            for target in self.targets(current) {
                if visited.insert(target) {
                    queue.push_back(target);
                }
            }
        }

        visited
    }
}

type Report<'a, S> = dyn FnMut(ValidationError<S>) -> ControlFlow<()> + 'a;

fn run_checks<S: StateId>(
    spec: &StateMachineSpec<S>,
    report: &mut Report<'_, S>,
) -> ControlFlow<()> {
    if spec.handlers.is_empty() {
        return report(ValidationError::EmptySpecification);
    }

    for (state, handler) in &spec.handlers {
        if handler.is_none() {
            report(ValidationError::MissingHandler(*state))?;
        }
    }

    if !spec.has_handler(spec.initial_state) {
        report(ValidationError::MissingInitialHandler)?;
    }

    for state in &spec.final_states {
        if !spec.has_handler(*state) {
            report(ValidationError::MissingFinalHandler(*state))?;
        }
    }

    if spec.is_final_state(spec.initial_state) {
        report(ValidationError::InitialIsFinal)?;
    }

    for (source, targets) in &spec.transitions {
        if targets.is_empty() {
            continue;
        }

        if spec.is_final_state(*source) {
            report(ValidationError::TransitionFromFinal(*source))?;
        }

        if !spec.has_handler(*source) {
            report(ValidationError::MissingSourceHandler(*source))?;
        }

        for target in targets {
            if !spec.has_handler(*target) {
                report(ValidationError::MissingTargetHandler(*target))?;
            }
        }
    }

    let reachable = spec.reachable_states();
    for state in spec.states() {
        if !reachable.contains(&state) {
            report(ValidationError::UnreachableState(state))?;
        }
    }

    for state in spec.states() {
        if spec.is_final_state(state) {
            continue;
        }
        if spec.targets(state).next().is_none() {
            report(ValidationError::NoOutgoingTransitions(state))?;
        }
    }

    ControlFlow::Continue(())
}
