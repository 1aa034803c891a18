//! State machine that executes handlers and guards transitions.

use crate::core::{StateHistory, StateId, StateTransition, TransitionOrigin};
use crate::machine::error::TransitionError;
use crate::spec::{StateMachineSpec, ValidationError};
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

/// A running state machine.
///
/// Created in the specification's initial state. The specification is
/// validated once, at construction, and then shared read-only behind an `Arc`,
/// so it cannot change underneath a running machine. Several machines may
/// share one specification, including across threads; each machine itself
/// expects a single caller at a time.
///
/// # Example
///
/// ```rust
/// use statewarden::core::goto;
/// use statewarden::spec::StateMachineSpec;
///
/// let spec = StateMachineSpec::builder(0u32)
///     .state(0, goto(1))
///     .state(1, goto(2))
///     .state(2, goto(2))
///     .final_state(2)
///     .transition(0, 1)
///     .transition(1, 2)
///     .build();
///
/// let mut machine = statewarden::StateMachine::new(spec).unwrap();
///
/// // 0's handler asks for 1; 1's handler immediately asks for 2.
/// assert_eq!(machine.execute(), Ok(2));
/// assert!(machine.is_final());
/// ```
pub struct StateMachine<S: StateId> {
    spec: Arc<StateMachineSpec<S>>,
    current: S,
    history: StateHistory<S>,
}

impl<S: StateId> StateMachine<S> {
    /// Validate `spec` and create a machine in its initial state.
    ///
    /// No machine is created when validation fails.
    pub fn new(spec: impl Into<Arc<StateMachineSpec<S>>>) -> Result<Self, ValidationError<S>> {
        let spec = spec.into();
        spec.validate()?;

        debug!(
            initial = %spec.initial_state,
            states = spec.handlers.len(),
            "state machine created"
        );

        let initial = spec.initial_state;
        Ok(Self::from_parts(spec, initial, StateHistory::new()))
    }

    pub(crate) fn from_parts(
        spec: Arc<StateMachineSpec<S>>,
        current: S,
        history: StateHistory<S>,
    ) -> Self {
        Self {
            spec,
            current,
            history,
        }
    }

    /// Get current state
    pub fn current_state(&self) -> S {
        self.current
    }

    /// The specification this machine enforces.
    pub fn spec(&self) -> &Arc<StateMachineSpec<S>> {
        &self.spec
    }

    /// Check if machine is in a final state
    pub fn is_final(&self) -> bool {
        self.spec.is_final_state(self.current)
    }

    /// Get transition history
    pub fn history(&self) -> &StateHistory<S> {
        &self.history
    }

    /// Run the current state's handler and take the transition it requests.
    ///
    /// Returns the new current state. A handler returning its own state leaves
    /// the machine where it is.
    pub fn execute(&mut self) -> Result<S, TransitionError<S>> {
        let requested = self
            .spec
            .handler(self.current)
            .ok_or(TransitionError::UnknownState(self.current))?
            .enter();

        self.guarded_transition(requested, TransitionOrigin::Execute)
    }

    /// Transition to `target` on behalf of code outside the machine.
    ///
    /// Fails with [`TransitionError::ExternalTransitionForbidden`] unless the
    /// specification allows external transitions; otherwise behaves exactly
    /// like a transition requested by a handler.
    pub fn transition(&mut self, target: S) -> Result<S, TransitionError<S>> {
        if !self.spec.allow_external_transition {
            debug!(current = %self.current, to = %target, "external transition forbidden");
            return Err(TransitionError::ExternalTransitionForbidden);
        }

        self.guarded_transition(target, TransitionOrigin::External)
    }

    /// The single choke point for state changes.
    ///
    /// Requesting the current state is a no-op and does not run its handler.
    /// Any other target must be a declared edge; its handler then runs and
    /// whatever it returns becomes the current state as-is.
    pub(crate) fn guarded_transition(
        &mut self,
        target: S,
        origin: TransitionOrigin,
    ) -> Result<S, TransitionError<S>> {
        let from = self.current;

        if target == from {
            debug!(state = %from, %origin, "staying in current state");
            return Ok(from);
        }

        if !self.spec.is_valid_transition(from, target) {
            debug!(%from, to = %target, %origin, "rejected undeclared transition");
            return Err(TransitionError::InvalidTransition { from, to: target });
        }

        let next = self
            .spec
            .handler(target)
            .ok_or(TransitionError::UnknownState(target))?
            .enter();

        debug!(%from, requested = %target, to = %next, %origin, "state transition");

        self.history.push(StateTransition {
            from,
            requested: target,
            to: next,
            origin,
            timestamp: Utc::now(),
        });
        self.current = next;

        Ok(next)
    }
}

impl<S: StateId> std::fmt::Debug for StateMachine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateMachine")
            .field("current", &self.current)
            .field("transitions", &self.history.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{goto, handler, Handler};
    use crate::spec::StateSet;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    const INIT: u32 = 0;
    const CREATE: u32 = 1;
    const RUN: u32 = 2;
    const DONE: u32 = 3;
    const FAIL: u32 = 4;
    const NO_SUCH_STATE: u32 = 777;

    const STATES: [u32; 5] = [INIT, CREATE, RUN, DONE, FAIL];

    /// Handler shared by every state that walks through a canned sequence of
    /// requested states, repeating the last one once exhausted.
    struct Canned {
        steps: Vec<u32>,
        current: AtomicUsize,
    }

    impl Canned {
        fn new(steps: Vec<u32>) -> Arc<Self> {
            Arc::new(Self {
                steps,
                current: AtomicUsize::new(0),
            })
        }

        fn next(&self) -> u32 {
            let index = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.steps[index.min(self.steps.len() - 1)]
        }

        fn handler(self: &Arc<Self>) -> Handler<u32> {
            let canned = Arc::clone(self);
            handler(move || canned.next())
        }
    }

    fn spec_with<F>(mut handler_for: F) -> StateMachineSpec<u32>
    where
        F: FnMut(u32) -> Handler<u32>,
    {
        let mut builder = StateMachineSpec::builder(INIT)
            .final_states([DONE, FAIL])
            .transitions(INIT, [CREATE])
            .transitions(CREATE, [RUN, FAIL])
            .transitions(RUN, [RUN, DONE, FAIL])
            .allow_external_transitions(true);
        for state in STATES {
            builder = builder.state(state, handler_for(state));
        }
        builder.build()
    }

    fn default_spec() -> StateMachineSpec<u32> {
        let canned = Canned::new(vec![INIT, CREATE, RUN, RUN, DONE]);
        spec_with(|_| canned.handler())
    }

    /// Every handler asks to stay, so a transition never chains further.
    fn staying_spec() -> StateMachineSpec<u32> {
        spec_with(goto)
    }

    fn machine_in(spec: StateMachineSpec<u32>, state: u32) -> StateMachine<u32> {
        let mut machine = StateMachine::new(spec).unwrap();
        machine.current = state;
        machine
    }

    type Entry = fn(&mut StateMachine<u32>, u32) -> Result<u32, TransitionError<u32>>;

    fn guarded(machine: &mut StateMachine<u32>, target: u32) -> Result<u32, TransitionError<u32>> {
        machine.guarded_transition(target, TransitionOrigin::Execute)
    }

    fn external(machine: &mut StateMachine<u32>, target: u32) -> Result<u32, TransitionError<u32>> {
        machine.transition(target)
    }

    const ENTRY_POINTS: [Entry; 2] = [guarded, external];

    #[test]
    fn creates_machine_in_initial_state() {
        let spec = Arc::new(default_spec());
        let machine = StateMachine::new(Arc::clone(&spec)).unwrap();

        assert_eq!(machine.current_state(), INIT);
        assert!(Arc::ptr_eq(machine.spec(), &spec));
        assert!(machine.history().is_empty());
        assert!(!machine.is_final());
    }

    #[test]
    fn invalid_spec_creates_no_machine() {
        let mut spec = default_spec();
        spec.initial_state = FAIL;

        let result = StateMachine::new(spec);
        assert_eq!(result.err(), Some(ValidationError::InitialIsFinal));
    }

    #[test]
    fn performs_every_valid_transition() {
        for entry in ENTRY_POINTS {
            let spec = Arc::new(staying_spec());
            for (source, targets) in &spec.transitions {
                for target in targets {
                    let mut machine = machine_in((*spec).clone(), *source);

                    assert_eq!(entry(&mut machine, *target), Ok(*target));
                    assert_eq!(machine.current_state(), *target);
                }
            }
        }
    }

    #[test]
    fn rejects_every_invalid_transition() {
        let invalid = [
            (CREATE, INIT),
            (NO_SUCH_STATE, INIT),
            (FAIL, DONE),
            (DONE, RUN),
            (RUN, NO_SUCH_STATE),
            (INIT, RUN),
        ];

        for entry in ENTRY_POINTS {
            for (source, target) in invalid {
                let mut machine = machine_in(staying_spec(), source);

                let err = entry(&mut machine, target).unwrap_err();
                assert_eq!(
                    err,
                    TransitionError::InvalidTransition {
                        from: source,
                        to: target
                    }
                );
                assert_eq!(
                    err.to_string(),
                    format!("can't transition from state {source} to state {target}")
                );
                assert_eq!(machine.current_state(), source);
                assert!(machine.history().is_empty());
            }
        }
    }

    #[test]
    fn external_transition_is_forbidden_when_disallowed() {
        let mut spec = staying_spec();
        spec.allow_external_transition = false;
        let mut machine = machine_in(spec, RUN);

        let err = machine.transition(DONE).unwrap_err();
        assert_eq!(err, TransitionError::ExternalTransitionForbidden);
        assert_eq!(err.to_string(), "external transition is forbidden");
        assert_eq!(machine.current_state(), RUN);

        // Checked before the edge, so even a bogus target gets the same error.
        assert_eq!(
            machine.transition(NO_SUCH_STATE),
            Err(TransitionError::ExternalTransitionForbidden)
        );
    }

    #[test]
    fn same_state_transition_is_a_noop() {
        for entry in ENTRY_POINTS {
            let called = Arc::new(AtomicBool::new(false));
            let flag = Arc::clone(&called);
            let spec = spec_with(|state| {
                if state == RUN {
                    let flag = Arc::clone(&flag);
                    handler(move || {
                        flag.store(true, Ordering::SeqCst);
                        NO_SUCH_STATE
                    })
                } else {
                    goto(state)
                }
            });
            let mut machine = machine_in(spec, RUN);

            assert_eq!(entry(&mut machine, RUN), Ok(RUN));
            assert_eq!(machine.current_state(), RUN);
            assert!(!called.load(Ordering::SeqCst));
        }
    }

    #[test]
    fn undeclared_self_transition_is_still_a_noop() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let spec = spec_with(|state| {
            if state == CREATE {
                let counter = Arc::clone(&counter);
                handler(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                    RUN
                })
            } else {
                goto(state)
            }
        });
        assert!(!spec.is_valid_transition(CREATE, CREATE));

        for entry in ENTRY_POINTS {
            let mut machine = machine_in(spec.clone(), CREATE);
            assert_eq!(entry(&mut machine, CREATE), Ok(CREATE));
            assert_eq!(machine.current_state(), CREATE);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn transition_runs_target_handler_and_takes_its_result() {
        for entry in ENTRY_POINTS {
            let calls = Arc::new(AtomicUsize::new(0));
            let counter = Arc::clone(&calls);
            let spec = spec_with(|state| {
                if state == RUN {
                    let counter = Arc::clone(&counter);
                    handler(move || {
                        counter.fetch_add(1, Ordering::SeqCst);
                        DONE
                    })
                } else {
                    goto(state)
                }
            });
            let mut machine = machine_in(spec, CREATE);

            assert_eq!(entry(&mut machine, RUN), Ok(DONE));
            assert_eq!(machine.current_state(), DONE);
            assert_eq!(calls.load(Ordering::SeqCst), 1);

            let recorded = &machine.history().transitions()[0];
            assert_eq!(
                (recorded.from, recorded.requested, recorded.to),
                (CREATE, RUN, DONE)
            );
        }
    }

    #[test]
    fn handler_result_is_not_revalidated() {
        let spec = spec_with(|state| if state == CREATE { goto(NO_SUCH_STATE) } else { goto(state) });
        let mut machine = StateMachine::new(spec).unwrap();

        assert_eq!(machine.transition(CREATE), Ok(NO_SUCH_STATE));
        assert_eq!(machine.current_state(), NO_SUCH_STATE);

        // Nothing leads out of an unknown state.
        assert_eq!(
            machine.transition(RUN),
            Err(TransitionError::InvalidTransition {
                from: NO_SUCH_STATE,
                to: RUN
            })
        );
        assert_eq!(
            machine.execute(),
            Err(TransitionError::UnknownState(NO_SUCH_STATE))
        );
        assert_eq!(machine.current_state(), NO_SUCH_STATE);
    }

    #[test]
    fn execute_drives_canned_sequence_to_final_state() {
        let mut machine = StateMachine::new(default_spec()).unwrap();

        // INIT asks for CREATE, whose handler immediately asks for RUN.
        assert_eq!(machine.execute(), Ok(RUN));
        // RUN asks to stay.
        assert_eq!(machine.execute(), Ok(RUN));
        // RUN asks for DONE, whose handler stays.
        assert_eq!(machine.execute(), Ok(DONE));
        assert!(machine.is_final());

        // A final state only ever stays put.
        assert_eq!(machine.execute(), Ok(DONE));

        let path = machine.history().get_path();
        assert_eq!(path, vec![&INIT, &RUN, &DONE]);
        assert!(machine
            .history()
            .transitions()
            .iter()
            .all(|t| t.origin == TransitionOrigin::Execute));
    }

    #[test]
    fn execute_rejects_undeclared_request() {
        let spec = spec_with(|state| if state == INIT { goto(DONE) } else { goto(state) });
        let mut machine = StateMachine::new(spec).unwrap();

        assert_eq!(
            machine.execute(),
            Err(TransitionError::InvalidTransition { from: INIT, to: DONE })
        );
        assert_eq!(machine.current_state(), INIT);

        // A rejected transition does not poison the machine.
        assert_eq!(machine.transition(CREATE), Ok(CREATE));
    }

    #[test]
    fn external_transitions_are_recorded_as_external() {
        let mut machine = StateMachine::new(staying_spec()).unwrap();
        machine.transition(CREATE).unwrap();
        machine.execute().unwrap();

        let origins: Vec<_> = machine
            .history()
            .transitions()
            .iter()
            .map(|t| t.origin)
            .collect();
        assert_eq!(origins, vec![TransitionOrigin::External]);
    }

    #[test]
    fn long_running_machine_keeps_every_transition() {
        const PING: u32 = 0;
        const PONG: u32 = 1;
        const STOP: u32 = 2;

        let spec = StateMachineSpec::builder(PING)
            .state(PING, goto(PING))
            .state(PONG, goto(PONG))
            .state(STOP, goto(STOP))
            .final_state(STOP)
            .transitions(PING, [PONG, STOP])
            .transition(PONG, PING)
            .allow_external_transitions(true)
            .build();
        let mut machine = StateMachine::new(spec).unwrap();

        for _ in 0..20_000 {
            machine.transition(PONG).unwrap();
            machine.transition(PING).unwrap();
        }

        assert_eq!(machine.history().len(), 40_000);
        assert_eq!(machine.current_state(), PING);
        let last = machine.history().transitions().last().unwrap();
        assert_eq!((last.from, last.to), (PONG, PING));
    }

    #[test]
    fn spec_is_shared_across_threads() {
        let spec = Arc::new(spec_with(|state| match state {
            INIT => goto(CREATE),
            CREATE => goto(RUN),
            RUN => goto(DONE),
            other => goto(other),
        }));

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let spec = Arc::clone(&spec);
                std::thread::spawn(move || {
                    let mut machine = StateMachine::new(spec).unwrap();
                    while !machine.is_final() {
                        machine.execute().unwrap();
                    }
                    machine.current_state()
                })
            })
            .collect();

        for worker in workers {
            assert_eq!(worker.join().unwrap(), DONE);
        }
        assert_eq!(spec.final_states, StateSet::from([DONE, FAIL]));
    }
}
