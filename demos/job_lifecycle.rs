//! Job Lifecycle Example
//!
//! Drives a batch job through Init -> Create -> Run -> Done/Fail by calling
//! `execute()` until the machine reaches a final state, then shows what the
//! engine does with an undeclared external request.
//!
//! Run with `RUST_LOG=statewarden=debug cargo run --example job_lifecycle`
//! to see every transition logged.
//!
//! Demos live under `demos/` instead of `examples/` and are registered as
//! `[[example]]` targets in `Cargo.toml`, with `autoexamples` turned off.

use statewarden::core::{goto, handler};
use statewarden::state_id;
use statewarden::{StateMachineSpec, TransitionError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

state_id! {
    enum Job {
        Init,
        Create,
        Run,
        Done,
        Fail,
    }
}

const BATCHES: usize = 3;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Job Lifecycle Example ===\n");

    let processed = Arc::new(AtomicUsize::new(0));
    let run_counter = Arc::clone(&processed);

    let mut machine = StateMachineSpec::builder(Job::Init)
        .handlers(|state| match state {
            Job::Init => goto(Job::Create),
            Job::Create => goto(Job::Run),
            Job::Run => {
                let processed = Arc::clone(&run_counter);
                handler(move || {
                    let done = processed.fetch_add(1, Ordering::SeqCst) + 1;
                    if done < BATCHES {
                        Job::Run
                    } else {
                        Job::Done
                    }
                })
            }
            Job::Done | Job::Fail => goto(state),
        })
        .final_states([Job::Done, Job::Fail])
        .transition(Job::Init, Job::Create)
        .transitions(Job::Create, [Job::Run, Job::Fail])
        .transitions(Job::Run, [Job::Run, Job::Done, Job::Fail])
        .allow_external_transitions(true)
        .build_machine()
        .expect("job specification is valid");

    println!("Starting in {}", machine.current_state());

    while !machine.is_final() {
        match machine.execute() {
            Ok(state) => println!("  -> {state}"),
            Err(err) => {
                println!("  rejected: {err}");
                break;
            }
        }
    }

    println!(
        "\nFinished in {} after {} batches",
        machine.current_state(),
        processed.load(Ordering::SeqCst)
    );

    match machine.transition(Job::Run) {
        Err(TransitionError::InvalidTransition { from, to }) => {
            println!("External request {from} -> {to} was refused; still in {from}");
        }
        other => println!("Unexpected outcome: {other:?}"),
    }

    let path: Vec<String> = machine
        .history()
        .get_path()
        .iter()
        .map(|state| state.to_string())
        .collect();
    println!("Path: {}", path.join(" -> "));
}
