//! Transition and execution engine.
//!
//! The engine holds the current state and funnels every state change through
//! one guard that only lets declared edges through.
//!
//! # Key Concepts
//!
//! - **Execute**: run the current state's handler and take the edge it asks for
//! - **Transition**: take an edge requested from outside, if the specification
//!   allows it
//! - **Guard**: a request for the current state is a no-op; any other request
//!   must be a declared edge, whose target handler then decides the new state

mod engine;
mod error;

pub use engine::StateMachine;
pub use error::TransitionError;
