//! Core state machine types.
//!
//! This module contains the building blocks shared by the validator and the
//! engine:
//! - State identifiers via the `StateId` trait
//! - Handlers bound to states
//! - Immutable history tracking

mod handler;
mod history;
mod state;

pub use handler::{goto, handler, Handler, StateHandler};
pub use history::{StateHistory, StateTransition, TransitionOrigin};
pub use state::{StateId, StateVariants};
