//! Statewarden: a validated finite state machine engine
//!
//! A machine is described declaratively: an initial state, a set of final
//! states, one handler per state and the edges allowed between states. The
//! description is validated once, when the machine is built, and the running
//! machine never takes an edge that was not declared.
//!
//! # Core Concepts
//!
//! - **Specification**: the declarative description, checked by
//!   [`StateMachineSpec::validate`]
//! - **Handler**: the work bound to a state; it returns the state to go to next
//! - **Machine**: holds the current state; [`StateMachine::execute`] runs the
//!   current handler, [`StateMachine::transition`] moves on request from
//!   outside when the specification allows it
//! - **Checkpoint**: a serializable snapshot to resume a machine from
//!
//! # Example
//!
//! ```rust
//! use statewarden::core::goto;
//! use statewarden::state_id;
//! use statewarden::{StateMachineSpec, TransitionError};
//!
//! state_id! {
//!     enum Order {
//!         Placed,
//!         Paid,
//!         Shipped,
//!         Cancelled,
//!     }
//! }
//!
//! let mut machine = StateMachineSpec::builder(Order::Placed)
//!     .handlers(|state| match state {
//!         Order::Placed => goto(Order::Placed),
//!         Order::Paid => goto(Order::Shipped),
//!         Order::Shipped | Order::Cancelled => goto(state),
//!     })
//!     .final_states([Order::Shipped, Order::Cancelled])
//!     .transitions(Order::Placed, [Order::Paid, Order::Cancelled])
//!     .transition(Order::Paid, Order::Shipped)
//!     .allow_external_transitions(true)
//!     .build_machine()
//!     .unwrap();
//!
//! assert_eq!(
//!     machine.transition(Order::Shipped),
//!     Err(TransitionError::InvalidTransition {
//!         from: Order::Placed,
//!         to: Order::Shipped,
//!     })
//! );
//! assert_eq!(machine.transition(Order::Paid), Ok(Order::Shipped));
//! assert!(machine.is_final());
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod machine;
pub mod spec;

// Re-export commonly used types
pub use builder::StateMachineSpecBuilder;
pub use checkpoint::{Checkpoint, CheckpointError};
pub use crate::core::{Handler, StateHandler, StateId, StateVariants};
pub use machine::{StateMachine, TransitionError};
pub use spec::{StateMachineSpec, StateSet, ValidationError};
