//! State identifiers.
//!
//! A state is nothing more than an opaque, totally ordered identifier. Any
//! type with the right set of derives qualifies, so plain integers work out
//! of the box and enums can be declared with the [`state_id!`](crate::state_id)
//! macro.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Identifier of a state in a state machine.
///
/// Identifiers carry no meaning beyond equality and ordering. The ordering is
/// what makes validation deterministic: every check walks states in ascending
/// order, so the same broken specification always reports the same error.
///
/// This trait is implemented automatically for every type meeting the bounds.
///
/// # Required Traits
///
/// - `Copy`: identifiers are passed around by value
/// - `Ord` + `Hash`: identifiers key ordered and hashed collections
/// - `Display`: identifiers appear in error messages
/// - `Serialize` + `Deserialize`: identifiers are stored in checkpoints
///
/// # Example
///
/// ```rust
/// use statewarden::core::StateId;
///
/// fn describe<S: StateId>(state: S) -> String {
///     format!("state {state}")
/// }
///
/// assert_eq!(describe(3u32), "state 3");
/// ```
pub trait StateId:
    Copy
    + Eq
    + Ord
    + Hash
    + Debug
    + Display
    + Serialize
    + for<'de> Deserialize<'de>
    + Send
    + Sync
    + 'static
{
}

impl<T> StateId for T where
    T: Copy
        + Eq
        + Ord
        + Hash
        + Debug
        + Display
        + Serialize
        + for<'de> Deserialize<'de>
        + Send
        + Sync
        + 'static
{
}

/// State identifiers with a closed, enumerable set of values.
///
/// Implemented by enums declared through [`state_id!`](crate::state_id).
/// Knowing every variant lets a builder ask for one handler per variant, so an
/// exhaustive `match` makes the compiler reject a missing handler.
pub trait StateVariants: StateId {
    /// Every variant, in declaration order.
    const ALL: &'static [Self];

    /// The variant name, as written in the enum.
    fn name(&self) -> &'static str;
}
