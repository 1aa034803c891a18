//! State handlers.
//!
//! A handler is the work bound to a state. It takes no arguments and returns
//! the state the machine should move to next; returning its own state means
//! "stay". The engine only interprets that return value, it never looks at
//! what the handler does.

use super::state::StateId;
use std::sync::Arc;

/// Behavior bound to a single state.
///
/// Implemented for every `Fn() -> S + Send + Sync`, so closures can be used
/// directly. Handlers must be `Send + Sync` because a validated specification
/// may be shared between threads; handlers that keep internal state need
/// interior mutability (an atomic or a mutex).
///
/// # Example
///
/// ```rust
/// use statewarden::core::StateHandler;
///
/// let next = || 2u32;
/// assert_eq!(next.enter(), 2);
/// ```
pub trait StateHandler<S>: Send + Sync {
    /// Run the state's work and request the next state.
    fn enter(&self) -> S;
}

impl<S, F> StateHandler<S> for F
where
    F: Fn() -> S + Send + Sync,
{
    fn enter(&self) -> S {
        self()
    }
}

/// Shared, type-erased handler as stored in a specification.
pub type Handler<S> = Arc<dyn StateHandler<S>>;

/// Wrap a closure into a [`Handler`].
///
/// Useful in `match` arms, where every arm must produce the same type.
pub fn handler<S, F>(f: F) -> Handler<S>
where
    S: StateId,
    F: Fn() -> S + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A handler that always requests `next`.
///
/// # Example
///
/// ```rust
/// use statewarden::core::goto;
///
/// let h = goto(7u32);
/// assert_eq!(h.enter(), 7);
/// ```
pub fn goto<S: StateId>(next: S) -> Handler<S> {
    Arc::new(move || next)
}
