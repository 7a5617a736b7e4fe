//! Cooperative cancellation for long-running pipeline phases.
//!
//! Graph construction and layout poll a [`CancellationToken`] between major
//! steps. A cancelled phase stops early and returns what it has built so far
//! wrapped in [`Outcome::Cancelled`]; it never raises an error.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crate::error::CartographyError;

/// A cloneable cancellation flag shared between a caller and the pipeline.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Every clone of this token observes it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Returns true once [`cancel`](Self::cancel) has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Result of a cancellable pipeline phase.
///
/// A `Cancelled` value holds a best-effort partial result. It satisfies the
/// structural invariants of its type but must not be rendered as final.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Complete(T),
    Cancelled(T),
}

impl<T> Outcome<T> {
    /// Returns true if the phase was cut short.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled(_))
    }

    /// Returns a reference to the contained value, complete or partial.
    pub fn value(&self) -> &T {
        match self {
            Outcome::Complete(value) | Outcome::Cancelled(value) => value,
        }
    }

    /// Returns the contained value, complete or partial.
    pub fn into_inner(self) -> T {
        match self {
            Outcome::Complete(value) | Outcome::Cancelled(value) => value,
        }
    }

    /// Returns the value only if the phase completed.
    pub fn complete(self) -> Option<T> {
        match self {
            Outcome::Complete(value) => Some(value),
            Outcome::Cancelled(_) => None,
        }
    }

    /// Transforms the contained value, keeping the completion state.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Complete(value) => Outcome::Complete(f(value)),
            Outcome::Cancelled(value) => Outcome::Cancelled(f(value)),
        }
    }

    /// Converts into a `Result`, treating cancellation as an error.
    ///
    /// # Errors
    ///
    /// Returns [`CartographyError::Cancelled`] naming `phase` if the phase was
    /// cancelled.
    pub fn into_result(self, phase: &'static str) -> Result<T, CartographyError> {
        match self {
            Outcome::Complete(value) => Ok(value),
            Outcome::Cancelled(_) => Err(CartographyError::Cancelled { phase }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shared_between_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());

        token.cancel();
        assert!(clone.is_cancelled());
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_outcome_accessors() {
        let done = Outcome::Complete(3);
        assert!(!done.is_cancelled());
        assert_eq!(*done.value(), 3);
        assert_eq!(done.clone().map(|v| v * 2), Outcome::Complete(6));
        assert_eq!(done.complete(), Some(3));

        let partial = Outcome::Cancelled(1);
        assert!(partial.is_cancelled());
        assert_eq!(partial.clone().map(|v| v + 1), Outcome::Cancelled(2));
        assert_eq!(partial.clone().into_inner(), 1);
        assert_eq!(partial.complete(), None);
    }

    #[test]
    fn test_outcome_into_result() {
        assert_eq!(Outcome::Complete("ok").into_result("layout").unwrap(), "ok");

        let err = Outcome::Cancelled(()).into_result("layering").unwrap_err();
        assert!(matches!(err, CartographyError::Cancelled { phase: "layering" }));
        assert_eq!(err.to_string(), "Operation cancelled during layering");
    }
}
