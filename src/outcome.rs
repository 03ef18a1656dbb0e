//! # Coordination outcomes.
//!
//! [`Outcome`] is what a coordinator resolves with when the call was not a
//! genuine failure of the unit of work. `Cancelled` and `Suppressed` are
//! expected results of the scheduling policy, not errors: callers check the
//! kind and usually ignore or log the non-success variants.

/// Result of a coordinated invocation that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The unit of work ran to completion for this invocation.
    Success(T),
    /// A newer invocation superseded this one (preempt coordinator only).
    ///
    /// Whatever the unit of work produced is discarded.
    Cancelled,
    /// The gate was closed; the unit of work never started (gate coordinator only).
    Suppressed,
}

impl<T> Outcome<T> {
    /// Returns `true` for [`Outcome::Success`].
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled)
    }

    #[inline]
    pub fn is_suppressed(&self) -> bool {
        matches!(self, Outcome::Suppressed)
    }

    /// Returns the value of a successful invocation.
    pub fn success(self) -> Option<T> {
        match self {
            Outcome::Success(v) => Some(v),
            Outcome::Cancelled | Outcome::Suppressed => None,
        }
    }

    /// Maps the success value, keeping coordination outcomes as they are.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Success(v) => Outcome::Success(f(v)),
            Outcome::Cancelled => Outcome::Cancelled,
            Outcome::Suppressed => Outcome::Suppressed,
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            Outcome::Success(_) => "success",
            Outcome::Cancelled => "cancelled",
            Outcome::Suppressed => "suppressed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_carries_value() {
        let o = Outcome::Success(7);
        assert!(o.is_success());
        assert_eq!(o.map(|v| v * 2).success(), Some(14));
    }

    #[test]
    fn coordination_outcomes_have_no_value() {
        assert_eq!(Outcome::<u8>::Cancelled.success(), None);
        assert_eq!(Outcome::<u8>::Suppressed.map(|v| v + 1), Outcome::Suppressed);
        assert_eq!(Outcome::<u8>::Cancelled.as_label(), "cancelled");
        assert_eq!(Outcome::<u8>::Suppressed.as_label(), "suppressed");
    }
}
