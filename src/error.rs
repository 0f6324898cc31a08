//! Error types for the evictkit library.
//!
//! ## Key Components
//!
//! - [`Rejected`]: Returned by [`ReplacementPolicy::add_with`] when a policy
//!   refuses to admit an element. Hands the element back to the caller.
//! - [`UpdateRejected`]: Returned by [`ReplacementPolicy::update_with`] when
//!   the replacement element is refused; the slot has been removed.
//! - [`InvariantError`]: Returned when internal data-structure invariants are
//!   violated (`check_invariants` methods).
//! - [`ConfigError`]: Returned when construction parameters are invalid
//!   (e.g. zero step width, zero monitor capacity, NaN threshold).
//!
//! Stale or out-of-range slot ids are caller bugs and panic instead of
//! producing an error value.
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::analysis::OfflineReplay;
//! use evictkit::error::ConfigError;
//!
//! let bad: Result<OfflineReplay, ConfigError> = OfflineReplay::new(0);
//! assert!(bad.unwrap_err().to_string().contains("step width"));
//! ```
//!
//! [`ReplacementPolicy::add_with`]: crate::traits::ReplacementPolicy::add_with
//! [`ReplacementPolicy::update_with`]: crate::traits::ReplacementPolicy::update_with

use std::fmt;

// ---------------------------------------------------------------------------
// Rejected
// ---------------------------------------------------------------------------

/// An element a policy refused to admit.
///
/// Refusal is an ordinary outcome (for example a
/// [`ThresholdPolicy`](crate::policy::threshold::ThresholdPolicy) ceiling),
/// so the element is returned rather than dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected<T> {
    element: T,
}

impl<T> Rejected<T> {
    /// Wraps a refused element.
    #[inline]
    pub fn new(element: T) -> Self {
        Self { element }
    }

    /// Borrows the refused element.
    #[inline]
    pub fn element(&self) -> &T {
        &self.element
    }

    /// Returns the refused element.
    #[inline]
    pub fn into_inner(self) -> T {
        self.element
    }
}

impl<T: fmt::Debug> fmt::Display for Rejected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element {:?} refused admission", self.element)
    }
}

impl<T: fmt::Debug> std::error::Error for Rejected<T> {}

// ---------------------------------------------------------------------------
// UpdateRejected
// ---------------------------------------------------------------------------

/// A refused `update`: the new element was not admitted and the slot it was
/// meant for has been removed from the policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRejected<T> {
    /// The replacement element that was refused.
    pub refused: T,
    /// The element that occupied the slot before the update.
    pub removed: T,
}

impl<T: fmt::Debug> fmt::Display for UpdateRejected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "replacement {:?} refused admission; {:?} removed",
            self.refused, self.removed
        )
    }
}

impl<T: fmt::Debug> std::error::Error for UpdateRejected<T> {}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal policy invariants are violated.
///
/// Produced by `check_invariants` on policies and slot structures.
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when construction parameters are invalid.
///
/// Produced by fallible constructors such as
/// [`OfflineResult::new`](crate::analysis::OfflineResult::new),
/// [`PolicyMonitor::new`](crate::analysis::PolicyMonitor::new) and
/// [`PolicyBuilder::build`](crate::builder::PolicyBuilder::build).
///
/// # Example
///
/// ```
/// use evictkit::analysis::{HitStat, OfflineResult};
///
/// let err = OfflineResult::new(10, vec![1, 2], vec![3], HitStat::default()).unwrap_err();
/// assert!(err.to_string().contains("length"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Rejected ---------------------------------------------------------

    #[test]
    fn rejected_hands_element_back() {
        let err = Rejected::new(String::from("big"));
        assert_eq!(err.element(), "big");
        assert_eq!(err.into_inner(), "big");
    }

    #[test]
    fn rejected_display_names_element() {
        let err = Rejected::new(42);
        assert_eq!(err.to_string(), "element 42 refused admission");
    }

    #[test]
    fn update_rejected_display_names_both() {
        let err = UpdateRejected {
            refused: "new",
            removed: "old",
        };
        let msg = err.to_string();
        assert!(msg.contains("\"new\""));
        assert!(msg.contains("\"old\""));
    }

    #[test]
    fn rejections_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<Rejected<u64>>();
        assert_error::<UpdateRejected<u64>>();
    }

    // -- message errors ---------------------------------------------------

    #[test]
    fn message_errors_display_their_text() {
        let invariant = InvariantError::new("dense[3] = #5 does not point back");
        assert_eq!(invariant.to_string(), invariant.message());

        let config = ConfigError::new(String::from("step width must be >= 1"));
        assert_eq!(config.to_string(), "step width must be >= 1");
    }

    #[test]
    fn config_errors_box_into_dyn_error() {
        let boxed: Box<dyn std::error::Error + Send + Sync> = ConfigError::new("bad").into();
        assert_eq!(boxed.to_string(), "bad");

        let boxed: Box<dyn std::error::Error> = InvariantError::new("cycle").into();
        assert_eq!(boxed.to_string(), "cycle");
    }
}
