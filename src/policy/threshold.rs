//! Admission-threshold decorator.
//!
//! Wraps any policy and refuses elements whose size (or cost) exceeds a
//! ceiling. Refused elements never reach the inner policy; accepted ones are
//! delegated unchanged, so eviction order is entirely the inner policy's.
//!
//! ```text
//!   add_with(element, attrs)
//!          │
//!          ▼
//!   attrs.get(attribute) > ceiling ? ──yes──► Err(Rejected(element))
//!          │ no / absent
//!          ▼
//!   inner.add_with(element, attrs)
//! ```
//!
//! Lowering the ceiling does not evict elements admitted under the old one.
//! A refused `update` removes the slot from the inner policy, because the
//! slot would otherwise keep describing an element the caller no longer has.

use crate::ds::SlotId;
use crate::error::{ConfigError, InvariantError, Rejected, UpdateRejected};
use crate::traits::{Attribute, Attributes, ReplacementPolicy};

/// Decorator refusing elements above a size or cost ceiling.
///
/// # Example
///
/// ```
/// use evictkit::policy::lru::LruPolicy;
/// use evictkit::policy::threshold::ThresholdPolicy;
/// use evictkit::traits::{Attribute, Attributes, ReplacementPolicy};
///
/// let mut policy = ThresholdPolicy::new(LruPolicy::new(), 100.0).unwrap();
///
/// let small = Attributes::new().with(Attribute::Size, 40.0);
/// let large = Attributes::new().with(Attribute::Size, 400.0);
///
/// assert!(policy.add_with("small", &small).is_ok());
/// assert_eq!(policy.add_with("large", &large).unwrap_err().into_inner(), "large");
/// assert_eq!(policy.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ThresholdPolicy<P> {
    inner: P,
    attribute: Attribute,
    ceiling: f64,
}

impl<P> ThresholdPolicy<P> {
    /// Wraps `inner`, refusing elements whose [`Attribute::Size`] exceeds
    /// `ceiling`.
    pub fn new(inner: P, ceiling: f64) -> Result<Self, ConfigError> {
        Self::with_attribute(inner, Attribute::Size, ceiling)
    }

    /// Wraps `inner`, refusing elements whose `attribute` exceeds `ceiling`.
    ///
    /// Fails if `ceiling` is negative or NaN.
    pub fn with_attribute(
        inner: P,
        attribute: Attribute,
        ceiling: f64,
    ) -> Result<Self, ConfigError> {
        validate_ceiling(ceiling)?;
        Ok(Self {
            inner,
            attribute,
            ceiling,
        })
    }

    /// Current ceiling.
    pub fn threshold(&self) -> f64 {
        self.ceiling
    }

    /// Changes the ceiling for future admissions.
    pub fn set_threshold(&mut self, ceiling: f64) -> Result<(), ConfigError> {
        validate_ceiling(ceiling)?;
        self.ceiling = ceiling;
        Ok(())
    }

    /// The attribute compared against the ceiling.
    pub fn attribute(&self) -> Attribute {
        self.attribute
    }

    /// Borrows the wrapped policy.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Unwraps the decorator.
    pub fn into_inner(self) -> P {
        self.inner
    }

    /// Returns `true` if `attributes` would be refused.
    pub fn refuses(&self, attributes: &Attributes) -> bool {
        attributes
            .get(self.attribute)
            .is_some_and(|value| value > self.ceiling)
    }
}

fn validate_ceiling(ceiling: f64) -> Result<(), ConfigError> {
    if ceiling.is_nan() || ceiling < 0.0 {
        return Err(ConfigError::new(format!(
            "threshold must be a non-negative number, got {ceiling}"
        )));
    }
    Ok(())
}

impl<T, P> ReplacementPolicy<T> for ThresholdPolicy<P>
where
    P: ReplacementPolicy<T>,
{
    fn add_with(&mut self, element: T, attributes: &Attributes) -> Result<SlotId, Rejected<T>> {
        if self.refuses(attributes) {
            tracing::debug!(
                policy = self.inner.name(),
                attribute = ?self.attribute,
                value = attributes.get(self.attribute),
                ceiling = self.ceiling,
                "admission refused"
            );
            return Err(Rejected::new(element));
        }
        self.inner.add_with(element, attributes)
    }

    fn update_with(
        &mut self,
        id: SlotId,
        element: T,
        attributes: &Attributes,
    ) -> Result<T, UpdateRejected<T>> {
        if self.refuses(attributes) {
            let removed = self.inner.remove(id);
            tracing::debug!(
                policy = self.inner.name(),
                slot = id.index(),
                attribute = ?self.attribute,
                value = attributes.get(self.attribute),
                ceiling = self.ceiling,
                "update refused, slot removed"
            );
            return Err(UpdateRejected {
                refused: element,
                removed,
            });
        }
        self.inner.update_with(id, element, attributes)
    }

    fn touch(&mut self, id: SlotId) {
        self.inner.touch(id)
    }

    fn remove(&mut self, id: SlotId) -> T {
        self.inner.remove(id)
    }

    fn evict_next(&mut self) -> Option<T> {
        self.inner.evict_next()
    }

    fn peek(&self) -> Option<&T> {
        self.inner.peek()
    }

    fn peek_all(&self) -> Vec<&T> {
        self.inner.peek_all()
    }

    fn clear(&mut self) {
        self.inner.clear()
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn contains(&self, id: SlotId) -> bool {
        self.inner.contains(id)
    }

    /// Reports the wrapped policy's name.
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn check_invariants(&self) -> Result<(), InvariantError> {
        self.inner.check_invariants()
    }

    fn admits(&self, attributes: &Attributes) -> bool {
        !self.refuses(attributes) && self.inner.admits(attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::fifo::FifoPolicy;
    use crate::policy::lru::LruPolicy;

    fn size(value: f64) -> Attributes {
        Attributes::new().with(Attribute::Size, value)
    }

    fn cost(value: f64) -> Attributes {
        Attributes::new().with(Attribute::Cost, value)
    }

    mod admission {
        use super::*;

        #[test]
        fn oversized_add_leaves_len_unchanged() {
            let mut policy = ThresholdPolicy::new(FifoPolicy::new(), 10.0).unwrap();
            policy.add_with(1, &size(5.0)).unwrap();
            let err = policy.add_with(2, &size(10.5)).unwrap_err();
            assert_eq!(err.into_inner(), 2);
            assert_eq!(policy.len(), 1);
        }

        #[test]
        fn value_at_ceiling_is_admitted() {
            let mut policy = ThresholdPolicy::new(FifoPolicy::new(), 10.0).unwrap();
            assert!(policy.add_with("edge", &size(10.0)).is_ok());
            assert_eq!(policy.len(), 1);
        }

        #[test]
        fn missing_attribute_is_admitted() {
            let mut policy = ThresholdPolicy::new(FifoPolicy::new(), 0.0).unwrap();
            assert!(policy.add("plain").is_ok());
            // Cost is not the attribute being checked.
            assert!(policy.add_with("costly", &cost(1e9)).is_ok());
            assert_eq!(policy.len(), 2);
        }

        #[test]
        fn cost_threshold_checks_cost() {
            let mut policy =
                ThresholdPolicy::with_attribute(FifoPolicy::new(), Attribute::Cost, 3.0).unwrap();
            assert!(policy.add_with('a', &size(100.0)).is_ok());
            assert!(policy.add_with('b', &cost(4.0)).is_err());
            assert_eq!(policy.attribute(), Attribute::Cost);
        }

        #[test]
        fn eviction_order_is_inner_policys() {
            let mut policy = ThresholdPolicy::new(LruPolicy::new(), 1.0).unwrap();
            let ids: Vec<_> = policy.add_all(0..4).into_iter().flatten().collect();
            policy.touch(ids[0]);
            assert_eq!(policy.name(), "lru");
            assert_eq!(policy.evict_all(), vec![1, 2, 3, 0]);
        }
    }

    mod ceiling {
        use super::*;

        #[test]
        fn lowering_ceiling_does_not_evict() {
            let mut policy = ThresholdPolicy::new(FifoPolicy::new(), 100.0).unwrap();
            policy.add_with("big", &size(80.0)).unwrap();
            policy.set_threshold(10.0).unwrap();
            assert_eq!(policy.threshold(), 10.0);
            assert_eq!(policy.len(), 1);
            assert!(policy.add_with("big2", &size(80.0)).is_err());
        }

        #[test]
        fn invalid_ceilings_are_rejected() {
            assert!(ThresholdPolicy::new(FifoPolicy::<u8>::new(), -1.0).is_err());
            assert!(ThresholdPolicy::new(FifoPolicy::<u8>::new(), f64::NAN).is_err());

            let mut policy = ThresholdPolicy::new(FifoPolicy::<u8>::new(), 1.0).unwrap();
            let err = policy.set_threshold(f64::NAN).unwrap_err();
            assert!(err.message().contains("threshold"));
            assert_eq!(policy.threshold(), 1.0);
        }
    }

    mod update {
        use super::*;

        #[test]
        fn accepted_update_delegates() {
            let mut policy = ThresholdPolicy::new(FifoPolicy::new(), 10.0).unwrap();
            let id = policy.add_with("a", &size(1.0)).unwrap();
            assert_eq!(policy.update_with(id, "b", &size(2.0)), Ok("a"));
            assert!(policy.contains(id));
        }

        #[test]
        fn refused_update_removes_slot() {
            let mut policy = ThresholdPolicy::new(FifoPolicy::new(), 10.0).unwrap();
            let id = policy.add_with("a", &size(1.0)).unwrap();
            policy.add("other").unwrap();

            let err = policy.update_with(id, "huge", &size(50.0)).unwrap_err();
            assert_eq!(err.refused, "huge");
            assert_eq!(err.removed, "a");
            assert!(!policy.contains(id));
            assert_eq!(policy.peek_all(), vec![&"other"]);
            policy.check_invariants().unwrap();
        }
    }

    #[test]
    fn admits_mirrors_refusal() {
        let policy = ThresholdPolicy::new(FifoPolicy::<u8>::new(), 10.0).unwrap();
        assert!(policy.admits(&size(10.0)));
        assert!(policy.admits(&Attributes::EMPTY));
        assert!(!policy.admits(&size(10.5)));

        let boxed: crate::traits::BoxedPolicy<u8> = Box::new(policy);
        assert!(!boxed.admits(&size(11.0)));
    }

    #[test]
    fn into_inner_returns_wrapped_policy() {
        let mut policy = ThresholdPolicy::new(FifoPolicy::new(), 1.0).unwrap();
        policy.add(7).unwrap();
        let mut fifo = policy.into_inner();
        assert_eq!(fifo.evict_next(), Some(7));
    }
}
