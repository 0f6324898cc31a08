//! # Replacement Policy Contract
//!
//! This module defines the trait every eviction algorithm implements. A policy
//! does not store values or look up keys: it orders opaque elements and
//! decides which one leaves next. Callers keep the [`SlotId`] returned by
//! [`add`](ReplacementPolicy::add) and use it to report accesses and removals.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────┐
//!   │                    ReplacementPolicy<T>                          │
//!   │                                                                  │
//!   │  add_with(T, &Attributes)       → Result<SlotId, Rejected<T>>    │
//!   │  update_with(SlotId, T, &Attrs) → Result<T, UpdateRejected<T>>   │
//!   │  touch(SlotId)                                                   │
//!   │  remove(SlotId)                 → T                              │
//!   │  evict_next()                   → Option<T>                      │
//!   │  peek() / peek_all()            → next victim / full order       │
//!   │  clear(), len(), contains(SlotId), name(), check_invariants()    │
//!   │                                                                  │
//!   │  derived: add, update, add_all, evict(n), evict_all, is_empty    │
//!   └───────────────────────────┬──────────────────────────────────────┘
//!                               │
//!     ┌──────────┬──────────┬───┴──────┬──────────┬──────────┬──────────┐
//!     ▼          ▼          ▼          ▼          ▼          ▼          ▼
//!   Fifo       Lifo       Lru        Mru        Lfu       Clock     Random
//!
//!   Decorators (also ReplacementPolicy):  ThresholdPolicy<P>
//!   Lock wrapper (&self API):             SynchronizedPolicy<P>
//! ```
//!
//! ## Slot Ownership
//!
//! A slot id is valid from the `add` that returned it until it is passed to
//! `remove`, or its element comes back out of `evict_next`/`evict`/`clear`.
//! A successful `update` keeps the id. Ids are recycled afterwards, so a
//! caller that holds on to a dead id may later address an unrelated element.
//!
//! Passing an id that is vacant or was never issued to `touch`, `remove` or
//! `update` is a programming error and panics.
//!
//! ## Policy Comparison
//!
//! | Policy | Victim                        | `touch`          |
//! |--------|-------------------------------|------------------|
//! | FIFO   | oldest insertion              | no-op            |
//! | LIFO   | newest insertion              | no-op            |
//! | LRU    | least recently accessed       | moves to MRU end |
//! | MRU    | most recently accessed        | moves to MRU end |
//! | LFU    | fewest accesses, oldest first | count + 1        |
//! | Clock  | first unreferenced from hand  | sets ref bit     |
//! | Random | uniformly random              | no-op            |
//!
//! ## Thread Safety
//!
//! Policies are plain single-threaded data structures. Wrap one in
//! [`SynchronizedPolicy`](crate::policy::synchronized::SynchronizedPolicy)
//! to share it between threads.

use crate::ds::SlotId;
use crate::error::{InvariantError, Rejected, UpdateRejected};

/// A boxed policy that can be moved across threads.
pub type BoxedPolicy<T> = Box<dyn ReplacementPolicy<T> + Send>;

/// Numeric metadata kinds a policy may consult on admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// Size of the element, in caller-defined units.
    Size,
    /// Cost of (re)producing the element.
    Cost,
}

/// Optional side-channel of numeric metadata passed to `add_with`/`update_with`.
///
/// # Example
///
/// ```
/// use evictkit::traits::{Attribute, Attributes};
///
/// let attrs = Attributes::new().with(Attribute::Size, 512.0);
/// assert_eq!(attrs.get(Attribute::Size), Some(512.0));
/// assert_eq!(attrs.get(Attribute::Cost), None);
/// assert!(Attributes::EMPTY.is_empty());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Attributes {
    size: Option<f64>,
    cost: Option<f64>,
}

impl Attributes {
    /// No metadata.
    pub const EMPTY: Attributes = Attributes {
        size: None,
        cost: None,
    };

    /// Creates an empty attribute set.
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Returns a copy with `attribute` set to `value`.
    pub const fn with(mut self, attribute: Attribute, value: f64) -> Self {
        match attribute {
            Attribute::Size => self.size = Some(value),
            Attribute::Cost => self.cost = Some(value),
        }
        self
    }

    /// Returns the value recorded for `attribute`.
    pub fn get(&self, attribute: Attribute) -> Option<f64> {
        match attribute {
            Attribute::Size => self.size,
            Attribute::Cost => self.cost,
        }
    }

    /// Returns `true` if no attribute is set.
    pub fn is_empty(&self) -> bool {
        self.size.is_none() && self.cost.is_none()
    }
}

/// Eviction-order contract shared by every policy.
///
/// # Example
///
/// ```
/// use evictkit::policy::lru::LruPolicy;
/// use evictkit::traits::ReplacementPolicy;
///
/// let mut lru = LruPolicy::new();
/// let a = lru.add("a").unwrap();
/// lru.add("b").unwrap();
/// lru.touch(a);
///
/// assert_eq!(lru.peek_all(), vec![&"b", &"a"]);
/// assert_eq!(lru.evict_next(), Some("b"));
/// assert_eq!(lru.len(), 1);
/// ```
pub trait ReplacementPolicy<T> {
    /// Admits `element` and returns its slot, or hands it back if refused.
    fn add_with(&mut self, element: T, attributes: &Attributes) -> Result<SlotId, Rejected<T>>;

    /// Replaces the element at `id`, returning the previous element.
    ///
    /// If the replacement is refused under the same rule `add_with` applies,
    /// the slot is removed and both elements are returned in the error.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a live slot.
    fn update_with(
        &mut self,
        id: SlotId,
        element: T,
        attributes: &Attributes,
    ) -> Result<T, UpdateRejected<T>>;

    /// Records an access to the element at `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a live slot.
    fn touch(&mut self, id: SlotId);

    /// Removes the element at `id` regardless of eviction order.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a live slot.
    fn remove(&mut self, id: SlotId) -> T;

    /// Removes and returns the next victim, or `None` when empty.
    fn evict_next(&mut self) -> Option<T>;

    /// The element `evict_next` would return, without mutating anything.
    fn peek(&self) -> Option<&T>;

    /// Every element in eviction order, head first.
    fn peek_all(&self) -> Vec<&T>;

    /// Evicts everything.
    fn clear(&mut self);

    /// Number of live slots.
    fn len(&self) -> usize;

    /// Returns `true` if `id` is a live slot.
    fn contains(&self, id: SlotId) -> bool;

    /// Short lowercase policy name used in reports.
    fn name(&self) -> &'static str;

    /// Checks internal bookkeeping.
    fn check_invariants(&self) -> Result<(), InvariantError>;

    /// Returns `true` if the policy holds no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `false` if `add_with` would refuse an element with
    /// `attributes`. Lets a bounded owner skip evicting for a doomed add.
    fn admits(&self, _attributes: &Attributes) -> bool {
        true
    }

    /// [`add_with`](Self::add_with) with empty attributes.
    fn add(&mut self, element: T) -> Result<SlotId, Rejected<T>> {
        self.add_with(element, &Attributes::EMPTY)
    }

    /// [`update_with`](Self::update_with) with empty attributes.
    fn update(&mut self, id: SlotId, element: T) -> Result<T, UpdateRejected<T>> {
        self.update_with(id, element, &Attributes::EMPTY)
    }

    /// Adds every element in iteration order; results are parallel to the input.
    fn add_all<I>(&mut self, elements: I) -> Vec<Result<SlotId, Rejected<T>>>
    where
        I: IntoIterator<Item = T>,
        Self: Sized,
    {
        elements.into_iter().map(|element| self.add(element)).collect()
    }

    /// Evicts up to `n` elements, stopping early when empty.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    fn evict(&mut self, n: usize) -> Vec<T> {
        assert!(n > 0, "evict count must be positive");
        let mut evicted = Vec::with_capacity(n.min(self.len()));
        while evicted.len() < n {
            match self.evict_next() {
                Some(element) => evicted.push(element),
                None => break,
            }
        }
        evicted
    }

    /// Evicts every element, in eviction order.
    fn evict_all(&mut self) -> Vec<T> {
        let mut evicted = Vec::with_capacity(self.len());
        while let Some(element) = self.evict_next() {
            evicted.push(element);
        }
        evicted
    }
}

impl<T, P> ReplacementPolicy<T> for Box<P>
where
    P: ReplacementPolicy<T> + ?Sized,
{
    fn add_with(&mut self, element: T, attributes: &Attributes) -> Result<SlotId, Rejected<T>> {
        (**self).add_with(element, attributes)
    }

    fn update_with(
        &mut self,
        id: SlotId,
        element: T,
        attributes: &Attributes,
    ) -> Result<T, UpdateRejected<T>> {
        (**self).update_with(id, element, attributes)
    }

    fn touch(&mut self, id: SlotId) {
        (**self).touch(id)
    }

    fn remove(&mut self, id: SlotId) -> T {
        (**self).remove(id)
    }

    fn evict_next(&mut self) -> Option<T> {
        (**self).evict_next()
    }

    fn peek(&self) -> Option<&T> {
        (**self).peek()
    }

    fn peek_all(&self) -> Vec<&T> {
        (**self).peek_all()
    }

    fn clear(&mut self) {
        (**self).clear()
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn contains(&self, id: SlotId) -> bool {
        (**self).contains(id)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn check_invariants(&self) -> Result<(), InvariantError> {
        (**self).check_invariants()
    }

    fn admits(&self, attributes: &Attributes) -> bool {
        (**self).admits(attributes)
    }
}

/// Panics for a slot id that is vacant or was never issued.
#[cold]
#[track_caller]
pub(crate) fn stale_slot(policy: &str, id: SlotId) -> ! {
    panic!("{policy}: slot {id} is not live (stale or out-of-range id)")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::fifo::FifoPolicy;

    #[test]
    fn attributes_with_overwrites() {
        let attrs = Attributes::new()
            .with(Attribute::Cost, 1.0)
            .with(Attribute::Cost, 3.0);
        assert_eq!(attrs.get(Attribute::Cost), Some(3.0));
        assert!(!attrs.is_empty());
    }

    #[test]
    fn add_all_returns_parallel_ids() {
        let mut fifo = FifoPolicy::new();
        let ids = fifo.add_all(["a", "b", "c"]);
        assert_eq!(ids.len(), 3);
        assert!(ids.iter().all(|result| fifo.contains(*result.as_ref().unwrap())));
        assert_eq!(fifo.peek_all(), vec![&"a", &"b", &"c"]);

        let first = *ids[0].as_ref().unwrap();
        assert_eq!(fifo.remove(first), "a");
    }

    #[test]
    fn evict_stops_when_empty() {
        let mut fifo = FifoPolicy::new();
        fifo.add_all([1, 2, 3]);
        assert_eq!(fifo.evict(2), vec![1, 2]);
        assert_eq!(fifo.evict(10), vec![3]);
        assert!(fifo.evict(1).is_empty());
    }

    #[test]
    #[should_panic(expected = "evict count must be positive")]
    fn evict_zero_panics() {
        let mut fifo = FifoPolicy::<u8>::new();
        fifo.evict(0);
    }

    #[test]
    fn boxed_policy_delegates() {
        let mut boxed: BoxedPolicy<u32> = Box::new(FifoPolicy::new());
        boxed.add(7).unwrap();
        boxed.add(8).unwrap();
        assert_eq!(boxed.name(), "fifo");
        assert_eq!(boxed.peek(), Some(&7));
        assert_eq!(boxed.evict_all(), vec![7, 8]);
        assert!(boxed.is_empty());
    }
}
