//! LIFO (Last In, First Out) replacement policy.
//!
//! A stack: the most recently admitted element is evicted first. Accesses do
//! not reorder anything.
//!
//! ```text
//!   add A, B, C, D
//!
//!   bottom ──► [A] [B] [C] [D] ◄── top
//!              keep          EVICT
//! ```
//!
//! Useful as the mirror image of FIFO in policy comparisons, and for
//! workloads where the oldest residents are the ones worth keeping.

use crate::ds::{IntrusiveList, SlotId};
use crate::error::{InvariantError, Rejected, UpdateRejected};
use crate::traits::{Attributes, ReplacementPolicy, stale_slot};

/// Stack-ordered policy.
///
/// # Example
///
/// ```
/// use evictkit::policy::lifo::LifoPolicy;
/// use evictkit::traits::ReplacementPolicy;
///
/// let mut lifo = LifoPolicy::new();
/// lifo.add_all([1, 2, 3]);
/// assert_eq!(lifo.peek(), Some(&3));
/// assert_eq!(lifo.evict_all(), vec![3, 2, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct LifoPolicy<T> {
    stack: IntrusiveList<T>,
}

impl<T> LifoPolicy<T> {
    /// Creates an empty LIFO policy.
    pub fn new() -> Self {
        Self {
            stack: IntrusiveList::new(),
        }
    }

    /// Creates an empty LIFO policy with room for `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            stack: IntrusiveList::with_capacity(capacity),
        }
    }
}

impl<T> Default for LifoPolicy<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ReplacementPolicy<T> for LifoPolicy<T> {
    fn add_with(&mut self, element: T, _attributes: &Attributes) -> Result<SlotId, Rejected<T>> {
        Ok(self.stack.push_back(element))
    }

    fn update_with(
        &mut self,
        id: SlotId,
        element: T,
        _attributes: &Attributes,
    ) -> Result<T, UpdateRejected<T>> {
        match self.stack.get_mut(id) {
            Some(slot) => Ok(std::mem::replace(slot, element)),
            None => stale_slot(self.name(), id),
        }
    }

    fn touch(&mut self, id: SlotId) {
        if !self.stack.contains(id) {
            stale_slot(self.name(), id);
        }
    }

    fn remove(&mut self, id: SlotId) -> T {
        match self.stack.remove(id) {
            Some(element) => element,
            None => stale_slot(self.name(), id),
        }
    }

    fn evict_next(&mut self) -> Option<T> {
        self.stack.pop_back()
    }

    fn peek(&self) -> Option<&T> {
        self.stack.back()
    }

    fn peek_all(&self) -> Vec<&T> {
        self.stack.iter_rev().collect()
    }

    fn clear(&mut self) {
        self.stack.clear();
    }

    fn len(&self) -> usize {
        self.stack.len()
    }

    fn contains(&self, id: SlotId) -> bool {
        self.stack.contains(id)
    }

    fn name(&self) -> &'static str {
        "lifo"
    }

    fn check_invariants(&self) -> Result<(), InvariantError> {
        self.stack.check_invariants()
    }
}
