//! FIFO (First In, First Out) replacement policy.
//!
//! Elements leave in the order they were admitted. Accesses carry no weight:
//! `touch` only validates the slot.
//!
//! ```text
//!   add A, B, C, D
//!
//!   head ──► [A] ◄──► [B] ◄──► [C] ◄──► [D] ◄── tail
//!            oldest                      newest
//!            EVICT
//! ```
//!
//! `update` replaces the element in place and keeps its queue position.

use crate::ds::{IntrusiveList, SlotId};
use crate::error::{InvariantError, Rejected, UpdateRejected};
use crate::traits::{Attributes, ReplacementPolicy, stale_slot};

/// Insertion-ordered policy backed by an [`IntrusiveList`].
///
/// # Example
///
/// ```
/// use evictkit::policy::fifo::FifoPolicy;
/// use evictkit::traits::ReplacementPolicy;
///
/// let mut fifo = FifoPolicy::new();
/// let a = fifo.add('a').unwrap();
/// fifo.add('b').unwrap();
/// fifo.touch(a); // no effect on order
///
/// assert_eq!(fifo.evict_all(), vec!['a', 'b']);
/// ```
#[derive(Debug, Clone)]
pub struct FifoPolicy<T> {
    queue: IntrusiveList<T>,
}

impl<T> FifoPolicy<T> {
    /// Creates an empty FIFO policy.
    pub fn new() -> Self {
        Self {
            queue: IntrusiveList::new(),
        }
    }

    /// Creates an empty FIFO policy with room for `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: IntrusiveList::with_capacity(capacity),
        }
    }
}

impl<T> Default for FifoPolicy<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ReplacementPolicy<T> for FifoPolicy<T> {
    fn add_with(&mut self, element: T, _attributes: &Attributes) -> Result<SlotId, Rejected<T>> {
        Ok(self.queue.push_back(element))
    }

    fn update_with(
        &mut self,
        id: SlotId,
        element: T,
        _attributes: &Attributes,
    ) -> Result<T, UpdateRejected<T>> {
        match self.queue.get_mut(id) {
            Some(slot) => Ok(std::mem::replace(slot, element)),
            None => stale_slot(self.name(), id),
        }
    }

    fn touch(&mut self, id: SlotId) {
        if !self.queue.contains(id) {
            stale_slot(self.name(), id);
        }
    }

    fn remove(&mut self, id: SlotId) -> T {
        match self.queue.remove(id) {
            Some(element) => element,
            None => stale_slot(self.name(), id),
        }
    }

    fn evict_next(&mut self) -> Option<T> {
        self.queue.pop_front()
    }

    fn peek(&self) -> Option<&T> {
        self.queue.front()
    }

    fn peek_all(&self) -> Vec<&T> {
        self.queue.iter().collect()
    }

    fn clear(&mut self) {
        self.queue.clear();
    }

    fn len(&self) -> usize {
        self.queue.len()
    }

    fn contains(&self, id: SlotId) -> bool {
        self.queue.contains(id)
    }

    fn name(&self) -> &'static str {
        "fifo"
    }

    fn check_invariants(&self) -> Result<(), InvariantError> {
        self.queue.check_invariants()
    }
}
