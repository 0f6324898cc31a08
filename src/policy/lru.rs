//! # Least Recently Used (LRU) Replacement Policy
//!
//! Evicts the element whose last access (admission or `touch`) is oldest.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                          LruPolicy<T>                                │
//!   │                                                                      │
//!   │   ┌──────────────────────────────────────────────────────────────┐   │
//!   │   │  IntrusiveList<T> (recency order)                            │   │
//!   │   │                                                              │   │
//!   │   │  head ──► ┌──────┐ ◄──► ┌──────┐ ◄──► ┌──────┐ ◄── tail      │   │
//!   │   │   (LRU)   │ Slot │      │ Slot │      │ Slot │    (MRU)      │   │
//!   │   │           │id_1  │      │id_2  │      │id_3  │               │   │
//!   │   │           └──────┘      └──────┘      └──────┘               │   │
//!   │   │                                                              │   │
//!   │   │  Least Recently Used ────────────────► Most Recently Used    │   │
//!   │   └──────────────────────────────────────────────────────────────┘   │
//!   │                                                                      │
//!   │   The list's SlotIds are the handles returned to the caller.         │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations Flow
//!
//! ```text
//!   ACCESS existing slot
//!   ═══════════════════════════════════════════════════════════════════════
//!
//!   Before:
//!     head ──► [A] ◄──► [B] ◄──► [C] ◄── tail
//!
//!   touch(id_B):
//!     move [B] to tail: O(1)
//!
//!   After:
//!     head ──► [A] ◄──► [C] ◄──► [B] ◄── tail
//!
//!   ═══════════════════════════════════════════════════════════════════════
//!
//!   EVICT
//!   ═══════════════════════════════════════════════════════════════════════
//!
//!   evict_next():
//!     pop [A] from head: O(1); id_A returns to the arena free list
//! ```
//!
//! ## Methods
//!
//! | Method         | Complexity | Description                             |
//! |----------------|------------|-----------------------------------------|
//! | `add`          | O(1)       | Append at MRU end                       |
//! | `touch`        | O(1)       | Move to MRU end                         |
//! | `update`       | O(1)       | Replace element, recency unchanged      |
//! | `remove`       | O(1)       | Unlink and free slot                    |
//! | `evict_next`   | O(1)       | Pop LRU end                             |
//! | `peek_all`     | O(n)       | Walk head to tail                       |
//!
//! ## Thread Safety
//!
//! Not thread-safe. Wrap in
//! [`SynchronizedPolicy`](crate::policy::synchronized::SynchronizedPolicy)
//! for shared use.

use crate::ds::{IntrusiveList, SlotId};
use crate::error::{InvariantError, Rejected, UpdateRejected};
use crate::traits::{Attributes, ReplacementPolicy, stale_slot};

/// Recency-ordered policy evicting the least recently used element.
///
/// # Example
///
/// ```
/// use evictkit::policy::lru::LruPolicy;
/// use evictkit::traits::ReplacementPolicy;
///
/// let mut lru = LruPolicy::new();
/// let ids: Vec<_> = lru.add_all(0..4).into_iter().flatten().collect();
/// lru.touch(ids[0]);
/// lru.touch(ids[2]);
///
/// assert_eq!(lru.evict_all(), vec![1, 3, 0, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct LruPolicy<T> {
    recency: IntrusiveList<T>,
}

impl<T> LruPolicy<T> {
    /// Creates an empty LRU policy.
    pub fn new() -> Self {
        Self {
            recency: IntrusiveList::new(),
        }
    }

    /// Creates an empty LRU policy with room for `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            recency: IntrusiveList::with_capacity(capacity),
        }
    }

    /// Returns the most recently used element.
    pub fn peek_mru(&self) -> Option<&T> {
        self.recency.back()
    }
}

impl<T> Default for LruPolicy<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ReplacementPolicy<T> for LruPolicy<T> {
    fn add_with(&mut self, element: T, _attributes: &Attributes) -> Result<SlotId, Rejected<T>> {
        Ok(self.recency.push_back(element))
    }

    fn update_with(
        &mut self,
        id: SlotId,
        element: T,
        _attributes: &Attributes,
    ) -> Result<T, UpdateRejected<T>> {
        match self.recency.get_mut(id) {
            Some(slot) => Ok(std::mem::replace(slot, element)),
            None => stale_slot(self.name(), id),
        }
    }

    fn touch(&mut self, id: SlotId) {
        if !self.recency.move_to_back(id) {
            stale_slot(self.name(), id);
        }
    }

    fn remove(&mut self, id: SlotId) -> T {
        match self.recency.remove(id) {
            Some(element) => element,
            None => stale_slot(self.name(), id),
        }
    }

    fn evict_next(&mut self) -> Option<T> {
        self.recency.pop_front()
    }

    fn peek(&self) -> Option<&T> {
        self.recency.front()
    }

    fn peek_all(&self) -> Vec<&T> {
        self.recency.iter().collect()
    }

    fn clear(&mut self) {
        self.recency.clear();
    }

    fn len(&self) -> usize {
        self.recency.len()
    }

    fn contains(&self, id: SlotId) -> bool {
        self.recency.contains(id)
    }

    fn name(&self) -> &'static str {
        "lru"
    }

    fn check_invariants(&self) -> Result<(), InvariantError> {
        self.recency.check_invariants()
    }
}
