//! Most Recently Used (MRU) replacement policy.
//!
//! Keeps the same recency list as LRU but takes victims from the other end:
//! the element accessed (or admitted) last is the first to go.
//!
//! ## Architecture
//!
//! ```text
//!   ┌─────────────────────────────────────────────────────────────────────┐
//!   │                        MruPolicy<T> Layout                          │
//!   │                                                                     │
//!   │   head ──► [A] ◄──► [B] ◄──► [C] ◄──► [D] ◄── tail                  │
//!   │            LRU                          MRU                         │
//!   │            keep                         EVICT                       │
//!   │                                                                     │
//!   │   touch(id_B):  [A] [C] [D] [B]   → B is now the next victim        │
//!   └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## When to Use
//!
//! MRU wins on cyclic scans larger than the cache, where the element just
//! used is the one needed furthest in the future. For general workloads it
//! is a comparison baseline rather than a sensible choice.

use crate::ds::{IntrusiveList, SlotId};
use crate::error::{InvariantError, Rejected, UpdateRejected};
use crate::traits::{Attributes, ReplacementPolicy, stale_slot};

/// Recency-ordered policy evicting the most recently used element.
///
/// # Example
///
/// ```
/// use evictkit::policy::mru::MruPolicy;
/// use evictkit::traits::ReplacementPolicy;
///
/// let mut mru = MruPolicy::new();
/// let a = mru.add("a").unwrap();
/// mru.add("b").unwrap();
///
/// // Freshly admitted "b" is the victim until "a" is touched.
/// assert_eq!(mru.peek(), Some(&"b"));
/// mru.touch(a);
/// assert_eq!(mru.evict_next(), Some("a"));
/// ```
#[derive(Debug, Clone)]
pub struct MruPolicy<T> {
    recency: IntrusiveList<T>,
}

impl<T> MruPolicy<T> {
    /// Creates an empty MRU policy.
    pub fn new() -> Self {
        Self {
            recency: IntrusiveList::new(),
        }
    }

    /// Creates an empty MRU policy with room for `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            recency: IntrusiveList::with_capacity(capacity),
        }
    }
}

impl<T> Default for MruPolicy<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ReplacementPolicy<T> for MruPolicy<T> {
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
        self.recency.pop_back()
    }

    fn peek(&self) -> Option<&T> {
        self.recency.back()
    }

    fn peek_all(&self) -> Vec<&T> {
        self.recency.iter_rev().collect()
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
        "mru"
    }

    fn check_invariants(&self) -> Result<(), InvariantError> {
        self.recency.check_invariants()
    }
}
